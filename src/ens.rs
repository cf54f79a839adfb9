//! Reverse name resolution (ENS) for the recipient row
//!
//! Lookups are fire-and-forget: the list hands out a [`NameTicket`] per request and
//! only applies a result whose ticket is still current.

use crate::async_job::{spawn_job, AsyncJob};
use crate::error::ConfirmError;
use anyhow::Result;
use ethers::providers::{Http, Middleware, Provider, ProviderError};
use ethers::types::Address;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Something that can map an address to a human-readable name.
///
/// `Ok(None)` means "no name registered"; errors are lookup failures.
pub trait NameLookup: Send + Sync {
    fn reverse_lookup(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// ENS reverse lookup through a JSON-RPC provider
#[derive(Clone, Debug)]
pub struct ProviderNameLookup {
    provider: Arc<Provider<Http>>,
}

impl ProviderNameLookup {
    pub fn new(provider: Arc<Provider<Http>>) -> Self {
        Self { provider }
    }
}

impl NameLookup for ProviderNameLookup {
    fn reverse_lookup(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Option<String>>> + Send {
        let provider = Arc::clone(&self.provider);
        async move {
            match provider.lookup_address(address).await {
                Ok(name) => Ok(Some(name)),
                // No reverse record, or the record doesn't resolve back to the address
                Err(ProviderError::EnsError(reason)) | Err(ProviderError::EnsNotOwned(reason)) => {
                    debug!("No ENS name for {:?}: {}", address, reason);
                    Ok(None)
                }
                Err(e) => Err(ConfirmError::NameLookup(e.to_string()).into()),
            }
        }
    }
}

/// Identifies one resolution request. Issued by the list; stale tickets are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NameTicket {
    pub(crate) generation: u64,
    pub(crate) address: Address,
}

impl NameTicket {
    pub fn address(&self) -> Address {
        self.address
    }
}

/// Start a background reverse lookup for `address`
pub fn spawn_reverse_lookup<L>(lookup: Arc<L>, address: Address) -> AsyncJob<Option<String>>
where
    L: NameLookup + 'static,
{
    spawn_job(async move { lookup.reverse_lookup(address).await })
}


#[cfg(test)]
mod tests {
    use super::testing::StaticNameLookup;
    use super::*;

    fn address(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_static_lookup_found() {
        let lookup = StaticNameLookup::with_name(address(1), "alice.eth");
        let name = tokio_test::block_on(lookup.reverse_lookup(address(1))).unwrap();
        assert_eq!(name.as_deref(), Some("alice.eth"));
    }

    #[test]
    fn test_static_lookup_missing() {
        let lookup = StaticNameLookup::default();
        let name = tokio_test::block_on(lookup.reverse_lookup(address(2))).unwrap();
        assert!(name.is_none());
    }

    #[test]
    fn test_spawn_reverse_lookup_delivers() {
        let lookup = Arc::new(StaticNameLookup::with_name(address(3), "bob.eth"));
        let job = spawn_reverse_lookup(lookup, address(3));
        assert_eq!(job.wait().unwrap().as_deref(), Some("bob.eth"));
    }

    #[test]
    fn test_spawn_reverse_lookup_failure() {
        let lookup = Arc::new(StaticNameLookup {
            failing: vec![address(4)],
            ..Default::default()
        });
        let job = spawn_reverse_lookup(lookup, address(4));
        assert!(job.wait().is_err());
    }

    #[test]
    fn test_ticket_exposes_address() {
        let ticket = NameTicket {
            generation: 1,
            address: address(5),
        };
        assert_eq!(ticket.address(), address(5));
    }
}
