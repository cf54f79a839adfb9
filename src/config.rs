use anyhow::Result;
use ethers::providers::{Http, Provider};
use std::env;
use std::sync::Arc;
use url::Url;

/// A predefined EVM-compatible network with label, chain ID, native token, and default RPC.
#[derive(Clone, Debug)]
pub struct EvmNetwork {
    pub label: &'static str,
    pub chain_id: u64,
    pub native_token: &'static str,
    pub default_rpc: &'static str,
}

impl EvmNetwork {
    pub const fn new(
        label: &'static str,
        chain_id: u64,
        native_token: &'static str,
        default_rpc: &'static str,
    ) -> Self {
        Self {
            label,
            chain_id,
            native_token,
            default_rpc,
        }
    }
}

/// Networks whose native token symbol we know.
pub const NETWORKS: &[EvmNetwork] = &[
    EvmNetwork::new("Ethereum", 1, "ETH", "https://ethereum-rpc.publicnode.com"),
    EvmNetwork::new("Sepolia", 11155111, "ETH", "https://ethereum-sepolia-rpc.publicnode.com"),
    EvmNetwork::new("Optimism", 10, "ETH", "https://mainnet.optimism.io"),
    EvmNetwork::new("Base", 8453, "ETH", "https://mainnet.base.org"),
    EvmNetwork::new("Polygon", 137, "POL", "https://polygon-rpc.com"),
    EvmNetwork::new("Gnosis Chain", 100, "xDAI", "https://rpc.gnosischain.com"),
    EvmNetwork::new("BNB Chain", 56, "BNB", "https://bsc-dataseed.binance.org"),
    EvmNetwork::new("Avalanche C-Chain", 43114, "AVAX", "https://avalanche-c-chain-rpc.publicnode.com"),
    EvmNetwork::new("Ethereum Classic", 61, "ETC", "https://etc.rivet.link"),
    EvmNetwork::new("Celo", 42220, "CELO", "https://forno.celo.org"),
];

/// ENS lives on Ethereum mainnet regardless of the transaction's chain
pub const ENS_CHAIN_ID: u64 = 1;

/// Find a network by chain ID
pub fn find_network_by_chain_id(chain_id: u64) -> Option<&'static EvmNetwork> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

#[derive(Clone, Debug)]
pub struct Config {
    pub chain_id: u64,
    /// RPC used for reverse name lookups
    pub ens_rpc_url: String,
    /// Symbol override for networks missing from [`NETWORKS`]
    pub native_token_override: Option<String>,
}

impl Config {
    pub fn new(chain_id: u64) -> Self {
        let ens_rpc_url = env::var("ENS_RPC_URL").ok().unwrap_or_else(|| {
            find_network_by_chain_id(ENS_CHAIN_ID)
                .map(|n| n.default_rpc.to_string())
                .unwrap_or_else(|| "https://ethereum-rpc.publicnode.com".to_string())
        });

        Self {
            chain_id,
            ens_rpc_url,
            native_token_override: env::var("NATIVE_TOKEN").ok(),
        }
    }

    pub fn native_token(&self) -> &str {
        if let Some(ref token) = self.native_token_override {
            token.as_str()
        } else {
            find_network_by_chain_id(self.chain_id)
                .map(|n| n.native_token)
                .unwrap_or("ETH")
        }
    }

    /// Network name for display; unknown chains show their chain ID
    pub fn network_label(&self) -> String {
        find_network_by_chain_id(self.chain_id)
            .map(|n| n.label.to_string())
            .unwrap_or_else(|| format!("Chain {}", self.chain_id))
    }

    /// Provider for the ENS lookup endpoint
    pub fn get_ens_provider(&self) -> Result<Arc<Provider<Http>>> {
        let url = Url::parse(&self.ens_rpc_url)?;
        let provider = Provider::<Http>::try_from(url.as_str())?;
        Ok(Arc::new(provider))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(ENS_CHAIN_ID)
    }
}
