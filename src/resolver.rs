//! Row content resolver
//!
//! Turns the current transaction preview into the literal label/value pairs the
//! list displays. Nothing is cached: every call reads the inputs it was built with.

use crate::catalog::{row_kinds, RowContext, RowKind, Section};
use crate::types::{CurrencyRate, PreviewTransaction};
use crate::utils::{address_with_name, amount_with_sign, checksum_address, format_ether, format_full, format_gwei};
use ethers::types::{Address, U256};
use serde::Serialize;

/// Placeholder for a missing recipient
pub const MISSING_VALUE: &str = "--";

/// Header subtitle for sections without a dynamic summary
pub const DEFAULT_HEADER_SUBTITLE: &str = "Default";

/// Resolved label/value pair for one row
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RowContent {
    pub kind: RowKind,
    pub title: &'static str,
    pub subtitle: Option<String>,
}

/// Section header: title, summary and disclosure affordance
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderContent {
    pub section: Section,
    pub title: &'static str,
    pub subtitle: String,
    pub expanded: bool,
    /// Whether the expand affordance is shown at all (false for row-less sections)
    pub expandable: bool,
}

/// Fee above which the fee row carries a warning: 1/20 of one native unit (0.05).
pub fn high_fee_threshold() -> U256 {
    U256::exp10(18) / U256::from(20u64)
}

/// Strictly greater than the threshold; an exactly equal fee does not warn.
pub fn is_high_fee(fee: U256) -> bool {
    fee > high_fee_threshold()
}

pub fn high_fee_warning(fee_text: &str) -> String {
    format!("{} - Warning: high network fee", fee_text)
}

/// Read-only view over the data one render needs.
#[derive(Clone, Copy, Debug)]
pub struct RowResolver<'a> {
    pub transaction: &'a PreviewTransaction,
    /// Signer's own address (Balance section)
    pub signer: Address,
    /// Native currency symbol of the active network
    pub native_token: &'a str,
    pub currency_rate: Option<&'a CurrencyRate>,
    /// Resolved name for the recipient, if any
    pub ens_name: Option<&'a str>,
}

impl<'a> RowResolver<'a> {
    pub fn context(&self) -> RowContext {
        RowContext {
            has_nonce: self.transaction.nonce.is_some(),
            has_ens_name: self.ens_name.is_some(),
        }
    }

    /// Content of the `row`-th visible row of `section`.
    ///
    /// # Panics
    /// If `row` is outside `row_kinds(section, context)`; that is an integration bug.
    pub fn resolve_at(&self, section: Section, row: usize) -> RowContent {
        let kinds = row_kinds(section, &self.context());
        match kinds.get(row) {
            Some(kind) => self.resolve(*kind),
            None => panic!(
                "row {} out of range for section {:?} ({} rows)",
                row,
                section,
                kinds.len()
            ),
        }
    }

    pub fn resolve(&self, kind: RowKind) -> RowContent {
        let tx = self.transaction;
        let subtitle = match kind {
            RowKind::Address => Some(checksum_address(&self.signer)),
            RowKind::GasLimit => Some(tx.gas_limit.to_string()),
            RowKind::GasPrice => Some(self.gas_price_text()),
            RowKind::Fee => Some(self.fee_text()),
            RowKind::Data => Some(format!("0x{}", hex::encode(&tx.data))),
            // Only listed by row_kinds when a nonce is set
            RowKind::Nonce => tx.nonce.map(|n| n.to_string()),
            RowKind::Recipient => Some(
                tx.to
                    .map(|to| checksum_address(&to))
                    .unwrap_or_else(|| MISSING_VALUE.to_string()),
            ),
            RowKind::Ens => tx.to.map(|to| address_with_name(&to, self.ens_name)),
        };

        RowContent {
            kind,
            title: kind.title(),
            subtitle,
        }
    }

    pub fn header(&self, section: Section, expanded: bool) -> HeaderContent {
        let subtitle = match section {
            Section::Balance | Section::Gas => DEFAULT_HEADER_SUBTITLE.to_string(),
            // Shows the destination, not the signer's own account
            Section::Recipient => self
                .transaction
                .to
                .map(|to| address_with_name(&to, self.ens_name))
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            Section::Amount => self.amount_text(),
        };

        HeaderContent {
            section,
            title: section.title(),
            subtitle,
            expanded,
            expandable: !row_kinds(section, &self.context()).is_empty(),
        }
    }

    /// Signed amount with the transfer's decimals, followed by its symbol
    pub fn amount_text(&self) -> String {
        let tx = self.transaction;
        let amount = format_full(tx.value, tx.transfer.decimals());
        format!(
            "{} {}",
            amount_with_sign(&amount),
            tx.transfer.symbol(self.native_token)
        )
    }

    fn gas_price_text(&self) -> String {
        format!("{} Gwei", format_gwei(self.transaction.gas_price))
    }

    fn fee_text(&self) -> String {
        let fee = self.transaction.total_fee();
        let fee_in_native = format_ether(fee);
        let mut text = format!("{} {}", fee_in_native, self.native_token);

        if let Some(rate) = self.currency_rate {
            if let (Some(price), Ok(amount)) =
                (rate.price_of(self.native_token), fee_in_native.parse::<f64>())
            {
                text.push_str(&format!(" (~{:.2} {})", amount * price, rate.currency));
            }
        }

        if is_high_fee(fee) {
            high_fee_warning(&text)
        } else {
            text
        }
    }
}
