//! Common types shared across modules.

use crate::error::ConfirmError;
use ethers::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decimal places of the native currency on every EVM chain (1 ETH = 10^18 wei).
pub const NATIVE_DECIMALS: u32 = 18;

/// Largest decimal count a U256 amount can be formatted with (10^77 overflows).
pub const MAX_DECIMALS: u32 = 76;

/// What kind of asset a previewed transaction moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferKind {
    /// Plain transfer of the chain's native currency
    Native,
    /// ERC-20 style token
    FungibleToken { symbol: String, decimals: u32 },
    /// ERC-721 / ERC-875 style token
    NonFungibleToken { symbol: String, decimals: u32 },
    /// Arbitrary contract interaction (dapp request); value is native currency
    ContractCall,
}

impl TransferKind {
    /// Decimal count used when formatting the transferred value
    pub fn decimals(&self) -> u32 {
        match self {
            TransferKind::FungibleToken { decimals, .. }
            | TransferKind::NonFungibleToken { decimals, .. } => *decimals,
            TransferKind::Native | TransferKind::ContractCall => NATIVE_DECIMALS,
        }
    }

    /// Symbol shown next to the amount. Native transfers use the network's token.
    pub fn symbol<'a>(&'a self, native_token: &'a str) -> &'a str {
        match self {
            TransferKind::FungibleToken { symbol, .. }
            | TransferKind::NonFungibleToken { symbol, .. } => symbol,
            TransferKind::Native | TransferKind::ContractCall => native_token,
        }
    }
}

/// Read-only snapshot of the transaction being confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTransaction {
    /// Destination; `None` for constructs without an explicit recipient
    pub to: Option<Address>,
    pub value: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    /// `None` when no nonce has been chosen yet
    pub nonce: Option<u64>,
    pub data: Bytes,
    pub transfer: TransferKind,
}

impl PreviewTransaction {
    /// Total fee in wei (gas price times gas limit), saturating on overflow
    pub fn total_fee(&self) -> U256 {
        self.gas_price.saturating_mul(self.gas_limit)
    }
}

/// The user-editable part of a transaction.
///
/// The edit screen hands back a complete value; it always replaces the
/// previous configuration as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionConfiguration {
    pub gas_price: U256,
    pub gas_limit: U256,
    pub nonce: Option<u64>,
    pub data: Bytes,
}

impl From<&PreviewTransaction> for TransactionConfiguration {
    fn from(tx: &PreviewTransaction) -> Self {
        Self {
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            nonce: tx.nonce,
            data: tx.data.clone(),
        }
    }
}

/// Fiat (or alternative currency) prices keyed by token symbol
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrencyRate {
    /// Currency the prices are quoted in, e.g. "USD"
    pub currency: String,
    pub rates: HashMap<String, f64>,
}

impl CurrencyRate {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            rates: HashMap::new(),
        }
    }

    pub fn with_rate(mut self, symbol: impl Into<String>, price: f64) -> Self {
        self.rates.insert(symbol.into(), price);
        self
    }

    pub fn price_of(&self, symbol: &str) -> Option<f64> {
        self.rates.get(symbol).copied()
    }
}

/// On-disk description of a transaction preview (decimal strings for amounts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewFile {
    #[serde(default)]
    pub to: Option<Address>,
    pub value: String,
    pub gas_price: String,
    pub gas_limit: String,
    /// Negative values mean "no nonce chosen"
    #[serde(default = "default_nonce")]
    pub nonce: i64,
    #[serde(default)]
    pub data: String,
    #[serde(default = "default_transfer")]
    pub transfer: TransferKind,
    #[serde(default)]
    pub currency_rate: Option<CurrencyRate>,
}

fn default_nonce() -> i64 {
    -1
}

fn default_transfer() -> TransferKind {
    TransferKind::Native
}

fn parse_decimal(field: &'static str, input: &str) -> Result<U256, ConfirmError> {
    U256::from_dec_str(input.trim()).map_err(|e| ConfirmError::InvalidPreview {
        field,
        reason: e.to_string(),
    })
}

impl TryFrom<&PreviewFile> for PreviewTransaction {
    type Error = ConfirmError;

    fn try_from(file: &PreviewFile) -> Result<Self, Self::Error> {
        let data_hex = file.data.trim();
        let data_hex = data_hex.strip_prefix("0x").unwrap_or(data_hex);
        let data = hex::decode(data_hex).map_err(|e| ConfirmError::InvalidPreview {
            field: "data",
            reason: e.to_string(),
        })?;

        if file.transfer.decimals() > MAX_DECIMALS {
            return Err(ConfirmError::InvalidPreview {
                field: "transfer",
                reason: format!(
                    "{} decimals exceeds the maximum of {}",
                    file.transfer.decimals(),
                    MAX_DECIMALS
                ),
            });
        }

        Ok(Self {
            to: file.to,
            value: parse_decimal("value", &file.value)?,
            gas_price: parse_decimal("gas_price", &file.gas_price)?,
            gas_limit: parse_decimal("gas_limit", &file.gas_limit)?,
            nonce: u64::try_from(file.nonce).ok(),
            data: Bytes::from(data),
            transfer: file.transfer.clone(),
        })
    }
}
