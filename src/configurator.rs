//! Transaction configurator: the base transaction plus the user's gas edits.

use crate::types::{PreviewTransaction, TransactionConfiguration};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TransactionConfigurator {
    base: PreviewTransaction,
    configuration: TransactionConfiguration,
}

impl TransactionConfigurator {
    /// Start from `base`; its gas settings become the initial configuration
    pub fn new(base: PreviewTransaction) -> Self {
        let configuration = TransactionConfiguration::from(&base);
        Self {
            base,
            configuration,
        }
    }

    pub fn configuration(&self) -> &TransactionConfiguration {
        &self.configuration
    }

    /// Replace the configuration wholesale (no field-level merge)
    pub fn update(&mut self, configuration: TransactionConfiguration) {
        info!(
            "Transaction configuration updated: gas_limit={} gas_price={} nonce={:?}",
            configuration.gas_limit, configuration.gas_price, configuration.nonce
        );
        self.configuration = configuration;
    }

    /// The transaction as it would be signed right now
    pub fn preview_transaction(&self) -> PreviewTransaction {
        PreviewTransaction {
            gas_price: self.configuration.gas_price,
            gas_limit: self.configuration.gas_limit,
            nonce: self.configuration.nonce,
            data: self.configuration.data.clone(),
            ..self.base.clone()
        }
    }
}
