//! Section catalog for the confirmation list
//!
//! Fixed, ordered sections and the row kinds each one may show. Which rows are
//! actually available depends on a small [`RowContext`] (nonce chosen, name resolved).

use serde::Serialize;
use std::str::FromStr;

/// Logical sections of the confirmation list, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Balance,
    Recipient,
    Gas,
    Amount,
}

/// All sections in catalog order
pub const SECTIONS: &[Section] = &[
    Section::Balance,
    Section::Recipient,
    Section::Gas,
    Section::Amount,
];

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Balance => "Balance",
            Section::Recipient => "Recipient",
            Section::Gas => "Speed (Gas)",
            Section::Amount => "Amount",
        }
    }

    /// Position of this section in [`SECTIONS`]
    pub fn index(&self) -> usize {
        match self {
            Section::Balance => 0,
            Section::Recipient => 1,
            Section::Gas => 2,
            Section::Amount => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Section> {
        SECTIONS.get(index).copied()
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balance" => Ok(Section::Balance),
            "recipient" => Ok(Section::Recipient),
            "gas" => Ok(Section::Gas),
            "amount" => Ok(Section::Amount),
            other => Err(format!(
                "unknown section '{}' (expected balance, recipient, gas or amount)",
                other
            )),
        }
    }
}

/// A single displayable field. Each kind belongs to exactly one section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Address,
    Recipient,
    Ens,
    GasLimit,
    GasPrice,
    Fee,
    Data,
    Nonce,
}

impl RowKind {
    pub fn title(&self) -> &'static str {
        match self {
            RowKind::Address => "From",
            RowKind::Recipient => "Wallet Address",
            RowKind::Ens => "Blockie & ENS",
            RowKind::GasLimit => "Gas Limit",
            RowKind::GasPrice => "Gas Price",
            RowKind::Fee => "Network Fee",
            RowKind::Data => "Data",
            RowKind::Nonce => "Nonce",
        }
    }

    pub fn section(&self) -> Section {
        match self {
            RowKind::Address => Section::Balance,
            RowKind::Recipient | RowKind::Ens => Section::Recipient,
            RowKind::GasLimit
            | RowKind::GasPrice
            | RowKind::Fee
            | RowKind::Data
            | RowKind::Nonce => Section::Gas,
        }
    }
}

/// Availability facts that decide which optional rows exist
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowContext {
    pub has_nonce: bool,
    pub has_ens_name: bool,
}

/// Ordered list of all sections
pub fn sections() -> &'static [Section] {
    SECTIONS
}

/// Row kinds for `section` under `context`, in display order.
///
/// Amount never has rows; it renders through its header only.
pub fn row_kinds(section: Section, context: &RowContext) -> Vec<RowKind> {
    match section {
        Section::Balance => vec![RowKind::Address],
        Section::Recipient => {
            if context.has_ens_name {
                vec![RowKind::Recipient, RowKind::Ens]
            } else {
                vec![RowKind::Recipient]
            }
        }
        Section::Gas => {
            let mut rows = vec![
                RowKind::GasLimit,
                RowKind::GasPrice,
                RowKind::Fee,
                RowKind::Data,
            ];
            if context.has_nonce {
                rows.push(RowKind::Nonce);
            }
            rows
        }
        Section::Amount => Vec::new(),
    }
}

/// Every context the list can be in, for exhaustive checks
pub fn all_contexts() -> [RowContext; 4] {
    [
        RowContext { has_nonce: false, has_ens_name: false },
        RowContext { has_nonce: true, has_ens_name: false },
        RowContext { has_nonce: false, has_ens_name: true },
        RowContext { has_nonce: true, has_ens_name: true },
    ]
}
