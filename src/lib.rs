//! Confirmation list model for EVM transaction previews.
//!
//! The list shows a pending transaction in four collapsible sections (Balance,
//! Recipient, Gas, Amount) and lets the host expand them, edit gas settings and
//! confirm. It is independent of any UI toolkit: hosts call
//! [`presenter::ConfirmationList::render`] for a full snapshot, or
//! [`presenter::ConfirmationList::apply_toggle`] for an insert/remove diff.
//!
//! ## Module Structure
//!
//! - `catalog` - Sections and the row kinds each one can show
//! - `disclosure` - Expanded/collapsed state
//! - `resolver` - Label/value text for rows and headers, fee warning policy
//! - `presenter` - The list itself
//! - `configurator` - Base transaction plus editable gas configuration
//! - `ens` - Reverse name lookup seam
//! - `submission` - Confirm button / signing state
//! - `async_job`, `notifications`, `config`, `error`, `types`, `utils` - supporting pieces

pub mod async_job;
pub mod catalog;
pub mod config;
pub mod configurator;
pub mod disclosure;
pub mod ens;
pub mod error;
pub mod notifications;
pub mod presenter;
pub mod resolver;
pub mod submission;
pub mod types;
pub mod utils;

pub use catalog::{RowKind, Section};
pub use presenter::{ConfirmationList, ListDiff, RenderedList};
