//! Confirmation list presenter
//!
//! Composes the section catalog, disclosure state and row resolver into a
//! snapshot the host renders, and turns expand/collapse requests into row diffs.
//!
//! ## Usage
//!
//! ```no_run
//! use txconfirm::configurator::TransactionConfigurator;
//! use txconfirm::presenter::ConfirmationList;
//! use txconfirm::submission::ConfirmType;
//! use txconfirm::catalog::Section;
//! # fn preview() -> txconfirm::types::PreviewTransaction { unimplemented!() }
//! # let signer = ethers::types::Address::zero();
//!
//! let mut list = ConfirmationList::new(
//!     TransactionConfigurator::new(preview()),
//!     signer,
//!     "ETH",
//!     ConfirmType::SignThenSend,
//! );
//! let diff = list.apply_toggle(Section::Gas);
//! let snapshot = list.render();
//! ```

use crate::async_job::AsyncJob;
use crate::catalog::{sections, RowContext, RowKind, Section};
use crate::configurator::TransactionConfigurator;
use crate::disclosure::{DisclosureState, IndexPath};
use crate::ens::{spawn_reverse_lookup, NameLookup, NameTicket};
use crate::notifications::NotificationEntry;
use crate::resolver::{HeaderContent, RowContent, RowResolver};
use crate::submission::{ConfirmResult, ConfirmType, Submission};
use crate::types::{CurrencyRate, PreviewTransaction, TransactionConfiguration};
use crate::utils::short_address;
use ethers::types::Address;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NAVIGATION_TITLE: &str = "Confirm Transaction";
pub const CONFIRM_BUTTON_TITLE: &str = "Confirm";

/// One section of a rendered snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub header: HeaderContent,
    pub rows: Vec<RowContent>,
}

/// Full, order-stable snapshot of the list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedList {
    pub sections: Vec<RenderedSection>,
}

impl RenderedList {
    pub fn section(&self, section: Section) -> &RenderedSection {
        &self.sections[section.index()]
    }

    pub fn row_count(&self, section: Section) -> usize {
        self.section(section).rows.len()
    }

    pub fn row_kinds(&self, section: Section) -> Vec<RowKind> {
        self.section(section).rows.iter().map(|r| r.kind).collect()
    }
}

/// Rows to insert and remove to go from one snapshot to the next
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ListDiff {
    pub inserted: Vec<IndexPath>,
    pub removed: Vec<IndexPath>,
}

impl ListDiff {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty()
    }
}

/// Structural difference between two snapshots, matched by row kind.
///
/// Removed paths index into `before`, inserted paths into `after`.
pub fn diff_snapshots(before: &RenderedList, after: &RenderedList) -> ListDiff {
    let mut diff = ListDiff::default();

    for (index, (old, new)) in before.sections.iter().zip(&after.sections).enumerate() {
        let old_kinds: Vec<RowKind> = old.rows.iter().map(|r| r.kind).collect();
        let new_kinds: Vec<RowKind> = new.rows.iter().map(|r| r.kind).collect();

        for (row, kind) in old_kinds.iter().enumerate() {
            if !new_kinds.contains(kind) {
                diff.removed.push(IndexPath::new(index, row));
            }
        }
        for (row, kind) in new_kinds.iter().enumerate() {
            if !old_kinds.contains(kind) {
                diff.inserted.push(IndexPath::new(index, row));
            }
        }
    }

    diff
}

/// What the host should do after a row was tapped
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionAction {
    /// Open the gas editor with the current configuration
    EditGas(TransactionConfiguration),
}

/// Things that happened while polling background work
#[derive(Clone, Debug)]
pub enum ListEvent {
    /// A name arrived and was applied; rows may have appeared
    NameResolved(ListDiff),
    /// The lookup failed or found nothing; the raw address stays
    NameUnavailable,
    SubmissionFinished(NotificationEntry),
}

/// Presenter for the confirmation screen.
///
/// Owns the disclosure state exclusively; everything else is read from the
/// configurator and the resolved name on each render.
#[derive(Debug)]
pub struct ConfirmationList {
    configurator: TransactionConfigurator,
    signer: Address,
    native_token: String,
    currency_rate: Option<CurrencyRate>,
    disclosure: DisclosureState,
    ens_name: Option<String>,
    /// Bumped for every name request and whenever the recipient changes
    name_generation: u64,
    pending_name: Option<(NameTicket, AsyncJob<Option<String>>)>,
    submission: Submission,
    torn_down: bool,
}

impl ConfirmationList {
    pub fn new(
        configurator: TransactionConfigurator,
        signer: Address,
        native_token: impl Into<String>,
        confirm_type: ConfirmType,
    ) -> Self {
        Self {
            configurator,
            signer,
            native_token: native_token.into(),
            currency_rate: None,
            disclosure: DisclosureState::new(),
            ens_name: None,
            name_generation: 0,
            pending_name: None,
            submission: Submission::new(confirm_type),
            torn_down: false,
        }
    }

    pub fn with_currency_rate(mut self, rate: CurrencyRate) -> Self {
        self.currency_rate = Some(rate);
        self
    }

    pub fn set_currency_rate(&mut self, rate: Option<CurrencyRate>) {
        self.currency_rate = rate;
    }

    pub fn navigation_title(&self) -> &'static str {
        NAVIGATION_TITLE
    }

    pub fn confirm_button_title(&self) -> &'static str {
        CONFIRM_BUTTON_TITLE
    }

    pub fn ens_name(&self) -> Option<&str> {
        self.ens_name.as_deref()
    }

    pub fn configurator(&self) -> &TransactionConfigurator {
        &self.configurator
    }

    fn resolver<'a>(&'a self, tx: &'a PreviewTransaction) -> RowResolver<'a> {
        RowResolver {
            transaction: tx,
            signer: self.signer,
            native_token: &self.native_token,
            currency_rate: self.currency_rate.as_ref(),
            ens_name: self.ens_name.as_deref(),
        }
    }

    pub fn context(&self) -> RowContext {
        RowContext {
            has_nonce: self.configurator.configuration().nonce.is_some(),
            has_ens_name: self.ens_name.is_some(),
        }
    }

    pub fn is_expanded(&self, section: Section) -> bool {
        self.disclosure.is_expanded(section)
    }

    // ==================== rendering ====================

    /// Build a complete snapshot from the current state
    pub fn render(&self) -> RenderedList {
        let tx = self.configurator.preview_transaction();
        let resolver = self.resolver(&tx);
        let context = resolver.context();

        let sections = sections()
            .iter()
            .map(|&section| {
                let expanded = self.disclosure.is_expanded(section);
                let rows = self
                    .disclosure
                    .visible_paths(section, &context)
                    .into_iter()
                    .map(|path| resolver.resolve_at(section, path.row))
                    .collect();
                RenderedSection {
                    header: resolver.header(section, expanded),
                    rows,
                }
            })
            .collect();

        RenderedList { sections }
    }

    /// Content of a single row.
    ///
    /// # Panics
    /// If `path` does not address a row of its section under the current context.
    pub fn content_at(&self, path: IndexPath) -> RowContent {
        let section = section_at(path.section);
        let tx = self.configurator.preview_transaction();
        self.resolver(&tx).resolve_at(section, path.row)
    }

    // ==================== disclosure ====================

    /// Expand or collapse `section` and return the rows to insert or remove
    pub fn apply_toggle(&mut self, section: Section) -> ListDiff {
        let context = self.context();
        let transition = self.disclosure.toggle(section, &context);
        debug!(
            "Toggled {:?}: expanded={} rows={}",
            section,
            transition.expanded,
            transition.affected.len()
        );

        if transition.expanded {
            ListDiff {
                inserted: transition.affected,
                removed: Vec::new(),
            }
        } else {
            ListDiff {
                inserted: Vec::new(),
                removed: transition.affected,
            }
        }
    }

    /// Index-based toggle for hosts that address sections by position.
    ///
    /// # Panics
    /// If `index` is not a catalog position.
    pub fn toggle_at(&mut self, index: usize) -> ListDiff {
        self.apply_toggle(section_at(index))
    }

    /// Row tap. Any gas row opens the gas editor.
    pub fn select(&self, path: IndexPath) -> Option<SelectionAction> {
        match section_at(path.section) {
            Section::Gas => Some(SelectionAction::EditGas(
                self.configurator.configuration().clone(),
            )),
            Section::Balance | Section::Recipient | Section::Amount => None,
        }
    }

    // ==================== upstream updates ====================

    /// Accept an edited configuration (full replace) and report row changes
    pub fn update_configuration(&mut self, configuration: TransactionConfiguration) -> ListDiff {
        let before = self.render();
        self.configurator.update(configuration);
        let diff = diff_snapshots(&before, &self.render());
        debug!("Configuration diff: {:?}", diff);
        diff
    }

    /// Replace the whole transaction, e.g. after the configurator reloaded it.
    ///
    /// A different recipient drops the resolved name and invalidates pending lookups.
    pub fn replace_transaction(&mut self, base: PreviewTransaction) -> ListDiff {
        let before = self.render();
        let recipient_changed = self.configurator.preview_transaction().to != base.to;
        self.configurator = TransactionConfigurator::new(base);

        if recipient_changed {
            self.ens_name = None;
            self.name_generation += 1;
            self.pending_name = None;
        }
        diff_snapshots(&before, &self.render())
    }

    // ==================== name resolution ====================

    /// Issue a ticket for resolving the current recipient's name.
    ///
    /// Returns `None` when there is no recipient or the list was torn down.
    pub fn issue_name_ticket(&mut self) -> Option<NameTicket> {
        if self.torn_down {
            return None;
        }
        let address = self.configurator.preview_transaction().to?;
        self.name_generation += 1;
        Some(NameTicket {
            generation: self.name_generation,
            address,
        })
    }

    /// Start a background reverse lookup of the recipient; the result arrives via [`poll`](Self::poll)
    pub fn request_name_resolution<L>(&mut self, lookup: Arc<L>) -> Option<NameTicket>
    where
        L: NameLookup + 'static,
    {
        let ticket = self.issue_name_ticket()?;
        info!("Resolving name for recipient {}", short_address(&ticket.address));
        let job = spawn_reverse_lookup(lookup, ticket.address);
        self.pending_name = Some((ticket, job));
        Some(ticket)
    }

    /// Apply a lookup result if its ticket is still current.
    ///
    /// Late results (after teardown or a newer request) are dropped and yield `None`.
    pub fn apply_resolved_name(&mut self, ticket: NameTicket, name: Option<String>) -> Option<ListDiff> {
        if self.torn_down {
            debug!("Ignoring name result after teardown");
            return None;
        }
        let current_recipient = self.configurator.preview_transaction().to;
        if ticket.generation != self.name_generation || current_recipient != Some(ticket.address) {
            warn!(
                "Ignoring stale name result for {} (ticket {}, current {})",
                short_address(&ticket.address),
                ticket.generation,
                self.name_generation
            );
            return None;
        }

        let before = self.render();
        self.ens_name = name.filter(|n| !n.is_empty());
        Some(diff_snapshots(&before, &self.render()))
    }

    pub fn name_resolution_pending(&self) -> bool {
        self.pending_name.is_some()
    }

    // ==================== submission ====================

    /// The transaction to sign, read synchronously at confirm time
    pub fn submission_snapshot(&self) -> PreviewTransaction {
        self.configurator.preview_transaction()
    }

    /// Track a running signing/sending job. False if one is already running or the list is gone.
    pub fn track_submission(&mut self, job: AsyncJob<ConfirmResult>) -> bool {
        if self.torn_down {
            return false;
        }
        self.submission.start(job)
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    // ==================== lifecycle ====================

    /// Drain finished background work
    pub fn poll(&mut self) -> Vec<ListEvent> {
        let mut events = Vec::new();

        let finished = match self.pending_name.as_mut() {
            Some((ticket, job)) => job.poll().map(|result| (*ticket, result)),
            None => None,
        };
        if let Some((ticket, result)) = finished {
            self.pending_name = None;
            let name = match result {
                Ok(name) => name,
                Err(e) => {
                    warn!(
                        "Name lookup for {} failed: {}",
                        short_address(&ticket.address),
                        e
                    );
                    None
                }
            };
            match self.apply_resolved_name(ticket, name) {
                Some(diff) if self.ens_name.is_some() => events.push(ListEvent::NameResolved(diff)),
                Some(_) => events.push(ListEvent::NameUnavailable),
                None => {}
            }
        }

        if let Some(entry) = self.submission.poll() {
            events.push(ListEvent::SubmissionFinished(entry));
        }

        events
    }

    /// The screen is going away: pending results are ignored from now on
    pub fn teardown(&mut self) {
        debug!("Confirmation list torn down");
        self.torn_down = true;
        self.pending_name = None;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

fn section_at(index: usize) -> Section {
    match Section::from_index(index) {
        Some(section) => section,
        None => panic!(
            "section index {} out of range ({} sections)",
            index,
            sections().len()
        ),
    }
}
