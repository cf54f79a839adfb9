//! Expanded/collapsed state of the list sections.

use crate::catalog::{row_kinds, RowContext, Section};
use serde::Serialize;
use std::collections::BTreeSet;

/// Row position within the list: catalog index of the section, row within it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

/// Outcome of a toggle: the new state and the rows inserted (expand) or removed (collapse)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub expanded: bool,
    pub affected: Vec<IndexPath>,
}

/// Set of currently expanded sections. Starts empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisclosureState {
    expanded: BTreeSet<Section>,
}

impl DisclosureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, section: Section) -> bool {
        self.expanded.contains(&section)
    }

    /// Index paths of the rows `section` shows right now under `context`
    pub fn visible_paths(&self, section: Section, context: &RowContext) -> Vec<IndexPath> {
        if !self.is_expanded(section) {
            return Vec::new();
        }
        paths_for(section, context)
    }

    /// Flip `section` and report which rows appeared or disappeared.
    ///
    /// Removed paths are computed before the section is collapsed.
    pub fn toggle(&mut self, section: Section, context: &RowContext) -> TransitionResult {
        if self.expanded.remove(&section) {
            TransitionResult {
                expanded: false,
                affected: paths_for(section, context),
            }
        } else {
            self.expanded.insert(section);
            TransitionResult {
                expanded: true,
                affected: paths_for(section, context),
            }
        }
    }
}

fn paths_for(section: Section, context: &RowContext) -> Vec<IndexPath> {
    let index = section.index();
    (0..row_kinds(section, context).len())
        .map(|row| IndexPath::new(index, row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{all_contexts, sections};

    #[test]
    fn test_initially_collapsed() {
        let state = DisclosureState::new();
        for section in sections() {
            assert!(!state.is_expanded(*section));
        }
    }

    #[test]
    fn test_expand_gas_without_nonce() {
        let mut state = DisclosureState::new();
        let ctx = RowContext { has_nonce: false, has_ens_name: false };
        let result = state.toggle(Section::Gas, &ctx);
        assert!(result.expanded);
        assert_eq!(
            result.affected,
            (0..4).map(|row| IndexPath::new(2, row)).collect::<Vec<_>>()
        );
        assert!(state.is_expanded(Section::Gas));
    }

    #[test]
    fn test_collapse_reports_previously_visible_rows() {
        let mut state = DisclosureState::new();
        let ctx = RowContext { has_nonce: false, has_ens_name: false };
        let expanded = state.toggle(Section::Gas, &ctx);
        let collapsed = state.toggle(Section::Gas, &ctx);
        assert!(!collapsed.expanded);
        assert_eq!(collapsed.affected, expanded.affected);
        assert!(state.visible_paths(Section::Gas, &ctx).is_empty());
    }

    #[test]
    fn test_toggle_only_touches_target() {
        let ctx = RowContext::default();
        for target in sections() {
            let mut state = DisclosureState::new();
            state.toggle(*target, &ctx);
            for other in sections() {
                assert_eq!(state.is_expanded(*other), other == target);
            }
        }
    }

    #[test]
    fn test_double_toggle_restores_membership() {
        for ctx in all_contexts() {
            for section in sections() {
                let mut state = DisclosureState::new();
                state.toggle(Section::Balance, &ctx);
                let before = state.clone();
                state.toggle(*section, &ctx);
                state.toggle(*section, &ctx);
                assert_eq!(state, before);
            }
        }
    }

    #[test]
    fn test_amount_toggles_without_rows() {
        let mut state = DisclosureState::new();
        let result = state.toggle(Section::Amount, &RowContext::default());
        assert!(result.expanded);
        assert!(result.affected.is_empty());
        assert!(state.is_expanded(Section::Amount));
    }
}
