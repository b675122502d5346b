//! Ordered selection state for one picker.

use std::fmt;

use sprout_types::DuplicatePolicy;

/// Opaque handle identifying one selection row.
///
/// Tokens are never reused within a [`SelectionSet`], so a token held by a
/// view after its row was removed simply stops matching anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowToken(u64);

impl fmt::Display for RowToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRow {
    pub token: RowToken,
    pub id: String,
}

/// Entities chosen by the user, in display order.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    rows: Vec<SelectedRow>,
    next_token: u64,
    policy: DuplicatePolicy,
}

impl SelectionSet {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            rows: Vec::new(),
            next_token: 0,
            policy,
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Appends a row for `id`. Returns `None` when the duplicate policy
    /// refuses an id that is already selected.
    pub fn add(&mut self, id: impl Into<String>) -> Option<RowToken> {
        let id = id.into();
        if self.policy == DuplicatePolicy::Reject && self.contains(&id) {
            return None;
        }
        let token = RowToken(self.next_token);
        self.next_token += 1;
        self.rows.push(SelectedRow { token, id });
        Some(token)
    }

    /// Removes exactly the row behind `token`. Unknown tokens are ignored.
    pub fn remove(&mut self, token: RowToken) -> Option<SelectedRow> {
        let position = self.rows.iter().position(|row| row.token == token)?;
        Some(self.rows.remove(position))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.iter().any(|row| row.id == id)
    }

    pub fn rows(&self) -> &[SelectedRow] {
        &self.rows
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_insertion_order() {
        let mut selection = SelectionSet::default();
        selection.add("b");
        selection.add("a");
        selection.add("c");
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn remove_takes_only_the_tokened_row() {
        let mut selection = SelectionSet::new(DuplicatePolicy::Allow);
        let first = selection.add("kale").unwrap();
        let second = selection.add("kale").unwrap();
        assert_ne!(first, second);

        let removed = selection.remove(first).expect("row removed");
        assert_eq!(removed.token, first);
        assert_eq!(selection.rows(), &[SelectedRow { token: second, id: "kale".into() }]);
    }

    #[test]
    fn removing_absent_row_is_a_no_op() {
        let mut selection = SelectionSet::default();
        let token = selection.add("kale").unwrap();
        selection.remove(token);
        assert!(selection.remove(token).is_none());
        assert!(selection.is_empty());
    }

    #[test]
    fn reject_policy_ignores_repeat_ids() {
        let mut selection = SelectionSet::new(DuplicatePolicy::Reject);
        assert!(selection.add("kale").is_some());
        assert!(selection.add("kale").is_none());
        assert!(selection.add("basil").is_some());
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn tokens_are_not_reused_after_removal() {
        let mut selection = SelectionSet::default();
        let first = selection.add("kale").unwrap();
        selection.remove(first);
        let second = selection.add("kale").unwrap();
        assert_ne!(first, second);
    }
}
