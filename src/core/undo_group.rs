//! Edit groups
//!
//! A group is the unit of undo/redo and of rollback. Commands open a group,
//! apply any number of edits, then either commit it or roll it back so the
//! buffer never keeps half of a command.

use super::buffer::Edit;

/// A group of edits that are undone/redone together
#[derive(Debug, Clone, Default)]
pub struct UndoGroup {
    /// The edits that belong to this group, in application order
    pub edits: Vec<Edit>,
    /// Optional description of what this group represents
    pub description: Option<String>,
}

impl UndoGroup {
    /// Create a new empty undo group
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an undo group with a specific description
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            edits: Vec::new(),
            description: Some(description.into()),
        }
    }

    /// Add an edit to this group
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Position the cursor should return to after this group is undone
    pub fn anchor_position(&self) -> Option<usize> {
        self.edits.iter().map(Edit::position).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ropey::Rope;

    #[test]
    fn test_group_description_and_len() {
        let mut group = UndoGroup::with_description("delete-towards");
        assert!(group.is_empty());
        group.add_edit(Edit::Insert {
            pos: 4,
            text: Rope::from_str("x"),
        });
        group.add_edit(Edit::Delete {
            pos: 2,
            text: Rope::from_str("yz"),
        });
        assert_eq!(group.len(), 2);
        assert_eq!(group.description.as_deref(), Some("delete-towards"));
        assert_eq!(group.anchor_position(), Some(2));
    }
}
