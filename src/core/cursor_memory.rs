//! Cursor offsets remembered per text source

use std::collections::HashMap;

/// Last known cursor offset of every source loaded in this session
#[derive(Debug, Clone, Default)]
pub struct CursorMemory {
    offsets: HashMap<String, usize>,
}

impl CursorMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `offset` for `identifier`; offset 0 is the default and is
    /// not stored, so it also forgets an older entry
    pub fn remember(&mut self, identifier: &str, offset: usize) {
        if offset == 0 {
            self.offsets.remove(identifier);
        } else {
            self.offsets.insert(identifier.to_string(), offset);
        }
    }

    pub fn recall(&self, identifier: &str) -> Option<usize> {
        self.offsets.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut memory = CursorMemory::new();
        memory.remember("node1", 12);
        memory.remember("node1", 30);
        memory.remember("node2", 4);
        assert_eq!(memory.recall("node1"), Some(30));
        assert_eq!(memory.recall("node2"), Some(4));
        assert_eq!(memory.recall("node3"), None);
    }

    #[test]
    fn test_zero_is_not_stored() {
        let mut memory = CursorMemory::new();
        memory.remember("a", 0);
        assert!(memory.is_empty());
        memory.remember("a", 5);
        memory.remember("a", 0);
        assert_eq!(memory.recall("a"), None);
    }
}
