//! Dynamic array of unique strings

use crate::config::doubled;
use crate::error::{Error, Result};

/// Initial capacity used by [`ArraySet::new`]
pub const DEFAULT_SET_CAPACITY: usize = 10;

/// Insertion-ordered set of unique strings backed by a growable array
///
/// Membership checks are linear; capacity doubles when an insert finds the
/// array full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySet {
    items: Vec<String>,
    capacity: usize,
}

impl Default for ArraySet {
    fn default() -> Self {
        Self::new()
    }
}

impl ArraySet {
    /// Create an empty set with room for 10 members
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(DEFAULT_SET_CAPACITY),
            capacity: DEFAULT_SET_CAPACITY,
        }
    }

    /// Create an empty set with room for `capacity` members
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items, capacity })
    }

    /// Add `value`; returns `false` if it was already a member
    pub fn insert(&mut self, value: &str) -> Result<bool> {
        if self.contains(value) {
            return Ok(false);
        }

        if self.items.len() >= self.capacity {
            self.grow()?;
        }

        self.items.push(value.to_owned());
        Ok(true)
    }

    /// Check membership
    pub fn contains(&self, value: &str) -> bool {
        self.items.iter().any(|item| item == value)
    }

    /// Remove `value`, shifting later members left; returns `false` if absent
    pub fn remove(&mut self, value: &str) -> bool {
        match self.items.iter().position(|item| item == value) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Members the set can hold before it next doubles
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(String::as_str)
    }

    fn grow(&mut self) -> Result<()> {
        let new_capacity = doubled(self.capacity)?;
        self.items.try_reserve_exact(new_capacity - self.items.len())?;
        self.capacity = new_capacity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_unique() {
        let mut set = ArraySet::new();

        assert!(set.insert("apple").unwrap());
        assert!(set.insert("pear").unwrap());
        assert!(!set.insert("apple").unwrap());

        assert_eq!(set.len(), 2);
        assert!(set.contains("apple"));
        assert!(!set.contains("plum"));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut set = ArraySet::new();
        for word in ["a", "b", "c", "d"] {
            set.insert(word).unwrap();
        }

        assert!(set.remove("b"));
        assert!(!set.remove("b"));

        let members: Vec<_> = set.iter().collect();
        assert_eq!(members, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_capacity_doubles() {
        let mut set = ArraySet::with_capacity(2).unwrap();

        set.insert("x").unwrap();
        set.insert("y").unwrap();
        assert_eq!(set.capacity(), 2);

        set.insert("z").unwrap();
        assert_eq!(set.capacity(), 4);

        for i in 0..2 {
            set.insert(&format!("w{}", i)).unwrap();
        }
        assert_eq!(set.capacity(), 8);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_duplicate_does_not_grow() {
        let mut set = ArraySet::with_capacity(1).unwrap();
        set.insert("only").unwrap();
        set.insert("only").unwrap();
        assert_eq!(set.capacity(), 1);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(ArraySet::with_capacity(0), Err(Error::InvalidCapacity(0)));
    }

    #[test]
    fn test_alloc_failure_reported() {
        assert!(matches!(
            ArraySet::with_capacity(usize::MAX),
            Err(Error::Alloc(_))
        ));
    }
}
