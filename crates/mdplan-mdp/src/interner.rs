use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Requirements on state and action labels.
///
/// Labels are opaque: tuples, integers and strings all qualify. `Debug` is only
/// used to name labels in errors and reports.
pub trait Label: Clone + Eq + Hash + fmt::Debug {}

impl<T> Label for T where T: Clone + Eq + Hash + fmt::Debug {}

/// Render a label for an error message.
pub(crate) fn describe(label: &impl fmt::Debug) -> String {
    format!("{label:?}")
}

/// Ordered set of labels with stable dense keys.
///
/// Keys are positions in insertion order and never change once assigned.
#[derive(Debug, Clone)]
pub struct Interner<T>
where
    T: Clone + Eq + Hash,
{
    items: Vec<T>,
    item_to_key: HashMap<T, usize>,
}

impl<T> Default for Interner<T>
where
    T: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self {
            items: Vec::new(),
            item_to_key: HashMap::new(),
        }
    }
}

impl<T> Interner<T>
where
    T: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the item if needed and return its key.
    pub fn intern(&mut self, item: T) -> usize {
        if let Some(key) = self.item_to_key.get(&item) {
            return *key;
        }
        self.push(item)
    }

    /// Insert a new item, or return `None` if it is already present.
    pub fn insert_unique(&mut self, item: T) -> Option<usize> {
        if self.item_to_key.contains_key(&item) {
            return None;
        }
        Some(self.push(item))
    }

    fn push(&mut self, item: T) -> usize {
        let key = self.items.len();
        self.items.push(item.clone());
        self.item_to_key.insert(item, key);
        key
    }

    pub fn get(&self, key: usize) -> Option<&T> {
        self.items.get(key)
    }

    pub fn key_of(&self, item: &T) -> Option<usize> {
        self.item_to_key.get(item).copied()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
