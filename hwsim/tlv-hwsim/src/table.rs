//! Attribute table.
//!
//! Keeps attributes in insertion order, which is also the order the encoder writes them in. Keys
//! are unique. Two tables are equal when they hold the same keys with the same values, whatever
//! the order.

use alloc::vec::Vec;

use crate::{AttrValue, AttributeType};

/// Insertion-ordered mapping from attribute type to value.
#[derive(Debug, Clone, Default, Eq)]
pub struct AttributeTable<'w> {
    entries: Vec<(AttributeType, AttrValue<'w>)>,
}

impl<'w> AttributeTable<'w> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Sets `attr_type` to `value`.
    ///
    /// An existing entry keeps its position and its previous value is returned.
    pub fn insert(
        &mut self,
        attr_type: AttributeType,
        value: impl Into<AttrValue<'w>>,
    ) -> Option<AttrValue<'w>> {
        let value = value.into();
        match self.position(attr_type) {
            Some(idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((attr_type, value));
                None
            }
        }
    }

    /// Builder form of [`AttributeTable::insert`].
    pub fn with(mut self, attr_type: AttributeType, value: impl Into<AttrValue<'w>>) -> Self {
        self.insert(attr_type, value);
        self
    }

    /// Appends `value` to the list stored under `attr_type`, creating the list on first use.
    ///
    /// A non-list value already present becomes the first element of the list.
    pub fn append(&mut self, attr_type: AttributeType, value: impl Into<AttrValue<'w>>) {
        let value = value.into();
        match self.position(attr_type) {
            Some(idx) => {
                let slot = &mut self.entries[idx].1;
                match slot {
                    AttrValue::List(list) => list.push(value),
                    _ => {
                        let first = core::mem::replace(slot, AttrValue::Flag);
                        *slot = AttrValue::List(alloc::vec![first, value]);
                    }
                }
            }
            None => self.entries.push((attr_type, AttrValue::List(alloc::vec![value]))),
        }
    }

    pub fn get(&self, attr_type: AttributeType) -> Option<&AttrValue<'w>> {
        self.entries
            .iter()
            .find(|(t, _)| *t == attr_type)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, attr_type: AttributeType) -> bool {
        self.position(attr_type).is_some()
    }

    /// Removes `attr_type`, keeping the order of the remaining entries.
    pub fn remove(&mut self, attr_type: AttributeType) -> Option<AttrValue<'w>> {
        self.position(attr_type)
            .map(|idx| self.entries.remove(idx).1)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeType, &AttrValue<'w>)> {
        self.entries.iter().map(|(t, v)| (*t, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_flag(&self, attr_type: AttributeType) -> bool {
        matches!(self.get(attr_type), Some(AttrValue::Flag))
    }

    pub fn get_u8(&self, attr_type: AttributeType) -> Option<u8> {
        match self.get(attr_type)? {
            AttrValue::U8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_u32(&self, attr_type: AttributeType) -> Option<u32> {
        match self.get(attr_type)? {
            AttrValue::U32(v) => Some(*v),
            _ => None,
        }
    }

    /// Any unsigned integer attribute, widened.
    pub fn get_u64(&self, attr_type: AttributeType) -> Option<u64> {
        self.get(attr_type)?.as_u64()
    }

    /// Any signed integer attribute, widened.
    pub fn get_i64(&self, attr_type: AttributeType) -> Option<i64> {
        self.get(attr_type)?.as_i64()
    }

    pub fn get_str(&self, attr_type: AttributeType) -> Option<&str> {
        self.get(attr_type)?.as_str()
    }

    pub fn get_bytes(&self, attr_type: AttributeType) -> Option<&[u8]> {
        self.get(attr_type)?.as_bytes()
    }

    pub fn get_nested(&self, attr_type: AttributeType) -> Option<&AttributeTable<'w>> {
        self.get(attr_type)?.as_nested()
    }

    pub fn get_list(&self, attr_type: AttributeType) -> Option<&[AttrValue<'w>]> {
        self.get(attr_type)?.as_list()
    }

    /// Copies any borrowed data so the table no longer depends on the window.
    pub fn into_owned(self) -> AttributeTable<'static> {
        AttributeTable {
            entries: self
                .entries
                .into_iter()
                .map(|(t, v)| (t, v.into_owned()))
                .collect(),
        }
    }

    fn position(&self, attr_type: AttributeType) -> Option<usize> {
        self.entries.iter().position(|(t, _)| *t == attr_type)
    }
}

impl PartialEq for AttributeTable<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(t, v)| other.get(*t).is_some_and(|o| o == v))
    }
}

impl<'w, V: Into<AttrValue<'w>>> FromIterator<(AttributeType, V)> for AttributeTable<'w> {
    fn from_iter<I: IntoIterator<Item = (AttributeType, V)>>(iter: I) -> Self {
        let mut table = AttributeTable::new();
        for (t, v) in iter {
            table.insert(t, v);
        }
        table
    }
}
