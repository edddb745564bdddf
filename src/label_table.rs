//! Mapping between label names and program addresses.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

use crate::error::LabelError;

/// Label names and the addresses of the instructions they were attached to.
///
/// A name can be bound only once. Filled in by the [Translator](crate::translator::Translator) and
/// consulted by `jnz` at run time.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    inner: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        LabelTable {
            inner: HashMap::new(),
        }
    }

    /// Binds `label` to `address`.
    ///
    /// # Errors
    /// [LabelError::DuplicateLabel] if the label is already bound. The existing binding is kept.
    pub fn add_label<S: Into<String>>(&mut self, label: S, address: usize) -> Result<(), LabelError> {
        match self.inner.entry(label.into()) {
            Entry::Occupied(entry) => Err(LabelError::DuplicateLabel {
                label: entry.key().clone(),
                address: *entry.get(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(address);
                Ok(())
            }
        }
    }

    /// Returns the address bound to `label`.
    ///
    /// # Errors
    /// [LabelError::UnknownLabel] if the label has not been bound.
    pub fn get_address(&self, label: &str) -> Result<usize, LabelError> {
        self.inner
            .get(label)
            .copied()
            .ok_or_else(|| LabelError::UnknownLabel { label: label.to_string() })
    }

    /// Removes all labels.
    pub fn reset(&mut self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the labels ordered by address, ties broken by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.inner
            .iter()
            .map(|(label, address)| (label.as_str(), *address))
            .sorted_by(|a, b| (a.1, a.0).cmp(&(b.1, b.0)))
    }
}

impl fmt::Display for LabelTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.iter().map(|(label, address)| format!("{} -> {}", label, address)).join(", ")
        )
    }
}
