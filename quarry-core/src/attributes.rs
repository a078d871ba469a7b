use crate::{Record, Value};

/// Current attributes of a model, the snapshot they are diffed against and
/// the diff recorded by the last update.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct AttributeStore {
    attributes: Record,
    original: Record,
    changes: Record,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every attribute, `sync` also takes them as the original snapshot.
    pub fn set_raw(&mut self, attributes: Record, sync: bool) -> &mut Self {
        self.attributes = attributes;
        if sync {
            self.sync_original();
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    pub fn attributes(&self) -> &Record {
        &self.attributes
    }

    pub fn original(&self) -> &Record {
        &self.original
    }

    pub fn changes(&self) -> &Record {
        &self.changes
    }

    pub fn sync_original(&mut self) -> &mut Self {
        self.original = self.attributes.clone();
        self
    }

    pub fn sync_changes(&mut self) -> &mut Self {
        self.changes = self.dirty();
        self
    }

    /// Same key in the snapshot with an equal value.
    pub fn original_is_equivalent(&self, key: &str) -> bool {
        match (self.attributes.get(key), self.original.get(key)) {
            (Some(current), Some(original)) => current == original,
            (None, Some(..)) => true,
            _ => false,
        }
    }

    /// Attributes missing from the snapshot or different from it.
    pub fn dirty(&self) -> Record {
        self.attributes
            .iter()
            .filter(|(k, _)| !self.original_is_equivalent(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.attributes
            .keys()
            .any(|k| !self.original_is_equivalent(k))
    }

    /// Whether any of `keys` is dirty.
    pub fn is_dirty_any<K: AsRef<str>>(&self, keys: impl IntoIterator<Item = K>) -> bool {
        keys.into_iter().any(|k| {
            let k = k.as_ref();
            self.attributes.contains_key(k) && !self.original_is_equivalent(k)
        })
    }
}
