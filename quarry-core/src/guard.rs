use crate::Record;

/// Mass assignment rules.
///
/// A guarded policy only lets the fillable keys through, with no fillable key
/// nothing passes. An unguarded one lets everything through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    fillable: Vec<String>,
    guarded: bool,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            fillable: Vec::new(),
            guarded: true,
        }
    }
}

impl GuardPolicy {
    pub fn new(fillable: Vec<String>, guarded: bool) -> Self {
        Self { fillable, guarded }
    }

    pub fn fillable(&self) -> &[String] {
        &self.fillable
    }

    pub fn set_fillable<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.fillable = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Adds the keys not already fillable.
    pub fn merge_fillable<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        for key in keys {
            let key = key.into();
            if !self.fillable.contains(&key) {
                self.fillable.push(key);
            }
        }
        self
    }

    pub fn is_guarded(&self) -> bool {
        self.guarded
    }

    pub fn guard(&mut self) -> &mut Self {
        self.guarded = true;
        self
    }

    pub fn unguard(&mut self) -> &mut Self {
        self.guarded = false;
        self
    }

    pub fn is_fillable(&self, key: &str) -> bool {
        !self.guarded || self.fillable.iter().any(|v| v == key)
    }

    /// The subset of `attributes` allowed through.
    pub fn fillable_from(&self, attributes: Record) -> Record {
        if !self.guarded {
            return attributes;
        }
        if self.fillable.is_empty() {
            if !attributes.is_empty() {
                log::debug!("Every attribute discarded, the model has no fillable key");
            }
            return Record::new();
        }
        attributes
            .into_iter()
            .filter(|(k, _)| self.is_fillable(k))
            .collect()
    }
}
