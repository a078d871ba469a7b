use crate::Record;

/// Which attributes serialisation exposes: `visible` restricts first, then `hidden` removes.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct VisibilityPolicy {
    hidden: Vec<String>,
    visible: Vec<String>,
}

impl VisibilityPolicy {
    pub fn new(hidden: Vec<String>, visible: Vec<String>) -> Self {
        Self { hidden, visible }
    }

    pub fn hidden(&self) -> &[String] {
        &self.hidden
    }

    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    pub fn set_hidden<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.hidden = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_visible<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.visible = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Unhides `keys`, and adds them to `visible` when that list is in use.
    pub fn make_visible<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        for key in keys {
            let key = key.into();
            self.hidden.retain(|v| *v != key);
            if !self.visible.is_empty() && !self.visible.contains(&key) {
                self.visible.push(key);
            }
        }
        self
    }

    pub fn make_hidden<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        for key in keys {
            let key = key.into();
            if !self.hidden.contains(&key) {
                self.hidden.push(key);
            }
        }
        self
    }

    pub fn is_visible(&self, key: &str) -> bool {
        (self.visible.is_empty() || self.visible.iter().any(|v| v == key))
            && !self.hidden.iter().any(|v| v == key)
    }

    pub fn filter(&self, attributes: &Record) -> Record {
        attributes
            .iter()
            .filter(|(k, _)| self.is_visible(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
