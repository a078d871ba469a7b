use crate::{Record, RowLabeled, Value};
use std::{ops::Index, slice, vec};

/// Serialisable to a column map, rows and models are.
pub trait ToArray {
    fn to_array(&self) -> Record;

    /// Single column, `NULL` when absent.
    fn column(&self, name: &str) -> Value {
        self.to_array().remove(name).unwrap_or_default()
    }
}

impl ToArray for RowLabeled {
    fn to_array(&self) -> Record {
        self.clone().into_record()
    }
    fn column(&self, name: &str) -> Value {
        self.get_column(name).cloned().unwrap_or_default()
    }
}

impl ToArray for Record {
    fn to_array(&self) -> Record {
        self.clone()
    }
    fn column(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }
}

/// Ordered list of rows or models, in the order the server returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
    pub fn push(&mut self, item: T) -> &mut Self {
        self.items.push(item);
        self
    }
    pub fn all(&self) -> &[T] {
        &self.items
    }
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }
    pub fn first_where(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|v| predicate(v))
    }
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Collection<U> {
        self.items.into_iter().map(f).collect()
    }
    pub fn filter(self, predicate: impl Fn(&T) -> bool) -> Self {
        self.items.into_iter().filter(|v| predicate(v)).collect()
    }
    pub fn each(&mut self, f: impl FnMut(&mut T)) -> &mut Self {
        self.items.iter_mut().for_each(f);
        self
    }
}

impl<T: ToArray> Collection<T> {
    /// Values of one column, `NULL` where an item lacks it.
    pub fn pluck(&self, column: &str) -> Vec<Value> {
        self.items.iter().map(|v| v.column(column)).collect()
    }

    /// Column values rendered and joined with `glue`.
    pub fn implode(&self, column: &str, glue: &str) -> String {
        let mut out = String::new();
        crate::separated_by(
            &mut out,
            self.items.iter(),
            |out, v| out.push_str(&v.column(column).to_string()),
            glue,
        );
        out
    }

    pub fn to_array(&self) -> Vec<Record> {
        self.items.iter().map(ToArray::to_array).collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.items
                .iter()
                .map(|item| {
                    serde_json::Value::Object(
                        item.to_array()
                            .into_iter()
                            .map(|(k, v)| (k, v.to_json()))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

impl Collection<RowLabeled> {
    /// Column labels of the first row.
    pub fn keys(&self) -> Vec<String> {
        self.items
            .first()
            .map(|v| v.names().to_vec())
            .unwrap_or_default()
    }
}

impl<T> Index<usize> for Collection<T> {
    type Output = T;
    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = vec::IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> Extend<T> for Collection<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}
