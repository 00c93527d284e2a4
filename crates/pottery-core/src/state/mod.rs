use std::{
    collections::BTreeMap,
    sync::{Arc, PoisonError, RwLock},
};

use pottery_model::Field;

/// Current value of every named field.
///
/// Shared between the user (direct edits) and the view synchronizer (values extracted
/// from successful responses). Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct FieldStore {
    inner: Arc<RwLock<BTreeMap<Field, String>>>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a field with a new value.
    pub fn set(&self, field: Field, value: impl Into<String>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.insert(field, value.into());
    }

    /// Remove a field; returns the previous value.
    pub fn clear(&self, field: Field) -> Option<String> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.remove(&field)
    }

    /// Raw value of a field, blank or not.
    pub fn get(&self, field: Field) -> Option<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.get(&field).cloned()
    }

    /// Immutable copy of all fields, taken under a single read lock.
    pub fn snapshot(&self) -> FieldSnapshot {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        FieldSnapshot {
            values: inner.clone(),
        }
    }
}

/// Point-in-time view of a [`FieldStore`], ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSnapshot {
    values: BTreeMap<Field, String>,
}

impl FieldSnapshot {
    /// Value of a field, or `None` when it is absent or blank.
    pub fn value(&self, field: Field) -> Option<&str> {
        self.values
            .get(&field)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V: Into<String>> FromIterator<(Field, V)> for FieldSnapshot {
    fn from_iter<I: IntoIterator<Item = (Field, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(f, v)| (f, v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_and_overwrite() {
        let store = FieldStore::new();
        assert!(store.get(Field::TaskId).is_none());

        store.set(Field::TaskId, "first");
        store.set(Field::TaskId, "second");
        assert_eq!(store.get(Field::TaskId).as_deref(), Some("second"));
    }

    #[test]
    fn clear_returns_previous() {
        let store = FieldStore::new();
        store.set(Field::RepoId, "r1");
        assert_eq!(store.clear(Field::RepoId).as_deref(), Some("r1"));
        assert!(store.get(Field::RepoId).is_none());
        assert!(store.clear(Field::RepoId).is_none());
    }

    #[test]
    fn clones_share_state() {
        let store = FieldStore::new();
        let other = store.clone();
        other.set(Field::RepoTag, "HEAD");
        assert_eq!(store.get(Field::RepoTag).as_deref(), Some("HEAD"));
    }

    #[test]
    fn snapshot_is_detached() {
        let store = FieldStore::new();
        store.set(Field::TaskId, "T1");
        let snap = store.snapshot();

        store.set(Field::TaskId, "T2");
        assert_eq!(snap.value(Field::TaskId), Some("T1"));
        assert_eq!(store.snapshot().value(Field::TaskId), Some("T2"));
    }

    #[test]
    fn blank_values_read_as_absent() {
        let store = FieldStore::new();
        store.set(Field::Sha1, "");
        store.set(Field::Variant, " \t");

        let snap = store.snapshot();
        assert_eq!(snap.len(), 2);
        assert!(snap.value(Field::Sha1).is_none());
        assert!(snap.value(Field::Variant).is_none());
    }

    #[test]
    fn snapshot_iterates_in_field_order() {
        let snap: FieldSnapshot = [(Field::StepName, "s"), (Field::TaskId, "t")]
            .into_iter()
            .collect();
        let fields: Vec<_> = snap.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![Field::TaskId, Field::StepName]);
    }
}
