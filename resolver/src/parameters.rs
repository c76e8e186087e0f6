//! Caller-supplied argument overrides for `make_with` and `call`.

use crate::descriptor::ParamDescriptor;
use crate::object::Object;
use std::any::Any;

/// How an override entry addresses the parameter it replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKey {
  Name(String),
  Position(usize),
}

/// An ordered set of parameter overrides.
///
/// Entries may be addressed by name or by position, and keep their insertion
/// order so unconsumed overrides can be passed through positionally by
/// [`Container::call`](crate::Container::call).
#[derive(Debug, Clone, Default)]
pub struct Parameters {
  entries: Vec<(ParamKey, Object)>,
}

impl Parameters {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds a purely positional list, numbered from zero.
  pub fn positional<I>(values: I) -> Self
  where
    I: IntoIterator<Item = Object>,
  {
    let entries = values
      .into_iter()
      .enumerate()
      .map(|(position, value)| (ParamKey::Position(position), value))
      .collect();
    Self { entries }
  }

  /// Adds (or replaces) an override for the parameter called `name`.
  pub fn with<T: Any + Send + Sync>(self, name: &str, value: T) -> Self {
    self.with_object(name, Object::new(value))
  }

  pub fn with_object(mut self, name: &str, value: Object) -> Self {
    self.insert(ParamKey::Name(name.to_owned()), value);
    self
  }

  /// Adds (or replaces) an override for the parameter at `position`.
  pub fn at<T: Any + Send + Sync>(mut self, position: usize, value: T) -> Self {
    self.insert(ParamKey::Position(position), Object::new(value));
    self
  }

  /// Appends a value at the next free position.
  pub fn push<T: Any + Send + Sync>(self, value: T) -> Self {
    self.push_object(Object::new(value))
  }

  /// Positions saturate at `usize::MAX`, where a push replaces the entry.
  pub fn push_object(mut self, value: Object) -> Self {
    let next = self
      .entries
      .iter()
      .filter_map(|(key, _)| match key {
        ParamKey::Position(p) => Some(p.saturating_add(1)),
        ParamKey::Name(_) => None,
      })
      .max()
      .unwrap_or(0);
    self.insert(ParamKey::Position(next), value);
    self
  }

  pub fn get(&self, name: &str) -> Option<&Object> {
    self.entries.iter().find_map(|(key, value)| match key {
      ParamKey::Name(n) if n == name => Some(value),
      _ => None,
    })
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, &Object)> {
    self.entries.iter().map(|(key, value)| (key, value))
  }

  fn insert(&mut self, key: ParamKey, value: Object) {
    match self.entries.iter_mut().find(|(k, _)| *k == key) {
      Some(slot) => slot.1 = value,
      None => self.entries.push((key, value)),
    }
  }

  /// Rewrites positional entries to the name of the declared parameter at
  /// that position. Positions past the end of `declared` stay positional.
  pub(crate) fn keyed_by(&self, declared: &[ParamDescriptor]) -> Parameters {
    let mut keyed = Parameters::new();
    for (key, value) in &self.entries {
      let key = match key {
        ParamKey::Position(p) => match declared.get(*p) {
          Some(param) => ParamKey::Name(param.name().to_owned()),
          None => ParamKey::Position(*p),
        },
        named => named.clone(),
      };
      keyed.insert(key, value.clone());
    }
    keyed
  }

  /// Removes and returns the override named `name`.
  pub(crate) fn take(&mut self, name: &str) -> Option<Object> {
    let index = self
      .entries
      .iter()
      .position(|(key, _)| matches!(key, ParamKey::Name(n) if n == name))?;
    Some(self.entries.remove(index).1)
  }

  pub(crate) fn into_values(self) -> impl Iterator<Item = (ParamKey, Object)> {
    self.entries.into_iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn declared() -> Vec<ParamDescriptor> {
    vec![
      ParamDescriptor::primitive("first"),
      ParamDescriptor::class("stub", "TestStub"),
      ParamDescriptor::primitive("last"),
    ]
  }

  #[test]
  fn positions_are_keyed_by_declared_names() {
    let params = Parameters::new().at(0, "mark").at(2, "topper");
    let keyed = params.keyed_by(&declared());

    assert_eq!(
      keyed.get("first").and_then(|o| o.downcast_ref::<&str>().copied()),
      Some("mark")
    );
    assert_eq!(
      keyed.get("last").and_then(|o| o.downcast_ref::<&str>().copied()),
      Some("topper")
    );
    assert!(keyed.get("stub").is_none());
  }

  #[test]
  fn positions_past_the_signature_stay_positional() {
    let params = Parameters::positional([Object::new(1), Object::new(2), Object::new(3), Object::new(4)]);
    let keyed = params.keyed_by(&declared());
    let keys: Vec<_> = keyed.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(
      keys,
      vec![
        ParamKey::Name("first".into()),
        ParamKey::Name("stub".into()),
        ParamKey::Name("last".into()),
        ParamKey::Position(3),
      ]
    );
  }

  #[test]
  fn push_continues_after_the_highest_position() {
    let params = Parameters::new().at(3, 'a').with("name", 'b').push('c');
    let keys: Vec<_> = params.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys[2], ParamKey::Position(4));
  }

  #[test]
  fn push_after_the_last_position_replaces_instead_of_wrapping() {
    let params = Parameters::new().at(usize::MAX, 'a').push('b');
    let entries: Vec<_> = params
      .iter()
      .map(|(k, v)| (k.clone(), *v.downcast_ref::<char>().unwrap()))
      .collect();
    assert_eq!(entries, vec![(ParamKey::Position(usize::MAX), 'b')]);
  }

  #[test]
  fn take_consumes_named_entries_only() {
    let mut params = Parameters::new().push(1_u8).with("bar", 2_u8);
    assert!(params.take("bar").is_some());
    assert!(params.take("bar").is_none());
    assert_eq!(params.len(), 1);
  }
}
