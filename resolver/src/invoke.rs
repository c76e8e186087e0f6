//! Invoking functions and methods with container-resolved arguments.

use crate::container::Container;
use crate::core::canonical_key;
use crate::descriptor::{signature_builders, Arguments, ParamDescriptor, ParamKind};
use crate::error::{BindingError, Result};
use crate::object::Object;
use crate::parameters::{ParamKey, Parameters};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

type FunctionFn = Arc<dyn Fn(Arguments) -> Result<Object> + Send + Sync>;

/// A free function or closure together with its declared signature.
///
/// A function that declares no parameters is treated as non-reflectable:
/// every override passed to [`Container::call`] is handed to it positionally.
#[derive(Clone)]
pub struct FunctionRef {
  name: String,
  parameters: Vec<ParamDescriptor>,
  body: FunctionFn,
}

impl FunctionRef {
  pub fn new<F>(body: F) -> Self
  where
    F: Fn(Arguments) -> Result<Object> + Send + Sync + 'static,
  {
    Self {
      name: String::from("{closure}"),
      parameters: Vec::new(),
      body: Arc::new(body),
    }
  }

  /// Names the function in diagnostics.
  pub fn named(mut self, name: &str) -> Self {
    self.name = name.to_owned();
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

signature_builders!(FunctionRef);

impl fmt::Debug for FunctionRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FunctionRef")
      .field("name", &self.name)
      .field("parameters", &self.parameters)
      .finish_non_exhaustive()
  }
}

/// Something [`Container::call`] can invoke.
#[derive(Debug, Clone)]
pub enum Callable {
  Function(FunctionRef),
  /// A method on an already resolved receiver.
  Bound { receiver: Object, method: String },
  /// A method on whatever `type_key` resolves to. With no method named, the
  /// caller must supply a default method.
  Unbound {
    type_key: String,
    method: Option<String>,
  },
}

impl Callable {
  pub fn bound(receiver: Object, method: &str) -> Self {
    Callable::Bound {
      receiver,
      method: method.to_owned(),
    }
  }

  pub fn unbound(type_key: &str, method: &str) -> Self {
    Callable::Unbound {
      type_key: canonical_key(type_key),
      method: Some(method.to_owned()),
    }
  }

  /// Parses `"TypeKey@method"` or a bare `"TypeKey"`.
  pub fn parse(target: &str) -> Result<Self> {
    let invalid = || BindingError::InvalidArgument(format!("cannot call [{}]", target));
    match target.split_once('@') {
      Some((type_key, method)) => {
        if type_key.is_empty() || method.is_empty() || method.contains('@') {
          return Err(invalid());
        }
        Ok(Callable::unbound(type_key, method))
      }
      None if target.is_empty() => Err(invalid()),
      None => Ok(Callable::Unbound {
        type_key: canonical_key(target),
        method: None,
      }),
    }
  }
}

impl FromStr for Callable {
  type Err = BindingError;

  fn from_str(s: &str) -> Result<Self> {
    Callable::parse(s)
  }
}

impl From<FunctionRef> for Callable {
  fn from(function: FunctionRef) -> Self {
    Callable::Function(function)
  }
}

impl Container {
  /// Invokes `target`, resolving its arguments through the container.
  ///
  /// Named overrides in `parameters` win; class-typed parameters are made;
  /// primitive parameters fall back to their default or are left out. Any
  /// overrides not consumed by name are appended in their original order.
  /// The target's return value is passed back unmodified.
  pub fn call(&self, target: impl Into<Callable>, parameters: &Parameters, default_method: Option<&str>) -> Result<Object> {
    match target.into() {
      Callable::Function(function) => {
        let arguments = self.call_arguments(function.name(), function.parameters(), parameters)?;
        (function.body)(arguments)
      }
      Callable::Bound { receiver, method } => self.call_method(&receiver, &method, parameters),
      Callable::Unbound { type_key, method } => {
        let method = method
          .or_else(|| default_method.map(str::to_owned))
          .ok_or_else(|| BindingError::InvalidArgument(format!("method not provided for [{}]", type_key)))?;
        let receiver = self.make(&type_key)?;
        self.call_method(&receiver, &method, parameters)
      }
    }
  }

  fn call_method(&self, receiver: &Object, method: &str, parameters: &Parameters) -> Result<Object> {
    let descriptor = self
      .inner
      .type_keys
      .get(&receiver.concrete_type_id())
      .map(|key| key.value().clone())
      .and_then(|key| self.inner.types.get(&key).map(|entry| entry.value().clone()));

    let missing = |target: &str| BindingError::MissingMethod {
      target: target.to_owned(),
      method: method.to_owned(),
    };
    let descriptor = descriptor.ok_or_else(|| missing(receiver.type_name()))?;
    let found = descriptor
      .find_method(method)
      .cloned()
      .ok_or_else(|| missing(descriptor.key()))?;

    let owner = format!("{}@{}", descriptor.key(), method);
    let arguments = self.call_arguments(&owner, found.parameters(), parameters)?;
    found.invoke(receiver, arguments)
  }

  fn call_arguments(&self, owner: &str, declared: &[ParamDescriptor], parameters: &Parameters) -> Result<Arguments> {
    let mut remaining = parameters.clone();
    let mut arguments = Arguments::new(owner);

    for parameter in declared {
      if let Some(value) = remaining.take(parameter.name()) {
        arguments.push(Some(parameter.name()), value);
        continue;
      }
      match parameter.kind() {
        ParamKind::Class(type_key) => arguments.push(Some(parameter.name()), self.make(type_key)?),
        ParamKind::Primitive => {
          if let Some(default) = parameter.default_value() {
            arguments.push(Some(parameter.name()), default.clone());
          }
        }
      }
    }

    for (key, value) in remaining.into_values() {
      match key {
        ParamKey::Name(name) => arguments.push(Some(&name), value),
        ParamKey::Position(_) => arguments.push(None, value),
      }
    }
    Ok(arguments)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_type_and_method() {
    match Callable::parse("\\Mailer@send").unwrap() {
      Callable::Unbound { type_key, method } => {
        assert_eq!(type_key, "Mailer");
        assert_eq!(method.as_deref(), Some("send"));
      }
      other => panic!("unexpected callable: {:?}", other),
    }
  }

  #[test]
  fn bare_type_has_no_method() {
    let callable: Callable = "Mailer".parse().unwrap();
    assert!(matches!(callable, Callable::Unbound { method: None, .. }));
  }

  #[test]
  fn malformed_targets_are_rejected() {
    for target in ["", "@send", "Mailer@", "Mailer@send@now"] {
      assert!(
        matches!(Callable::parse(target), Err(BindingError::InvalidArgument(_))),
        "{} should be rejected",
        target
      );
    }
  }
}
