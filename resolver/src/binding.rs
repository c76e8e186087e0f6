//! Registration records: bindings, contextual overrides and callbacks.

use crate::container::Container;
use crate::error::Result;
use crate::object::Object;
use crate::parameters::Parameters;
use std::fmt;
use std::sync::Arc;

/// A manual construction strategy. Receives the container and the caller's
/// raw parameter overrides; its output is used as-is.
pub type Factory = Arc<dyn Fn(&Container, &Parameters) -> Result<Object> + Send + Sync>;

/// Transforms a resolved object into the object actually handed out.
pub type Decorator = Arc<dyn Fn(Object, &Container) -> Result<Object> + Send + Sync>;

pub type ResolvingListener = Arc<dyn Fn(&Object) + Send + Sync>;

pub type ReboundListener = Arc<dyn Fn() + Send + Sync>;

/// What a key is bound to.
#[derive(Clone)]
pub enum Concrete {
  Factory(Factory),
  /// Another key: either the bound key itself (build it directly) or an alias.
  Type(String),
}

impl Concrete {
  pub fn factory<F>(factory: F) -> Self
  where
    F: Fn(&Container, &Parameters) -> Result<Object> + Send + Sync + 'static,
  {
    Concrete::Factory(Arc::new(factory))
  }

  pub fn type_key(key: &str) -> Self {
    Concrete::Type(crate::core::canonical_key(key))
  }
}

impl fmt::Debug for Concrete {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Concrete::Factory(_) => f.write_str("Factory(..)"),
      Concrete::Type(key) => f.debug_tuple("Type").field(key).finish(),
    }
  }
}

#[derive(Clone, Debug)]
pub(crate) struct Binding {
  pub(crate) concrete: Concrete,
  pub(crate) shared: bool,
}

/// What a consumer receives instead of the global binding for a dependency.
#[derive(Clone)]
pub enum Override {
  Value(Object),
  Type(String),
  Factory(Factory),
}

impl Override {
  pub fn value<T: std::any::Any + Send + Sync>(value: T) -> Self {
    Override::Value(Object::new(value))
  }

  pub fn type_key(key: &str) -> Self {
    Override::Type(crate::core::canonical_key(key))
  }

  pub fn factory<F>(factory: F) -> Self
  where
    F: Fn(&Container, &Parameters) -> Result<Object> + Send + Sync + 'static,
  {
    Override::Factory(Arc::new(factory))
  }
}

impl fmt::Debug for Override {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Override::Value(object) => f.debug_tuple("Value").field(object).finish(),
      Override::Type(key) => f.debug_tuple("Type").field(key).finish(),
      Override::Factory(_) => f.write_str("Factory(..)"),
    }
  }
}
