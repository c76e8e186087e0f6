//! Explicit signature metadata the container resolves against.
//!
//! Rust has no runtime reflection, so every type the container may construct
//! on its own is described up front: its key, whether it can be instantiated,
//! the ordered parameters of its constructor and the methods `call` may
//! invoke on it. The resolver never looks at anything but these descriptors.

use crate::error::{BindingError, Result};
use crate::object::Object;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub(crate) type ConstructorFn = Arc<dyn Fn(Arguments) -> Result<Object> + Send + Sync>;
pub(crate) type MethodFn = Arc<dyn Fn(&Object, Arguments) -> Result<Object> + Send + Sync>;

/// What kind of value a parameter expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
  /// An object the container can `make`, identified by its key.
  Class(String),
  /// A scalar with no container key of its own.
  Primitive,
}

/// One declared parameter of a constructor, method or function.
#[derive(Debug, Clone)]
pub struct ParamDescriptor {
  name: String,
  kind: ParamKind,
  default: Option<Object>,
}

impl ParamDescriptor {
  pub fn class(name: &str, type_key: &str) -> Self {
    Self {
      name: name.to_owned(),
      kind: ParamKind::Class(crate::core::canonical_key(type_key)),
      default: None,
    }
  }

  pub fn primitive(name: &str) -> Self {
    Self {
      name: name.to_owned(),
      kind: ParamKind::Primitive,
      default: None,
    }
  }

  /// Attaches a default value used when nothing else satisfies the parameter.
  pub fn with_default(mut self, default: Object) -> Self {
    self.default = Some(default);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> &ParamKind {
    &self.kind
  }

  pub fn default_value(&self) -> Option<&Object> {
    self.default.as_ref()
  }
}

/// Builder methods shared by everything that declares a parameter list.
macro_rules! signature_builders {
  ($ty:ty) => {
    impl $ty {
      /// Declares a parameter resolved through the container by `type_key`.
      pub fn class(mut self, name: &str, type_key: &str) -> Self {
        self.parameters.push($crate::descriptor::ParamDescriptor::class(name, type_key));
        self
      }

      /// Declares a container-resolved parameter that falls back to `default`
      /// when its type cannot be built.
      pub fn class_or<D: std::any::Any + Send + Sync>(mut self, name: &str, type_key: &str, default: D) -> Self {
        self.parameters.push(
          $crate::descriptor::ParamDescriptor::class(name, type_key)
            .with_default($crate::object::Object::new(default)),
        );
        self
      }

      /// Declares a scalar parameter with no default.
      pub fn primitive(mut self, name: &str) -> Self {
        self.parameters.push($crate::descriptor::ParamDescriptor::primitive(name));
        self
      }

      /// Declares a scalar parameter with a default value.
      pub fn primitive_or<D: std::any::Any + Send + Sync>(mut self, name: &str, default: D) -> Self {
        self.parameters.push(
          $crate::descriptor::ParamDescriptor::primitive(name)
            .with_default($crate::object::Object::new(default)),
        );
        self
      }

      pub fn parameters(&self) -> &[$crate::descriptor::ParamDescriptor] {
        &self.parameters
      }
    }
  };
}

pub(crate) use signature_builders;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
  Concrete,
  /// An interface-like key: it can be bound or aliased but never built.
  Abstract,
}

/// Describes how to construct one type and which methods it exposes.
#[derive(Clone)]
pub struct TypeDescriptor {
  key: String,
  kind: TypeKind,
  type_id: Option<TypeId>,
  parameters: Vec<ParamDescriptor>,
  constructor: Option<ConstructorFn>,
  methods: HashMap<String, MethodDescriptor>,
}

impl TypeDescriptor {
  /// Describes the concrete Rust type `T` under `key`.
  ///
  /// A concrete descriptor without a [`construct`](Self::construct) call is
  /// still not instantiable.
  pub fn concrete<T: Any>(key: &str) -> Self {
    Self {
      key: crate::core::canonical_key(key),
      kind: TypeKind::Concrete,
      type_id: Some(TypeId::of::<T>()),
      parameters: Vec::new(),
      constructor: None,
      methods: HashMap::new(),
    }
  }

  /// Describes a key that only exists to be bound to something else.
  pub fn abstract_type(key: &str) -> Self {
    Self {
      key: crate::core::canonical_key(key),
      kind: TypeKind::Abstract,
      type_id: None,
      parameters: Vec::new(),
      constructor: None,
      methods: HashMap::new(),
    }
  }

  /// Sets the constructor, which receives one argument per declared
  /// parameter, in declaration order.
  pub fn construct<F>(mut self, constructor: F) -> Self
  where
    F: Fn(Arguments) -> Result<Object> + Send + Sync + 'static,
  {
    self.constructor = Some(Arc::new(constructor));
    self
  }

  pub fn method(mut self, name: &str, method: MethodDescriptor) -> Self {
    self.methods.insert(name.to_owned(), method);
    self
  }

  pub fn key(&self) -> &str {
    &self.key
  }

  pub fn kind(&self) -> TypeKind {
    self.kind
  }

  pub fn is_instantiable(&self) -> bool {
    self.kind == TypeKind::Concrete && self.constructor.is_some()
  }

  pub(crate) fn type_id(&self) -> Option<TypeId> {
    self.type_id
  }

  pub(crate) fn constructor(&self) -> Option<&ConstructorFn> {
    self.constructor.as_ref()
  }

  pub(crate) fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
    self.methods.get(name)
  }
}

signature_builders!(TypeDescriptor);

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut methods: Vec<_> = self.methods.keys().collect();
    methods.sort();
    f.debug_struct("TypeDescriptor")
      .field("key", &self.key)
      .field("kind", &self.kind)
      .field("parameters", &self.parameters)
      .field("methods", &methods)
      .finish_non_exhaustive()
  }
}

/// A method `call` can invoke on a resolved receiver.
#[derive(Clone)]
pub struct MethodDescriptor {
  parameters: Vec<ParamDescriptor>,
  body: MethodFn,
}

impl MethodDescriptor {
  pub fn new<F>(body: F) -> Self
  where
    F: Fn(&Object, Arguments) -> Result<Object> + Send + Sync + 'static,
  {
    Self {
      parameters: Vec::new(),
      body: Arc::new(body),
    }
  }

  pub(crate) fn invoke(&self, receiver: &Object, arguments: Arguments) -> Result<Object> {
    (self.body)(receiver, arguments)
  }
}

signature_builders!(MethodDescriptor);

/// A Rust type that can describe itself to the container.
///
/// ```
/// use fibre_resolver::{Container, Injectable, Object, TypeDescriptor};
/// use std::sync::Arc;
///
/// struct Clock;
///
/// struct Scheduler {
///   clock: Arc<Clock>,
///   workers: usize,
/// }
///
/// impl Injectable for Clock {
///   const KEY: &'static str = "Clock";
///   fn descriptor() -> TypeDescriptor {
///     TypeDescriptor::concrete::<Self>(Self::KEY).construct(|_| Ok(Object::new(Clock)))
///   }
/// }
///
/// impl Injectable for Scheduler {
///   const KEY: &'static str = "Scheduler";
///   fn descriptor() -> TypeDescriptor {
///     TypeDescriptor::concrete::<Self>(Self::KEY)
///       .class("clock", Clock::KEY)
///       .primitive_or("workers", 4_usize)
///       .construct(|mut args| {
///         Ok(Object::new(Scheduler {
///           clock: args.take("clock")?,
///           workers: *args.take::<usize>("workers")?,
///         }))
///       })
///   }
/// }
///
/// let container = Container::builder().register_global(false).build();
/// container.register::<Clock>();
/// container.register::<Scheduler>();
///
/// let scheduler = container.resolve::<Scheduler>().unwrap();
/// assert_eq!(scheduler.workers, 4);
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
  /// The container key this type is described under.
  const KEY: &'static str;

  fn descriptor() -> TypeDescriptor;
}

/// The resolved argument list handed to a constructor, method or function.
///
/// Arguments keep declaration order. Entries that came from the container or
/// from a named override carry the parameter name; pass-through values from
/// [`Container::call`](crate::Container::call) are unnamed.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
  owner: String,
  values: Vec<(Option<String>, Object)>,
}

impl Arguments {
  pub(crate) fn new(owner: &str) -> Self {
    Self {
      owner: owner.to_owned(),
      values: Vec::new(),
    }
  }

  pub(crate) fn push(&mut self, name: Option<&str>, value: Object) {
    self.values.push((name.map(str::to_owned), value));
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The untyped argument named `name`.
  pub fn object(&self, name: &str) -> Option<&Object> {
    self
      .values
      .iter()
      .find(|(n, _)| n.as_deref() == Some(name))
      .map(|(_, value)| value)
  }

  /// Removes the argument named `name` and downcasts it to `T`.
  pub fn take<T: Any + Send + Sync>(&mut self, name: &str) -> Result<Arc<T>> {
    let value = self.take_object(name)?;
    downcast_argument(&self.owner, name, &value)
  }

  /// Removes the argument named `name` without downcasting it.
  pub fn take_object(&mut self, name: &str) -> Result<Object> {
    let index = self
      .values
      .iter()
      .position(|(n, _)| n.as_deref() == Some(name))
      .ok_or_else(|| BindingError::UnresolvedDependency {
        parameter: name.to_owned(),
        declaring_type: self.owner.clone(),
      })?;
    Ok(self.values.remove(index).1)
  }

  /// Downcasts the argument at `position`.
  pub fn at<T: Any + Send + Sync>(&self, position: usize) -> Result<Arc<T>> {
    let (_, value) = self.values.get(position).ok_or_else(|| {
      BindingError::InvalidArgument(format!(
        "{} received {} argument(s), none at position {}",
        self.owner,
        self.values.len(),
        position
      ))
    })?;
    downcast_argument(&self.owner, &position.to_string(), value)
  }

  /// All arguments in order, without their names.
  pub fn objects(&self) -> Vec<Object> {
    self.values.iter().map(|(_, value)| value.clone()).collect()
  }
}

fn downcast_argument<T: Any + Send + Sync>(owner: &str, name: &str, value: &Object) -> Result<Arc<T>> {
  value.downcast::<T>().ok_or_else(|| BindingError::TypeMismatch {
    key: format!("{}::{}", owner, name),
    expected: std::any::type_name::<T>(),
    found: value.type_name(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn descriptor_without_constructor_is_not_instantiable() {
    struct Stub;
    assert!(!TypeDescriptor::concrete::<Stub>("Stub").is_instantiable());
    assert!(!TypeDescriptor::abstract_type("StubInterface").is_instantiable());
    assert!(TypeDescriptor::concrete::<Stub>("Stub")
      .construct(|_| Ok(Object::new(Stub)))
      .is_instantiable());
  }

  #[test]
  fn take_reports_type_mismatch_with_owner() {
    let mut args = Arguments::new("Widget");
    args.push(Some("size"), Object::new("large"));
    let err = args.take::<u32>("size").unwrap_err();
    assert!(matches!(err, BindingError::TypeMismatch { ref key, .. } if key == "Widget::size"));
  }
}
