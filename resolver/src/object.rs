//! The type-erased value handle that flows through the container.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased value produced or consumed by the container.
///
/// Every binding, cached instance, parameter override and default value is
/// carried as an `Object`. Cloning is cheap and preserves identity, which is
/// what makes a singleton a singleton.
#[derive(Clone)]
pub struct Object {
  value: Arc<dyn Any + Send + Sync>,
  type_id: TypeId,
  type_name: &'static str,
}

impl Object {
  /// Wraps a value in a new shared handle.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  /// Wraps an existing `Arc` without reallocating, keeping its identity.
  pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      value,
      type_id: TypeId::of::<T>(),
      type_name: std::any::type_name::<T>(),
    }
  }

  /// Returns a typed handle to the value if it is a `T`.
  pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.value.clone().downcast::<T>().ok()
  }

  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.value.downcast_ref::<T>()
  }

  pub fn is<T: Any>(&self) -> bool {
    self.value.is::<T>()
  }

  /// The `std::any::type_name` of the stored value.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// The `TypeId` of the stored value (not of the `Arc` around it).
  pub fn concrete_type_id(&self) -> TypeId {
    self.type_id
  }

  /// Returns `true` if both handles point at the same allocation.
  pub fn ptr_eq(a: &Object, b: &Object) -> bool {
    Arc::ptr_eq(&a.value, &b.value)
  }
}

impl fmt::Debug for Object {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Object")
      .field("type_name", &self.type_name)
      .finish_non_exhaustive()
  }
}
