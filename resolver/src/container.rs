//! The main `Container` struct: registration, queries and resolution.

use crate::binding::{Binding, Concrete, Decorator, Factory, Override, ReboundListener, ResolvingListener};
use crate::config::{ContainerBuilder, ContainerConfig};
use crate::core::{canonical_key, current_builder, ContainerId, ResolveFrame};
use crate::descriptor::{Injectable, TypeDescriptor};
use crate::error::{BindingError, Result};
use crate::object::Object;
use crate::parameters::Parameters;

use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// The dependency-resolution container.
///
/// A `Container` is a cheap, cloneable handle; clones share the same
/// registries. Registration takes `&self`, so factories and decorators can
/// register further services while they run.
///
/// The registries are concurrent maps, but the container makes no promise
/// about interleaved registration and resolution from several threads beyond
/// memory safety. Each thread gets its own build stack.
#[derive(Clone)]
pub struct Container {
  pub(crate) inner: Arc<Inner>,
}

pub(crate) struct Inner {
  pub(crate) id: ContainerId,
  pub(crate) config: ContainerConfig,
  bindings: DashMap<String, Binding>,
  instances: DashMap<String, Object>,
  // consumer -> (dependency -> override)
  contextual: DashMap<String, HashMap<String, Override>>,
  extenders: DashMap<String, Vec<Decorator>>,
  resolving_listeners: DashMap<String, Vec<ResolvingListener>>,
  rebinding_listeners: DashMap<String, Vec<ReboundListener>>,
  pub(crate) types: DashMap<String, Arc<TypeDescriptor>>,
  pub(crate) type_keys: DashMap<TypeId, String>,
}

/// Where `make` gets the object for a key from.
enum Target {
  Value(Object),
  Factory(Factory),
  Type(String),
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("id", &self.inner.id)
      .field("bindings", &self.inner.bindings.len())
      .field("instances", &self.inner.instances.len())
      .field("types", &self.inner.types.len())
      .finish_non_exhaustive()
  }
}

impl Container {
  /// Creates a container with the default configuration.
  ///
  /// If no container is active in the process-wide slot yet, this one
  /// becomes the active container.
  pub fn new() -> Self {
    Self::builder().build()
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::default()
  }

  pub(crate) fn from_config(config: ContainerConfig) -> Self {
    Self {
      inner: Arc::new(Inner {
        id: ContainerId::next(),
        config,
        bindings: DashMap::new(),
        instances: DashMap::new(),
        contextual: DashMap::new(),
        extenders: DashMap::new(),
        resolving_listeners: DashMap::new(),
        rebinding_listeners: DashMap::new(),
        types: DashMap::new(),
        type_keys: DashMap::new(),
      }),
    }
  }

  /// Returns `true` if both handles refer to the same container.
  pub fn ptr_eq(a: &Container, b: &Container) -> bool {
    Arc::ptr_eq(&a.inner, &b.inner)
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.inner.config
  }

  // --- Type Descriptors ---

  /// Makes `descriptor` available for direct construction under its key.
  pub fn register_type(&self, descriptor: TypeDescriptor) {
    let key = descriptor.key().to_owned();
    if let Some(type_id) = descriptor.type_id() {
      self.inner.type_keys.insert(type_id, key.clone());
    }
    if self.inner.types.insert(key.clone(), Arc::new(descriptor)).is_some() {
      debug!(key = %key, "type descriptor replaced");
    }
  }

  pub fn register<T: Injectable>(&self) {
    self.register_type(T::descriptor());
  }

  /// Returns `true` if a type descriptor is registered for `key`.
  pub fn describes(&self, key: &str) -> bool {
    self.inner.types.contains_key(&canonical_key(key))
  }

  // --- Bindings ---

  /// Binds `key` to a factory that runs on every resolution.
  pub fn bind<F>(&self, key: &str, factory: F)
  where
    F: Fn(&Container, &Parameters) -> Result<Object> + Send + Sync + 'static,
  {
    self.register_binding(key, Concrete::factory(factory), false);
  }

  /// Binds `key` to a factory that runs once; the result is cached.
  pub fn singleton<F>(&self, key: &str, factory: F)
  where
    F: Fn(&Container, &Parameters) -> Result<Object> + Send + Sync + 'static,
  {
    self.register_binding(key, Concrete::factory(factory), true);
  }

  /// Resolves `key` by resolving `target` instead.
  pub fn alias(&self, key: &str, target: &str) {
    self.register_binding(key, Concrete::type_key(target), false);
  }

  pub fn singleton_alias(&self, key: &str, target: &str) {
    self.register_binding(key, Concrete::type_key(target), true);
  }

  /// Registers (or replaces) the binding for `key`.
  ///
  /// Replacing an existing binding or instance fires the key's rebinding
  /// listeners once the new binding is in place. A stale cached instance for
  /// the key is dropped so the new binding takes effect.
  pub fn register_binding(&self, key: &str, concrete: Concrete, shared: bool) {
    let key = canonical_key(key);
    let was_bound = self.bound(&key);

    self.inner.instances.remove(&key);
    self.inner.bindings.insert(key.clone(), Binding { concrete, shared });

    if was_bound {
      debug!(key = %key, shared, "binding replaced");
      self.rebound(&key);
    }
  }

  /// Registers a permanently resolved value for `key`.
  pub fn instance(&self, key: &str, value: Object) {
    let key = canonical_key(key);
    let was_bound = self.bound(&key);

    self.inner.instances.insert(key.clone(), value);

    if was_bound {
      debug!(key = %key, "instance replaced");
      self.rebound(&key);
    }
  }

  /// Decorates whatever `key` resolves to.
  ///
  /// If a shared instance is already cached the decorator runs immediately,
  /// replaces the cached instance and fires the rebinding listeners.
  /// Otherwise it is queued and applied, in registration order, on every
  /// fresh resolution of `key`.
  pub fn extend<F>(&self, key: &str, decorator: F) -> Result<()>
  where
    F: Fn(Object, &Container) -> Result<Object> + Send + Sync + 'static,
  {
    let key = canonical_key(key);
    let decorator: Decorator = Arc::new(decorator);

    let cached = self.inner.instances.get(&key).map(|entry| entry.value().clone());
    match cached {
      Some(object) => {
        let extended = decorator(object, self)?;
        self.inner.instances.insert(key.clone(), extended);
        self.rebound(&key);
      }
      None => self.inner.extenders.entry(key).or_default().push(decorator),
    }
    Ok(())
  }

  /// Registers an override for `dependency` that applies only while
  /// `consumer` is being built.
  ///
  /// Primitive constructor parameters are addressed as `"$name"`.
  pub fn contextual(&self, consumer: &str, dependency: &str, give: Override) {
    self
      .inner
      .contextual
      .entry(canonical_key(consumer))
      .or_default()
      .insert(canonical_key(dependency), give);
  }

  /// Calls `listener` with the final object after every fresh resolution of
  /// `key`. Cached resolutions do not fire it.
  pub fn resolving<F>(&self, key: &str, listener: F)
  where
    F: Fn(&Object) + Send + Sync + 'static,
  {
    self
      .inner
      .resolving_listeners
      .entry(canonical_key(key))
      .or_default()
      .push(Arc::new(listener));
  }

  /// Calls `listener` whenever an existing registration for `key` is replaced.
  pub fn rebinding<F>(&self, key: &str, listener: F)
  where
    F: Fn() + Send + Sync + 'static,
  {
    self
      .inner
      .rebinding_listeners
      .entry(canonical_key(key))
      .or_default()
      .push(Arc::new(listener));
  }

  // --- Queries ---

  /// Returns `true` if `key` has a binding or a cached instance.
  pub fn bound(&self, key: &str) -> bool {
    let key = canonical_key(key);
    self.inner.bindings.contains_key(&key) || self.inner.instances.contains_key(&key)
  }

  pub fn is_shared(&self, key: &str) -> bool {
    self
      .inner
      .bindings
      .get(&canonical_key(key))
      .is_some_and(|binding| binding.shared)
  }

  pub fn has_instance(&self, key: &str) -> bool {
    self.inner.instances.contains_key(&canonical_key(key))
  }

  /// Number of decorators queued for the next fresh resolution of `key`.
  pub fn extender_count(&self, key: &str) -> usize {
    self
      .inner
      .extenders
      .get(&canonical_key(key))
      .map_or(0, |extenders| extenders.len())
  }

  // --- Resolution ---

  pub fn make(&self, key: &str) -> Result<Object> {
    self.make_with(key, &Parameters::new())
  }

  /// Resolves `key`, passing `parameters` to whatever ends up building it.
  pub fn make_with(&self, key: &str, parameters: &Parameters) -> Result<Object> {
    self.resolve_key(&canonical_key(key), parameters)
  }

  /// Resolves `key` and downcasts the result to `T`.
  pub fn make_as<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
    let object = self.make(key)?;
    object.downcast::<T>().ok_or_else(|| BindingError::TypeMismatch {
      key: canonical_key(key),
      expected: std::any::type_name::<T>(),
      found: object.type_name(),
    })
  }

  /// Resolves an [`Injectable`] type, registering its descriptor first if
  /// the container has not seen it yet.
  pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
    if !self.describes(T::KEY) {
      self.register::<T>();
    }
    self.make_as::<T>(T::KEY)
  }

  fn resolve_key(&self, key: &str, parameters: &Parameters) -> Result<Object> {
    if let Some(object) = self.inner.instances.get(key).map(|entry| entry.value().clone()) {
      return Ok(object);
    }

    // Held until the object is decorated, cached and announced.
    let _frame = ResolveFrame::push(self.inner.id, key)?;
    trace!(key = %key, "resolving");

    let (target, contextual) = self.target_for(key);
    let object = match target {
      Target::Value(object) => object,
      Target::Factory(factory) => factory(self, parameters)?,
      Target::Type(concrete) if concrete == key => self.build_type(&concrete, parameters)?,
      Target::Type(alias) => self.resolve_key(&alias, parameters)?,
    };

    let object = self.apply_extenders(key, object)?;

    // A consumer-specific override must not leak into the global cache.
    if !contextual && self.is_shared(key) {
      debug!(key = %key, "caching shared instance");
      self.inner.instances.insert(key.to_owned(), object.clone());
    }

    self.fire_resolving(key, &object);
    Ok(object)
  }

  /// The concrete target for `key`, and whether it came from a contextual
  /// override of the type currently being built.
  fn target_for(&self, key: &str) -> (Target, bool) {
    if let Some(builder) = current_builder(self.inner.id) {
      if let Some(give) = self.contextual_override(&builder, key) {
        debug!(consumer = %builder, dependency = %key, "contextual override applied");
        let target = match give {
          Override::Value(object) => Target::Value(object),
          Override::Type(concrete) => Target::Type(concrete),
          Override::Factory(factory) => Target::Factory(factory),
        };
        return (target, true);
      }
    }

    let bound = self.inner.bindings.get(key).map(|binding| binding.concrete.clone());
    let target = match bound {
      Some(Concrete::Factory(factory)) => Target::Factory(factory),
      Some(Concrete::Type(concrete)) => Target::Type(concrete),
      None => Target::Type(key.to_owned()),
    };
    (target, false)
  }

  pub(crate) fn contextual_override(&self, consumer: &str, dependency: &str) -> Option<Override> {
    self
      .inner
      .contextual
      .get(consumer)
      .and_then(|overrides| overrides.get(dependency).cloned())
  }

  fn apply_extenders(&self, key: &str, object: Object) -> Result<Object> {
    let extenders = match self.inner.extenders.get(key) {
      Some(extenders) => extenders.value().clone(),
      None => return Ok(object),
    };
    extenders
      .iter()
      .try_fold(object, |object, extender| extender(object, self))
  }

  fn fire_resolving(&self, key: &str, object: &Object) {
    let listeners = self.inner.resolving_listeners.get(key).map(|l| l.value().clone());
    for listener in listeners.into_iter().flatten() {
      listener(object);
    }
  }

  fn rebound(&self, key: &str) {
    let listeners = self.inner.rebinding_listeners.get(key).map(|l| l.value().clone());
    for listener in listeners.into_iter().flatten() {
      listener();
    }
  }
}
