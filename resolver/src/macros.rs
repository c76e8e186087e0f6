//! Public macros for ergonomic resolution.

/// Resolves a service from the active container.
///
/// `resolve!(Type)` resolves an [`Injectable`](crate::Injectable) type;
/// `resolve!(Type, "key")` resolves `key` and downcasts it to `Type`.
///
/// # Panics
///
/// Panics if there is no active container or the service cannot be resolved.
/// For a non-panicking version, use [`maybe_resolve!`].
///
/// # Examples
///
/// ```
/// use fibre_resolver::{resolve, set_instance, Container, Object};
///
/// let container = Container::builder().register_global(false).build();
/// container.singleton("greeting", |_, _| Ok(Object::new(String::from("hello"))));
/// set_instance(container);
///
/// let greeting = resolve!(String, "greeting");
/// assert_eq!(*greeting, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  ($type:ty) => {
    $crate::resolve_from!(
      $crate::get_instance().unwrap_or_else(|| panic!(
        "Failed to resolve required service {}: no active container",
        std::any::type_name::<$type>()
      )),
      $type
    )
  };

  ($type:ty, $key:expr) => {
    $crate::resolve_from!(
      $crate::get_instance().unwrap_or_else(|| panic!(
        "Failed to resolve required service '{}': no active container",
        $key
      )),
      $type,
      $key
    )
  };
}

/// Like [`resolve!`], but returns `None` instead of panicking.
#[macro_export]
macro_rules! maybe_resolve {
  ($type:ty) => {
    $crate::get_instance().and_then(|container| $crate::maybe_resolve_from!(container, $type))
  };

  ($type:ty, $key:expr) => {
    $crate::get_instance().and_then(|container| $crate::maybe_resolve_from!(container, $type, $key))
  };
}

/// Resolves a service from an explicit container, panicking on failure.
#[macro_export]
macro_rules! resolve_from {
  ($container:expr, $type:ty) => {
    $container
      .resolve::<$type>()
      .unwrap_or_else(|err| panic!("Failed to resolve required service {}: {}", std::any::type_name::<$type>(), err))
  };

  ($container:expr, $type:ty, $key:expr) => {
    $container
      .make_as::<$type>($key)
      .unwrap_or_else(|err| panic!("Failed to resolve required service '{}': {}", $key, err))
  };
}

/// Resolves a service from an explicit container, returning `None` on failure.
#[macro_export]
macro_rules! maybe_resolve_from {
  ($container:expr, $type:ty) => {
    $container.resolve::<$type>().ok()
  };

  ($container:expr, $type:ty, $key:expr) => {
    $container.make_as::<$type>($key).ok()
  };
}
