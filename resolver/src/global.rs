//! The process-wide slot holding the active container.
//!
//! Prefer passing a [`Container`] explicitly. The slot exists for call sites
//! that have no way to receive one, such as the [`resolve!`](crate::resolve)
//! macro family.

use crate::container::Container;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

// Empty until a container installs itself or is installed explicitly.
static ACTIVE: Lazy<RwLock<Option<Container>>> = Lazy::new(|| RwLock::new(None));

/// Makes `container` the active container, replacing any previous one.
pub fn set_instance(container: Container) {
  *ACTIVE.write() = Some(container);
}

/// Returns a handle to the active container, if there is one.
///
/// # Examples
///
/// ```
/// use fibre_resolver::{get_instance, set_instance, Container};
///
/// let container = Container::builder().register_global(false).build();
/// set_instance(container.clone());
///
/// let active = get_instance().unwrap();
/// assert!(Container::ptr_eq(&active, &container));
/// ```
pub fn get_instance() -> Option<Container> {
  ACTIVE.read().clone()
}

/// Clears the slot, returning the container that was active.
pub fn remove_instance() -> Option<Container> {
  ACTIVE.write().take()
}

/// Installs `container` only if the slot is empty.
pub(crate) fn install_if_vacant(container: &Container) -> bool {
  let mut slot = ACTIVE.write();
  if slot.is_some() {
    return false;
  }
  *slot = Some(container.clone());
  true
}
