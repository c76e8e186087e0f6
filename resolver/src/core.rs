//! Key canonicalization and the per-thread build and resolution stacks.

use crate::error::BindingError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

thread_local! {
  // One build stack per container on this thread. Keeping the stack
  // thread-local means two threads building different graphs through the
  // same container never see each other's frames.
  static BUILD_STACKS: RefCell<HashMap<ContainerId, Vec<String>>> = RefCell::new(HashMap::new());

  // Keys currently inside `make`, each with the concrete that was being
  // built when it was requested.
  static RESOLVING: RefCell<HashMap<ContainerId, Vec<(Option<String>, String)>>> = RefCell::new(HashMap::new());
}

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ContainerId(u64);

impl ContainerId {
  pub(crate) fn next() -> Self {
    Self(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed))
  }
}

/// Strips leading namespace separators (`\` and `::`) so that `"\Foo"`,
/// `"::Foo"` and `"Foo"` all name the same binding.
pub fn canonical_key(key: &str) -> String {
  let mut rest = key;
  loop {
    if let Some(stripped) = rest.strip_prefix('\\') {
      rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix("::") {
      rest = stripped;
    } else {
      return rest.to_owned();
    }
  }
}

/// A copy of the current build stack for `id`, bottom first.
pub(crate) fn build_stack(id: ContainerId) -> Vec<String> {
  BUILD_STACKS.with(|stacks| stacks.borrow().get(&id).cloned().unwrap_or_default())
}

/// The concrete currently under construction for `id`, if any.
pub(crate) fn current_builder(id: ContainerId) -> Option<String> {
  BUILD_STACKS.with(|stacks| stacks.borrow().get(&id).and_then(|stack| stack.last().cloned()))
}

/// An RAII frame on the build stack.
///
/// Pushing fails if `concrete` is already being built on this thread, which
/// is how dependency cycles are caught. The frame pops itself when dropped,
/// so the stack stays balanced whether construction succeeds or fails.
pub(crate) struct BuildFrame {
  id: ContainerId,
}

impl BuildFrame {
  pub(crate) fn push(id: ContainerId, concrete: &str) -> Result<Self, BindingError> {
    BUILD_STACKS.with(|stacks| {
      let mut stacks = stacks.borrow_mut();
      let stack = stacks.entry(id).or_default();
      if stack.iter().any(|frame| frame == concrete) {
        let mut chain = stack.clone();
        chain.push(concrete.to_owned());
        return Err(BindingError::CircularDependency {
          target: concrete.to_owned(),
          chain,
        });
      }
      stack.push(concrete.to_owned());
      Ok(())
    })?;
    Ok(Self { id })
  }
}

impl Drop for BuildFrame {
  fn drop(&mut self) {
    BUILD_STACKS.with(|stacks| {
      let mut stacks = stacks.borrow_mut();
      if let Some(stack) = stacks.get_mut(&self.id) {
        stack.pop();
        if stack.is_empty() {
          stacks.remove(&self.id);
        }
      }
    });
  }
}

/// An RAII frame marking `key` as being resolved on this thread.
///
/// A key may legitimately be requested again while a different concrete is
/// being built, since a contextual override can then send it elsewhere. The
/// same key under the same builder, though, can only recurse forever. That
/// covers factories that make each other as well as alias loops.
pub(crate) struct ResolveFrame {
  id: ContainerId,
}

impl ResolveFrame {
  pub(crate) fn push(id: ContainerId, key: &str) -> Result<Self, BindingError> {
    let builder = current_builder(id);
    RESOLVING.with(|resolving| {
      let mut resolving = resolving.borrow_mut();
      let frames = resolving.entry(id).or_default();
      if frames.iter().any(|(b, k)| k == key && *b == builder) {
        let mut chain: Vec<String> = frames.iter().map(|(_, k)| k.clone()).collect();
        chain.push(key.to_owned());
        return Err(BindingError::CircularDependency {
          target: key.to_owned(),
          chain,
        });
      }
      frames.push((builder, key.to_owned()));
      Ok(())
    })?;
    Ok(Self { id })
  }
}

impl Drop for ResolveFrame {
  fn drop(&mut self) {
    RESOLVING.with(|resolving| {
      let mut resolving = resolving.borrow_mut();
      if let Some(frames) = resolving.get_mut(&self.id) {
        frames.pop();
        if frames.is_empty() {
          resolving.remove(&self.id);
        }
      }
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn leading_separators_are_stripped() {
    assert_eq!(canonical_key("\\Foo"), "Foo");
    assert_eq!(canonical_key("::app::Foo"), "app::Foo");
    assert_eq!(canonical_key("\\\\Foo\\Bar"), "Foo\\Bar");
    assert_eq!(canonical_key("Foo"), "Foo");
  }

  #[test]
  fn frames_pop_on_drop_and_detect_reentry() {
    let id = ContainerId::next();
    {
      let _outer = BuildFrame::push(id, "A").unwrap();
      let _inner = BuildFrame::push(id, "B").unwrap();
      assert_eq!(build_stack(id), vec!["A".to_string(), "B".to_string()]);
      assert_eq!(current_builder(id).as_deref(), Some("B"));

      let err = BuildFrame::push(id, "A").err().unwrap();
      assert_eq!(
        err,
        BindingError::CircularDependency {
          target: "A".into(),
          chain: vec!["A".into(), "B".into(), "A".into()],
        }
      );
    }
    assert!(build_stack(id).is_empty());
    assert!(current_builder(id).is_none());
  }

  #[test]
  fn resolve_frames_detect_reentry_under_the_same_builder() {
    let id = ContainerId::next();
    {
      let _a = ResolveFrame::push(id, "A").unwrap();
      let _b = ResolveFrame::push(id, "B").unwrap();
      let err = ResolveFrame::push(id, "A").err().unwrap();
      assert_eq!(
        err,
        BindingError::CircularDependency {
          target: "A".into(),
          chain: vec!["A".into(), "B".into(), "A".into()],
        }
      );

      let _building = BuildFrame::push(id, "Consumer").unwrap();
      assert!(ResolveFrame::push(id, "A").is_ok());
    }
    assert!(ResolveFrame::push(id, "A").is_ok());
  }

  #[test]
  fn stacks_are_scoped_per_container() {
    let first = ContainerId::next();
    let second = ContainerId::next();
    let _frame = BuildFrame::push(first, "A").unwrap();
    assert!(BuildFrame::push(second, "A").is_ok());
  }
}
