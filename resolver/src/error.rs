use thiserror::Error;

/// Errors raised while registering, building or invoking through a container.
///
/// Construction is deterministic, so every variant points at a configuration
/// defect. Nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
  /// The concrete target is abstract or is not described to the container.
  #[error("Target [{target}] is not instantiable{}.", while_building(.build_stack))]
  NotInstantiable {
    target: String,
    build_stack: Vec<String>,
  },

  /// A primitive constructor parameter had no override, no contextual value
  /// and no default.
  #[error("Unresolvable dependency resolving [${parameter}] in class {declaring_type}")]
  UnresolvedDependency {
    parameter: String,
    declaring_type: String,
  },

  /// `target` was requested while it was already being resolved.
  #[error("Circular dependency detected while resolving [{target}]: {}", .chain.join(" -> "))]
  CircularDependency { target: String, chain: Vec<String> },

  #[error("Invalid invocation target: {0}")]
  InvalidArgument(String),

  #[error("Method [{method}] does not exist on [{target}]")]
  MissingMethod { target: String, method: String },

  /// A resolved value was not of the type the caller asked for.
  #[error("Value for [{key}] is a {found}, expected {expected}")]
  TypeMismatch {
    key: String,
    expected: &'static str,
    found: &'static str,
  },
}

fn while_building(stack: &[String]) -> String {
  if stack.is_empty() {
    String::new()
  } else {
    format!(" while building [{}]", stack.join(", "))
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = BindingError> = std::result::Result<T, E>;

/// Errors raised while loading a [`ContainerConfig`](crate::ContainerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read configuration file: {0}")]
  Read(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  Parse(String),
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn not_instantiable_message_includes_build_stack() {
    let bare = BindingError::NotInstantiable {
      target: "StubInterface".into(),
      build_stack: vec![],
    };
    assert_eq!(bare.to_string(), "Target [StubInterface] is not instantiable.");

    let nested = BindingError::NotInstantiable {
      target: "StubInterface".into(),
      build_stack: vec!["ContextInjectOne".into(), "Outer".into()],
    };
    assert_eq!(
      nested.to_string(),
      "Target [StubInterface] is not instantiable while building [ContextInjectOne, Outer]."
    );
  }

  #[test]
  fn unresolved_dependency_names_parameter_and_type() {
    let err = BindingError::UnresolvedDependency {
      parameter: "first".into(),
      declaring_type: "MixedPrimitive".into(),
    };
    assert_eq!(
      err.to_string(),
      "Unresolvable dependency resolving [$first] in class MixedPrimitive"
    );
  }
}
