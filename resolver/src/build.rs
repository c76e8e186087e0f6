//! Descriptor-driven construction: turns a type's declared constructor
//! parameters into concrete arguments, recursing into the container for
//! class-typed parameters.

use crate::binding::{Concrete, Override};
use crate::container::Container;
use crate::core::{build_stack, canonical_key, BuildFrame};
use crate::descriptor::{Arguments, ParamDescriptor, ParamKind};
use crate::error::{BindingError, Result};
use crate::object::Object;
use crate::parameters::Parameters;

use tracing::{trace, warn};

impl Container {
  /// Builds `concrete` without consulting bindings, instances, decorators or
  /// listeners.
  ///
  /// A factory is invoked with the container and the raw `parameters` and
  /// its result returned untouched. A type key is constructed from its
  /// registered [`TypeDescriptor`](crate::TypeDescriptor).
  pub fn build(&self, concrete: &Concrete, parameters: &Parameters) -> Result<Object> {
    match concrete {
      Concrete::Factory(factory) => factory(self, parameters),
      Concrete::Type(key) => self.build_type(&canonical_key(key), parameters),
    }
  }

  pub(crate) fn build_type(&self, concrete: &str, parameters: &Parameters) -> Result<Object> {
    let descriptor = self
      .inner
      .types
      .get(concrete)
      .map(|entry| entry.value().clone())
      .filter(|descriptor| descriptor.is_instantiable());
    let (descriptor, constructor) = match descriptor
      .and_then(|d| d.constructor().cloned().map(|constructor| (d, constructor)))
    {
      Some(found) => found,
      None => {
        return Err(BindingError::NotInstantiable {
          target: concrete.to_owned(),
          build_stack: build_stack(self.inner.id),
        })
      }
    };

    let _frame = BuildFrame::push(self.inner.id, concrete)?;

    trace!(concrete = %concrete, parameters = descriptor.parameters().len(), "building");

    let mut overrides = parameters.keyed_by(descriptor.parameters());
    let mut arguments = Arguments::new(concrete);
    for parameter in descriptor.parameters() {
      let value = match overrides.take(parameter.name()) {
        Some(value) => value,
        None => match parameter.kind() {
          ParamKind::Class(type_key) => self.resolve_class(concrete, parameter, type_key)?,
          ParamKind::Primitive => self.resolve_primitive(concrete, parameter)?,
        },
      };
      arguments.push(Some(parameter.name()), value);
    }

    constructor(arguments)
  }

  fn resolve_class(&self, concrete: &str, parameter: &ParamDescriptor, type_key: &str) -> Result<Object> {
    match self.make(type_key) {
      Ok(object) => Ok(object),
      Err(err @ BindingError::CircularDependency { .. }) => Err(err),
      Err(err) => match parameter.default_value() {
        Some(default) => {
          warn!(
            concrete = %concrete,
            parameter = parameter.name(),
            error = %err,
            "dependency unavailable, using default"
          );
          Ok(default.clone())
        }
        None => Err(err),
      },
    }
  }

  fn resolve_primitive(&self, concrete: &str, parameter: &ParamDescriptor) -> Result<Object> {
    let dependency = format!("${}", parameter.name());
    if let Some(give) = self.contextual_override(concrete, &dependency) {
      return match give {
        Override::Value(object) => Ok(object),
        Override::Factory(factory) => factory(self, &Parameters::new()),
        Override::Type(key) => self.make(&key),
      };
    }

    parameter
      .default_value()
      .cloned()
      .ok_or_else(|| BindingError::UnresolvedDependency {
        parameter: parameter.name().to_owned(),
        declaring_type: concrete.to_owned(),
      })
  }
}
