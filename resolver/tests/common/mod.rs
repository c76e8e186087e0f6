#![allow(dead_code)]

//! Shared fixtures: a small family of described types exercising every
//! parameter shape the resolver supports.

use fibre_resolver::{Arguments, Container, Injectable, MethodDescriptor, Object, TypeDescriptor};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A container that stays out of the process-wide slot.
pub fn container() -> Container {
  Container::builder().register_global(false).build()
}

/// A container with every fixture type described.
pub fn described_container() -> Container {
  let container = container();
  register_fixtures(&container);
  container
}

pub fn register_fixtures(container: &Container) {
  container.register::<TestStub>();
  container.register_type(TypeDescriptor::abstract_type(STUB_INTERFACE));
  container.register::<ImplementationStub>();
  container.register::<ImplementationStubTwo>();
  container.register::<DependentStub>();
  container.register::<NestedDependentStub>();
  container.register::<DefaultValueStub>();
  container.register::<MixedPrimitiveStub>();
  container.register::<ParameterLoggingStub>();
  container.register::<LazyExtendStub>();
  container.register::<CallStub>();
  container.register::<ContextInjectOne>();
  container.register::<ContextInjectTwo>();
  container.register::<InjectVariableStub>();
}

/// An interface-like key: bindable, never buildable.
pub const STUB_INTERFACE: &str = "StubInterface";

#[derive(Debug)]
pub struct TestStub;

impl Injectable for TestStub {
  const KEY: &'static str = "TestStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY).construct(|_| Ok(Object::new(TestStub)))
  }
}

#[derive(Debug)]
pub struct ImplementationStub;

impl Injectable for ImplementationStub {
  const KEY: &'static str = "ImplementationStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY).construct(|_| Ok(Object::new(ImplementationStub)))
  }
}

#[derive(Debug)]
pub struct ImplementationStubTwo;

impl Injectable for ImplementationStubTwo {
  const KEY: &'static str = "ImplementationStubTwo";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY).construct(|_| Ok(Object::new(ImplementationStubTwo)))
  }
}

pub struct DependentStub {
  pub implementation: Object,
}

impl Injectable for DependentStub {
  const KEY: &'static str = "DependentStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .class("implementation", STUB_INTERFACE)
      .construct(|mut args| {
        Ok(Object::new(DependentStub {
          implementation: args.take_object("implementation")?,
        }))
      })
  }
}

pub struct NestedDependentStub {
  pub stub: Arc<DependentStub>,
}

impl Injectable for NestedDependentStub {
  const KEY: &'static str = "NestedDependentStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .class("stub", DependentStub::KEY)
      .construct(|mut args| Ok(Object::new(NestedDependentStub { stub: args.take("stub")? })))
  }
}

pub struct DefaultValueStub {
  pub stub: Arc<TestStub>,
  pub name: String,
}

impl Injectable for DefaultValueStub {
  const KEY: &'static str = "DefaultValueStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .class("stub", TestStub::KEY)
      .primitive_or("name", String::from("mark"))
      .construct(|mut args| {
        Ok(Object::new(DefaultValueStub {
          stub: args.take("stub")?,
          name: args.take::<String>("name")?.to_string(),
        }))
      })
  }
}

/// `first` has no default, `last` defaults to nothing.
pub struct MixedPrimitiveStub {
  pub first: String,
  pub stub: Arc<TestStub>,
  pub last: Option<String>,
}

impl Injectable for MixedPrimitiveStub {
  const KEY: &'static str = "MixedPrimitiveStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .primitive("first")
      .class("stub", TestStub::KEY)
      .primitive_or("last", ())
      .construct(|mut args| {
        let last = args
          .object("last")
          .and_then(|last| last.downcast_ref::<String>().cloned());
        Ok(Object::new(MixedPrimitiveStub {
          first: args.take::<String>("first")?.to_string(),
          stub: args.take("stub")?,
          last,
        }))
      })
  }
}

pub struct ParameterLoggingStub {
  pub received: Vec<Object>,
}

impl Injectable for ParameterLoggingStub {
  const KEY: &'static str = "ParameterLoggingStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .primitive("first")
      .primitive("second")
      .construct(|args| Ok(Object::new(ParameterLoggingStub { received: args.objects() })))
  }
}

pub static LAZY_EXTEND_INITIALIZED: AtomicBool = AtomicBool::new(false);

pub struct LazyExtendStub;

impl LazyExtendStub {
  pub fn init(&self) {
    LAZY_EXTEND_INITIALIZED.store(true, Ordering::SeqCst);
  }
}

impl Injectable for LazyExtendStub {
  const KEY: &'static str = "LazyExtendStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY).construct(|_| Ok(Object::new(LazyExtendStub)))
  }
}

/// Methods return their received arguments so tests can inspect them.
pub struct CallStub;

fn echo(_: &Object, args: Arguments) -> fibre_resolver::Result<Object> {
  Ok(Object::new(args.objects()))
}

impl Injectable for CallStub {
  const KEY: &'static str = "CallStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .construct(|_| Ok(Object::new(CallStub)))
      .method("work", MethodDescriptor::new(echo))
      .method(
        "inject",
        MethodDescriptor::new(echo)
          .class("stub", TestStub::KEY)
          .primitive_or("default", String::from("mark")),
      )
  }
}

pub struct ContextInjectOne {
  pub implementation: Object,
}

impl Injectable for ContextInjectOne {
  const KEY: &'static str = "ContextInjectOne";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .class("implementation", STUB_INTERFACE)
      .construct(|mut args| {
        Ok(Object::new(ContextInjectOne {
          implementation: args.take_object("implementation")?,
        }))
      })
  }
}

pub struct ContextInjectTwo {
  pub implementation: Object,
}

impl Injectable for ContextInjectTwo {
  const KEY: &'static str = "ContextInjectTwo";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .class("implementation", STUB_INTERFACE)
      .construct(|mut args| {
        Ok(Object::new(ContextInjectTwo {
          implementation: args.take_object("implementation")?,
        }))
      })
  }
}

pub struct InjectVariableStub {
  pub concrete: Arc<TestStub>,
  pub something: Object,
}

impl Injectable for InjectVariableStub {
  const KEY: &'static str = "InjectVariableStub";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .class("concrete", TestStub::KEY)
      .primitive("something")
      .construct(|mut args| {
        Ok(Object::new(InjectVariableStub {
          concrete: args.take("concrete")?,
          something: args.take_object("something")?,
        }))
      })
  }
}

/// Downcasts an argument list returned by a `CallStub` method.
pub fn as_arguments(object: &Object) -> Arc<Vec<Object>> {
  object
    .downcast::<Vec<Object>>()
    .expect("call result should be an argument list")
}

pub fn as_str(object: &Object) -> &str {
  object
    .downcast_ref::<String>()
    .map(String::as_str)
    .or_else(|| object.downcast_ref::<&'static str>().copied())
    .expect("object should be a string")
}
