//! # Fibre Resolver
//!
//! A dependency-resolution container for Rust: a registry that maps string
//! keys to construction strategies and builds fully wired object graphs on
//! demand.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of bindings, cached instances, contextual
//!   overrides, decorators and listeners. Cheap to clone; clones share state.
//! - **Bindings**: `bind` (fresh on every `make`), `singleton` (built once,
//!   then cached), `alias` (resolve another key) and `instance` (a ready
//!   value).
//! - **Type descriptors**: Rust has no runtime reflection, so types the
//!   container builds on its own describe their constructor parameters with a
//!   [`TypeDescriptor`]. Class-typed parameters are made recursively;
//!   primitive ones come from overrides, contextual values or defaults.
//! - **Contextual overrides**: a consumer can receive a different
//!   implementation of a dependency than everyone else.
//! - **Decorators and listeners**: `extend` wraps resolved objects,
//!   `resolving` observes fresh builds, `rebinding` observes replacements.
//! - **Invocation**: `call` runs a function or method with container-resolved
//!   arguments.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_resolver::{Container, Object, Override, TypeDescriptor};
//! use std::sync::Arc;
//!
//! trait Transport: Send + Sync {
//!   fn name(&self) -> &'static str;
//! }
//! struct Smtp;
//! impl Transport for Smtp {
//!   fn name(&self) -> &'static str { "smtp" }
//! }
//!
//! struct Mailer {
//!   transport: Arc<dyn Transport>,
//!   retries: u32,
//! }
//!
//! let container = Container::builder().register_global(false).build();
//!
//! container.bind("Transport", |_, _| {
//!   Ok(Object::new::<Arc<dyn Transport>>(Arc::new(Smtp)))
//! });
//! container.register_type(
//!   TypeDescriptor::concrete::<Mailer>("Mailer")
//!     .class("transport", "Transport")
//!     .primitive("retries")
//!     .construct(|mut args| {
//!       Ok(Object::new(Mailer {
//!         transport: (*args.take::<Arc<dyn Transport>>("transport")?).clone(),
//!         retries: *args.take::<u32>("retries")?,
//!       }))
//!     }),
//! );
//! container.contextual("Mailer", "$retries", Override::value(3_u32));
//!
//! let mailer = container.make_as::<Mailer>("Mailer").unwrap();
//! assert_eq!(mailer.transport.name(), "smtp");
//! assert_eq!(mailer.retries, 3);
//! ```

mod binding;
mod build;
mod config;
mod container;
mod core;
mod descriptor;
mod error;
mod global;
mod invoke;
mod macros;
mod object;
mod parameters;

pub use binding::{Concrete, Decorator, Factory, Override, ReboundListener, ResolvingListener};
pub use config::{ContainerBuilder, ContainerConfig};
pub use container::Container;
pub use crate::core::canonical_key;
pub use descriptor::{Arguments, Injectable, MethodDescriptor, ParamDescriptor, ParamKind, TypeDescriptor, TypeKind};
pub use error::{BindingError, ConfigError, Result};
pub use global::{get_instance, remove_instance, set_instance};
pub use invoke::{Callable, FunctionRef};
pub use object::Object;
pub use parameters::{ParamKey, Parameters};
