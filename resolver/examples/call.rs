use fibre_resolver::{Callable, Container, FunctionRef, Injectable, MethodDescriptor, Object, Parameters, TypeDescriptor};

struct Clock;

struct Greeter {
  greeting: String,
}

impl Injectable for Clock {
  const KEY: &'static str = "Clock";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY).construct(|_| Ok(Object::new(Clock)))
  }
}

impl Injectable for Greeter {
  const KEY: &'static str = "Greeter";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .primitive_or("greeting", String::from("Hello"))
      .construct(|mut args| {
        Ok(Object::new(Greeter {
          greeting: args.take::<String>("greeting")?.to_string(),
        }))
      })
      .method(
        "greet",
        MethodDescriptor::new(|receiver, mut args| {
          let greeter = receiver.downcast_ref::<Greeter>().expect("receiver is a Greeter");
          let name = args.take::<String>("name")?;
          Ok(Object::new(format!("{}, {}!", greeter.greeting, name)))
        })
        .class("clock", Clock::KEY)
        .primitive_or("name", String::from("world")),
      )
  }
}

fn main() -> fibre_resolver::Result<()> {
  let container = Container::builder().register_global(false).build();
  container.register::<Clock>();
  container.register::<Greeter>();

  // "Type@method" resolves the receiver, then the method's own parameters.
  let greeting = container.call(Callable::parse("Greeter@greet")?, &Parameters::new(), None)?;
  println!("{}", greeting.downcast_ref::<String>().expect("a string"));

  let greeting = container.call(
    Callable::parse("Greeter")?,
    &Parameters::new().with("name", String::from("fibre")),
    Some("greet"),
  )?;
  println!("{}", greeting.downcast_ref::<String>().expect("a string"));

  // Plain closures declare their signature up front.
  let uptime = FunctionRef::new(|args| {
    let _clock = args.at::<Clock>(0)?;
    Ok(Object::new(format!("{} argument(s) resolved", args.len())))
  })
  .named("uptime")
  .class("clock", Clock::KEY);

  let report = container.call(uptime, &Parameters::new(), None)?;
  println!("{}", report.downcast_ref::<String>().expect("a string"));
  Ok(())
}
