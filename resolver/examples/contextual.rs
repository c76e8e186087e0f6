use fibre_resolver::{Container, Injectable, Object, Override, TypeDescriptor};
use std::sync::Arc;

trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE]: {}", message);
  }
}

struct AuditLogger;
impl Logger for AuditLogger {
  fn log(&self, message: &str) {
    println!("[AUDIT]: {}", message);
  }
}

// Trait objects travel as `Arc<dyn Logger>` inside the container.
type SharedLogger = Arc<dyn Logger>;

struct ReportService {
  logger: Arc<SharedLogger>,
  title: String,
}

struct PaymentService {
  logger: Arc<SharedLogger>,
}

impl Injectable for ReportService {
  const KEY: &'static str = "ReportService";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .class("logger", "Logger")
      .primitive_or("title", String::from("Quarterly"))
      .construct(|mut args| {
        Ok(Object::new(ReportService {
          logger: args.take("logger")?,
          title: args.take::<String>("title")?.to_string(),
        }))
      })
  }
}

impl Injectable for PaymentService {
  const KEY: &'static str = "PaymentService";
  fn descriptor() -> TypeDescriptor {
    TypeDescriptor::concrete::<Self>(Self::KEY)
      .class("logger", "Logger")
      .construct(|mut args| Ok(Object::new(PaymentService { logger: args.take("logger")? })))
  }
}

fn main() {
  let container = Container::builder().register_global(false).build();
  container.register_type(TypeDescriptor::abstract_type("Logger"));
  container.singleton("Logger", |_, _| {
    let logger: SharedLogger = Arc::new(ConsoleLogger);
    Ok(Object::new(logger))
  });

  // Payments get their own logger; everyone else shares the console.
  container.contextual(PaymentService::KEY, "Logger", Override::factory(|_, _| {
    let logger: SharedLogger = Arc::new(AuditLogger);
    Ok(Object::new(logger))
  }));
  container.contextual(ReportService::KEY, "$title", Override::value(String::from("Annual")));

  let reports = container.resolve::<ReportService>().expect("report service");
  reports.logger.log(&format!("{} report generated", reports.title));

  let payments = container.resolve::<PaymentService>().expect("payment service");
  payments.logger.log("payment captured");
}
