use fibre_resolver::{resolve, Container, Object};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  // The first container built claims the process-wide slot.
  let container = Container::new();
  assert!(fibre_resolver::get_instance().is_some());

  // This factory will only be called ONCE.
  container.singleton("singleton_tracker", |_, _| {
    println!("Creating SINGLETON RequestTracker...");
    Ok(Object::new(RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }))
  });

  // This factory will be called EVERY time the key is made.
  container.bind("transient_tracker", |_, _| {
    println!("Creating TRANSIENT RequestTracker...");
    Ok(Object::new(RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }))
  });

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(RequestTracker, "singleton_tracker");
  let s2 = resolve!(RequestTracker, "singleton_tracker");
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert!(Arc::ptr_eq(&s1, &s2));

  println!("--- Resolving Transients ---");
  let t1 = resolve!(RequestTracker, "transient_tracker");
  let t2 = resolve!(RequestTracker, "transient_tracker");
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert_eq!(t1.id, 1);
  assert_eq!(t2.id, 2);
}
