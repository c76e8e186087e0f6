use fibre_resolver::{get_instance, remove_instance, set_instance, Container, Object};
use serial_test::serial;

#[test]
#[serial]
fn test_set_and_get_instance() {
  let container = Container::builder().register_global(false).build();
  set_instance(container.clone());

  let active = get_instance().unwrap();
  assert!(Container::ptr_eq(&active, &container));

  let removed = remove_instance().unwrap();
  assert!(Container::ptr_eq(&removed, &container));
  assert!(get_instance().is_none());
}

#[test]
#[serial]
fn test_first_container_installs_itself() {
  remove_instance();

  let first = Container::new();
  let second = Container::new();

  let active = get_instance().unwrap();
  assert!(Container::ptr_eq(&active, &first));
  assert!(!Container::ptr_eq(&active, &second));
  remove_instance();
}

#[test]
#[serial]
fn test_opted_out_container_leaves_slot_empty() {
  remove_instance();

  let _container = Container::builder().register_global(false).build();
  assert!(get_instance().is_none());
}

#[test]
#[serial]
fn test_set_instance_replaces_active_container() {
  remove_instance();
  let first = Container::new();
  let replacement = Container::builder().register_global(false).build();
  replacement.instance("owner", Object::new("replacement"));

  set_instance(replacement.clone());

  let active = get_instance().unwrap();
  assert!(!Container::ptr_eq(&active, &first));
  assert!(active.has_instance("owner"));
  remove_instance();
}

#[test]
#[serial]
fn test_active_container_shares_state_with_its_handles() {
  remove_instance();
  let container = Container::new();

  get_instance()
    .unwrap()
    .singleton("counter", |_, _| Ok(Object::new(7_u32)));

  assert_eq!(*container.make_as::<u32>("counter").unwrap(), 7);
  remove_instance();
}
