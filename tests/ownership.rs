use owning_value::{OwningArray, OwningValue};

fn assert_send<T: Send>() {}

#[test]
fn values_can_cross_threads() {
    assert_send::<OwningValue>();
    assert_send::<OwningArray>();

    let value = OwningValue::new(5).unwrap();
    let addr = value.handle().map(|ptr| ptr as usize);
    let back = std::thread::spawn(move || value).join().unwrap();
    assert_eq!(back.handle().map(|ptr| ptr as usize), addr);
    assert_eq!(*back.value(), 5);
}

#[test]
fn scalar_walkthrough() {
    let a = OwningValue::new(10).unwrap();
    let b = OwningValue::new(20).unwrap();
    let c = a.add(&b).unwrap();
    let mut d = c.try_clone().unwrap();
    let d_storage = d.handle();
    d.copy_assign(&b).unwrap();

    assert_eq!(*c.value(), 30);
    assert_eq!(*d.value(), 20);
    assert_eq!(*a.value(), 10);
    assert_eq!(*b.value(), 20);
    assert_eq!(d.handle(), d_storage);

    let mut e = OwningValue::default();
    e.move_assign(&mut d);
    assert_eq!(*e.value(), 20);
    assert_eq!(e.handle(), d_storage);
    assert!(d.get().is_none());
    d.destroy();
}

#[test]
#[should_panic(expected = "copy from an empty handle")]
fn array_copy_assign_from_moved_from_panics() {
    let mut dst = OwningArray::filled(3, 1.0).unwrap();
    let mut src = OwningArray::from_slice(&[2.0]).unwrap();
    let _kept = src.take();
    let _ = dst.copy_assign(&src);
}

#[test]
fn array_assignments_chain_through_reallocation() {
    let mut dst = OwningArray::filled(4, 0.0).unwrap();
    let short = OwningArray::from_slice(&[1.0, 2.0]).unwrap();
    let other = OwningArray::from_slice(&[3.0, 4.0]).unwrap();
    let len = dst.copy_assign(&short).unwrap().copy_assign(&other).unwrap().len();
    assert_eq!(len, 2);
    assert_eq!(dst.as_slice(), Some(&[3.0, 4.0][..]));
    assert_ne!(dst.handle(), other.handle());
}
