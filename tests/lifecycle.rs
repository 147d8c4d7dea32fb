extern crate smallany;

use std::any::TypeId;
use std::mem;

use smallany::{anycast, anycast_mut, anycast_ref, SmallAny, Strategy, TypeTag};

#[test]
fn value_set() {
    let mut any = SmallAny::new_empty();
    any.emplace(20i32);
    assert!(any.has_value());
}

#[test]
fn reset_after_value_set() {
    let mut any = SmallAny::new_empty();
    any.emplace(20i32);
    any.reset();
    assert!(!any.has_value());
}

#[test]
fn value_set_two_times() {
    let mut any = SmallAny::new_empty();
    any.emplace(String::from("first"));
    any.emplace(99i32);
    assert_eq!(anycast::<i32>(&any), Ok(99));
}

#[test]
fn reset_several_times() {
    let mut any = SmallAny::new_empty();
    any.reset();
    any.reset();
    assert!(!any.has_value());

    any.emplace(42i32);
    any.reset();
    any.reset();
    assert!(!any.has_value());
}

#[test]
fn type_follows_value() {
    let mut any = SmallAny::new_empty();
    any.emplace(20i32);
    assert_eq!(any.type_id(), Some(TypeId::of::<i32>()));

    any.emplace(String::from("something"));
    assert_eq!(any.type_tag(), Some(TypeTag::of::<String>()));
    assert!(anycast::<i32>(&any).unwrap_err().is_type_mismatch());
}

#[test]
fn emplace_different_types() {
    let mut any = SmallAny::new_empty();
    any.emplace(42i32);
    assert_eq!(anycast::<i32>(&any), Ok(42));
    any.emplace(2.5f64);
    assert_eq!(anycast::<f64>(&any), Ok(2.5));
}

#[test]
fn emplace_after_reset() {
    let mut any = SmallAny::new(42i32);
    any.reset();
    assert!(!any.has_value());

    any.emplace(String::from("Hello"));
    assert!(any.has_value());
    assert_eq!(anycast::<String>(&any).unwrap(), "Hello");
}

#[test]
fn emplace_same_type() {
    let mut any = SmallAny::new_empty();
    any.emplace(10i32);
    assert_eq!(anycast::<i32>(&any), Ok(10));
    any.emplace(20i32);
    assert_eq!(anycast::<i32>(&any), Ok(20));
}

#[test]
fn default_is_empty() {
    let any = SmallAny::default();
    assert!(!any.has_value());
    assert_eq!(any.type_tag(), None);
}

#[test]
fn clone_keeps_both() {
    let any = SmallAny::new(10i32);
    let any2 = any.clone();
    assert!(any.has_value());
    assert!(any2.has_value());
    assert_eq!(anycast::<i32>(&any), Ok(10));
    assert_eq!(anycast::<i32>(&any2), Ok(10));
}

#[test]
fn clone_is_independent() {
    let a = SmallAny::new(vec![1, 2, 3]);
    let mut b = a.clone();

    anycast_mut::<Vec<i32>>(&mut b).unwrap().push(4);
    assert_eq!(anycast_ref::<Vec<i32>>(&a).unwrap(), &[1, 2, 3]);
    assert_eq!(anycast_ref::<Vec<i32>>(&b).unwrap(), &[1, 2, 3, 4]);

    let mut c = SmallAny::new_empty();
    c.clone_from(&b);
    anycast_mut::<Vec<i32>>(&mut c).unwrap().clear();
    assert_eq!(anycast_ref::<Vec<i32>>(&b).unwrap().len(), 4);
}

#[test]
fn take_moves_value() {
    let mut any = SmallAny::new(10i32);
    let any2 = any.take();

    assert!(anycast::<i32>(&any2).is_ok());
    assert!(anycast::<i32>(&any).unwrap_err().is_type_mismatch());
    assert!(any2.has_value());
    assert!(!any.has_value());
}

#[test]
fn copy_assignment() {
    let any = SmallAny::new(10i32);
    let mut any2 = SmallAny::new_empty();
    assert!(any.has_value());
    assert!(!any2.has_value());

    any2.clone_from(&any);
    assert!(anycast::<i32>(&any2).is_ok());
    assert!(anycast::<i32>(&any).is_ok());
    assert!(any2.has_value());
    assert!(any.has_value());
}

#[test]
fn move_assignment() {
    let mut any = SmallAny::new(10i32);
    let mut any2 = SmallAny::new_empty();

    any2.move_from(&mut any);
    assert_eq!(anycast::<i32>(&any2), Ok(10));
    assert!(anycast::<i32>(&any).unwrap_err().is_type_mismatch());
    assert!(any2.has_value());
    assert!(!any.has_value());
}

#[test]
fn move_assignment_from_empty_resets() {
    let mut empty = SmallAny::new_empty();
    let mut any = SmallAny::new(String::from("gone"));

    any.move_from(&mut empty);
    assert!(!any.has_value());
    assert!(!empty.has_value());
}

#[test]
fn copy_scopes() {
    let mut any = SmallAny::new_empty();
    {
        let any2 = SmallAny::new(10i32);
        any.clone_from(&any2);
        assert!(anycast::<i32>(&any).is_ok());
        assert!(anycast::<i32>(&any2).is_ok());
    }
    assert_eq!(anycast::<i32>(&any), Ok(10));
}

#[test]
fn move_scopes() {
    let mut any = SmallAny::new_empty();
    {
        let mut any2 = SmallAny::new(String::from("scoped"));
        any.move_from(&mut any2);
        assert!(anycast::<String>(&any).is_ok());
        assert!(anycast::<String>(&any2).unwrap_err().is_type_mismatch());
    }
    assert_eq!(anycast::<String>(&any).unwrap(), "scoped");
}

#[test]
fn move_from_empty() {
    let mut a = SmallAny::new_empty();
    let b = mem::take(&mut a);
    assert!(!b.has_value());
    assert!(!a.has_value());

    let c = a.take();
    assert!(!c.has_value());
}

#[test]
fn swap_two_values() {
    let mut a = SmallAny::new(42i32);
    let mut b = SmallAny::new(String::from("hello"));

    mem::swap(&mut a, &mut b);
    assert_eq!(anycast::<String>(&a).unwrap(), "hello");
    assert_eq!(anycast::<i32>(&b), Ok(42));

    a.swap(&mut b);
    assert_eq!(anycast::<i32>(&a), Ok(42));
    assert_eq!(anycast::<String>(&b).unwrap(), "hello");
}

#[test]
fn swap_with_empty() {
    let mut a = SmallAny::new(vec![0u8; 64]);
    let mut b = SmallAny::new_empty();

    a.swap(&mut b);
    assert!(!a.has_value());
    assert_eq!(anycast_ref::<Vec<u8>>(&b).unwrap().len(), 64);

    let mut c = SmallAny::new_empty();
    a.swap(&mut c);
    assert!(!a.has_value());
    assert!(!c.has_value());
}

#[test]
fn large_vector() {
    let big_vec = vec![1i32; 100_000];
    let mut any = SmallAny::new_empty();
    any.emplace(big_vec.clone());

    assert_eq!(any.strategy(), Some(Strategy::Big));
    let stored = anycast::<Vec<i32>>(&any).unwrap();
    assert_eq!(stored.len(), 100_000);
    assert_eq!(stored, big_vec);
}

#[test]
fn strategy_is_per_type() {
    assert_eq!(SmallAny::strategy_of::<u8>(), Strategy::Small);
    assert_eq!(SmallAny::strategy_of::<usize>(), Strategy::Small);
    assert_eq!(SmallAny::strategy_of::<&'static str>(), Strategy::Big);
    assert_eq!(SmallAny::strategy_of::<String>(), Strategy::Big);

    let small = SmallAny::new(1u8);
    let big = SmallAny::new([1usize; 8]);
    assert_eq!(small.strategy(), Some(Strategy::Small));
    assert_eq!(big.strategy(), Some(Strategy::Big));
    assert_eq!(big.clone().strategy(), Some(Strategy::Big));
}

#[test]
fn try_variants_succeed() {
    let mut any = SmallAny::try_new([7u64; 32]).unwrap();
    assert_eq!(anycast::<[u64; 32]>(&any), Ok([7u64; 32]));

    any.try_emplace(1u8).unwrap();
    any.try_emplace_with(|| String::from("lazy")).unwrap();
    assert_eq!(anycast::<String>(&any).unwrap(), "lazy");

    let copy = any.try_clone().unwrap();
    let mut target = SmallAny::new(0u8);
    target.try_clone_from(&copy).unwrap();
    assert_eq!(anycast::<String>(&target).unwrap(), "lazy");
}
