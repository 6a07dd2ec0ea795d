use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_values::{values, Constant, Eager, FallibleValue, Lazy, Settled, Value, ValueError};

#[test]
fn test_empty() {
   let empty = values::empty::<String>();
   assert_eq!(empty.get(), &None);
   assert!(empty.is_initialized());
   assert_eq!(empty, Constant::<Option<String>>::EMPTY);
}

#[test]
fn test_empty_copies_are_equal() {
   let first = values::empty::<u8>();
   let second = values::empty::<u8>();
   assert_eq!(first, second);
   assert_eq!(values::empty_fallible::<u8, ()>(), values::empty_fallible());
}

#[test]
fn test_empty_fallible() {
   let empty = values::empty_fallible::<String, std::io::Error>();
   assert!(matches!(empty.get(), Ok(None)));
   assert!(empty.is_initialized());
}

#[test]
fn test_empty_usable_in_static() {
   static NOTHING: Constant<Option<u64>> = values::empty();
   static NOTHING_FALLIBLE: Settled<Option<u64>, String> = values::empty_fallible();
   assert_eq!(NOTHING.get(), &None);
   assert_eq!(NOTHING_FALLIBLE.get(), Ok(&None));
}

#[test]
fn test_of() {
   let constant = values::of(String::from("fixed"));
   assert_eq!(constant.get(), "fixed");
   assert!(constant.is_initialized());
   // Same instance on every read
   assert!(std::ptr::eq(constant.get(), constant.get()));
}

#[test]
fn test_of_none_is_empty() {
   assert_eq!(values::of(None::<i32>), values::empty());
   assert_eq!(values::of(None::<i32>).get(), &None);
}

#[test]
fn test_constant_structural_equality_and_hash() {
   assert_eq!(values::of(5), Constant::from(5));
   assert_ne!(values::of(5), values::of(6));

   let set: HashSet<_> = [values::of("a"), values::of("a"), values::of("b")]
      .into_iter()
      .collect();
   assert_eq!(set.len(), 2);
}

#[test]
fn test_fallible_of() {
   let settled = values::fallible_of::<_, String>(7);
   assert_eq!(settled.get(), Ok(&7));
   assert!(!settled.is_failure());
   assert!(settled.is_initialized());
   assert_eq!(settled.into_result(), Ok(7));
}

#[test]
fn test_throwing_replays_same_failure() {
   let settled = values::throwing::<i32, _>(String::from("broken"));
   assert!(settled.is_failure());
   assert!(settled.is_initialized());

   let first = settled.get().unwrap_err();
   let second = settled.get().unwrap_err();
   assert_eq!(first, "broken");
   assert!(std::ptr::eq(first, second));
}

#[test]
fn test_settled_structural_equality() {
   assert_eq!(
      values::throwing::<i32, _>("e"),
      Settled::from(Err::<i32, _>("e"))
   );
   assert_ne!(values::throwing::<i32, _>("e"), values::fallible_of(1));
   let back: Result<i32, &str> = values::fallible_of::<i32, &str>(1).into();
   assert_eq!(back, Ok(1));
}

#[test]
fn test_try_throwing() {
   let missing = values::try_throwing::<i32, String>(None);
   assert_eq!(missing.unwrap_err(), ValueError::MissingFailure);

   let present = values::try_throwing::<i32, _>(Some("boom")).unwrap();
   assert_eq!(present.get(), Err(&"boom"));
}

#[test]
fn test_value_error_display() {
   assert_eq!(
      ValueError::MissingFailure.to_string(),
      "supplied failure instance is absent"
   );
}

#[test]
fn test_eager_is_immediate() {
   let counter = AtomicUsize::new(0);
   let eager = values::eager(|| {
      counter.fetch_add(1, Ordering::SeqCst);
      42
   });
   // Evaluated before any read
   assert_eq!(counter.load(Ordering::SeqCst), 1);
   assert!(eager.is_initialized());

   for _ in 0..100 {
      assert_eq!(eager.get(), &42);
   }
   assert_eq!(counter.load(Ordering::SeqCst), 1);
   assert_eq!(eager.into_inner(), 42);
}

#[test]
fn test_eager_equality() {
   assert_eq!(Eager::new(|| 1), values::eager(|| 1));
   assert_ne!(Eager::new(|| 1), Eager::new(|| 2));
}

#[test]
fn test_eager_or_empty() {
   let absent = values::eager_or_empty(None::<fn() -> Option<u8>>);
   assert_eq!(absent.get(), &None);
   assert!(absent.is_initialized());

   assert_eq!(absent, Eager::with_value(None));

   let present = values::eager_or_empty(Some(|| Some(3u8)));
   assert_eq!(present.get(), &Some(3));
}

#[test]
fn test_lazy_or_empty_absent() {
   let absent = values::lazy_or_empty(None::<fn() -> Option<String>>);
   assert!(absent.is_initialized());
   assert_eq!(absent.get(), &None);
}

#[test]
fn test_lazy_or_empty_present() {
   let counter = AtomicUsize::new(0);
   let present = values::lazy_or_empty(Some(|| {
      counter.fetch_add(1, Ordering::SeqCst);
      Some(String::from("late"))
   }));
   assert!(!present.is_initialized());
   assert_eq!(counter.load(Ordering::SeqCst), 0);
   assert_eq!(present.get().as_deref(), Some("late"));
   assert_eq!(present.get().as_deref(), Some("late"));
   assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_lazy_fallible_or_empty() {
   let absent =
      values::lazy_fallible_or_empty(None::<fn() -> Result<Option<u8>, String>>);
   assert!(absent.is_initialized());
   assert_eq!(absent.get(), Ok(&None));

   let present = values::lazy_fallible_or_empty(Some(|| Err::<Option<u8>, _>("nope")));
   assert!(!present.is_initialized());
   assert_eq!(present.get(), Err(&"nope"));
   assert!(present.is_initialized());
}

#[test]
fn test_lazy_and_lazy_fallible() {
   let lazy = values::lazy(|| 2 + 2);
   assert!(!lazy.is_initialized());
   assert_eq!(lazy.get(), &4);

   let fallible = values::lazy_fallible(|| "x".parse::<i32>());
   assert!(fallible.get().is_err());
   assert!(fallible.is_initialized());
}

#[test]
fn test_providers_behind_one_trait() {
   fn total<V: Value<i32> + ?Sized>(provider: &V) -> i32 {
      *provider.get()
   }

   let providers: Vec<Box<dyn Value<i32>>> = vec![
      Box::new(values::of(1)),
      Box::new(values::eager(|| 2)),
      Box::new(values::lazy(|| 3)),
   ];
   let sum: i32 = providers.iter().map(|provider| total(&**provider)).sum();
   assert_eq!(sum, 6);

   let shared = Arc::new(values::lazy(|| 10));
   assert_eq!(total(&shared), 10);
}

#[test]
fn test_fallible_providers_behind_one_trait() {
   fn first_failure(providers: &[&dyn FallibleValue<i32, String>]) -> Option<String> {
      providers
         .iter()
         .find_map(|provider| provider.get().err().cloned())
   }

   let ok = values::fallible_of::<i32, String>(1);
   let lazy_err = values::lazy_fallible(|| Err::<i32, _>(String::from("lazy")));
   let err = values::throwing::<i32, String>(String::from("constant"));
   assert_eq!(
      first_failure(&[&ok, &lazy_err, &err]),
      Some(String::from("lazy"))
   );
}

#[test]
fn test_introspection_through_lazy_trait() {
   fn all_ready(providers: &[&dyn Lazy]) -> bool {
      providers.iter().all(|provider| provider.is_initialized())
   }

   let constant = values::of(1);
   let eager = values::eager(|| 1);
   let lazy = values::lazy(|| 1);
   assert!(!all_ready(&[&constant, &eager, &lazy]));
   lazy.get();
   assert!(all_ready(&[&constant, &eager, &lazy]));
}
