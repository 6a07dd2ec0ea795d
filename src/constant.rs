//! Constant providers: a value, or a failure, known up front.

use crate::value::{FallibleValue, Lazy, Value};

/// A provider that always returns the value it was built with.
///
/// `Constant::<Option<T>>::EMPTY` is the empty provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Constant<T> {
   value: T,
}

impl<T> Constant<T> {
   /// Creates a provider that always returns `value`.
   #[inline]
   #[must_use]
   pub const fn new(value: T) -> Self {
      Self { value }
   }

   /// Returns the fixed value.
   #[inline]
   pub const fn get(&self) -> &T {
      &self.value
   }

   /// Consumes the provider, returning the fixed value.
   #[inline]
   pub fn into_inner(self) -> T {
      self.value
   }
}

impl<T> Constant<Option<T>> {
   /// The empty provider: `get()` always returns `None`.
   pub const EMPTY: Self = Self::new(None);
}

impl<T> Value<T> for Constant<T> {
   #[inline]
   fn get(&self) -> &T {
      &self.value
   }
}

impl<T> Lazy for Constant<T> {
   #[inline]
   fn is_initialized(&self) -> bool {
      true
   }
}

impl<T> From<T> for Constant<T> {
   #[inline]
   fn from(value: T) -> Self {
      Self::new(value)
   }
}

/// A fallible provider whose outcome is already decided.
///
/// Either every `get()` returns the stored value, or every `get()` returns the stored
/// failure. Lazy fallible providers settle into exactly this shape after their one
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Settled<T, E> {
   outcome: Result<T, E>,
}

impl<T, E> Settled<T, E> {
   /// A provider that always succeeds with `value`.
   #[inline]
   #[must_use]
   pub const fn value(value: T) -> Self {
      Self { outcome: Ok(value) }
   }

   /// A provider that always fails with `failure`.
   #[inline]
   #[must_use]
   pub const fn failure(failure: E) -> Self {
      Self {
         outcome: Err(failure),
      }
   }

   /// Returns the value, or a reference to the one stored failure.
   #[inline]
   pub fn get(&self) -> Result<&T, &E> {
      self.outcome.as_ref()
   }

   /// Returns `true` if every `get()` hands out the stored failure.
   #[inline]
   pub fn is_failure(&self) -> bool {
      self.outcome.is_err()
   }

   /// Consumes the provider, returning the stored outcome.
   #[inline]
   pub fn into_result(self) -> Result<T, E> {
      self.outcome
   }
}

impl<T, E> Settled<Option<T>, E> {
   /// The empty fallible provider: `get()` always returns `Ok(&None)`.
   pub const EMPTY: Self = Self::value(None);
}

impl<T, E> FallibleValue<T, E> for Settled<T, E> {
   #[inline]
   fn get(&self) -> Result<&T, &E> {
      self.outcome.as_ref()
   }
}

impl<T, E> Lazy for Settled<T, E> {
   #[inline]
   fn is_initialized(&self) -> bool {
      true
   }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
   #[inline]
   fn from(outcome: Result<T, E>) -> Self {
      Self { outcome }
   }
}

impl<T, E> From<Settled<T, E>> for Result<T, E> {
   #[inline]
   fn from(settled: Settled<T, E>) -> Self {
      settled.outcome
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_empty_is_none() {
      assert_eq!(Constant::<Option<u8>>::EMPTY.get(), &None);
      assert_eq!(Settled::<Option<u8>, ()>::EMPTY.get(), Ok(&None));
   }

   #[test]
   fn test_failure_is_the_same_instance() {
      let settled = Settled::<i32, String>::failure("boom".to_string());
      let first = settled.get().unwrap_err();
      let second = settled.get().unwrap_err();
      assert!(std::ptr::eq(first, second));
      assert!(settled.is_failure());
   }
}
