//! Eager provider: the delegate runs in the constructor.

use crate::value::{Lazy, Value};

/// A provider that computes its value once, immediately, at construction.
///
/// After [`new`](Self::new) returns, reads involve no computation and no locking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Eager<T> {
   result: T,
}

impl<T> Eager<T> {
   /// Invokes `delegate` exactly once and stores its result.
   #[inline]
   pub fn new<F>(delegate: F) -> Self
   where
      F: FnOnce() -> T,
   {
      log::trace!("evaluating eager value delegate");
      Self { result: delegate() }
   }

   /// Creates a provider holding `value`, with no delegate to run.
   #[inline]
   #[must_use]
   pub const fn with_value(value: T) -> Self {
      Self { result: value }
   }

   /// Returns the stored result.
   #[inline]
   pub const fn get(&self) -> &T {
      &self.result
   }

   /// Consumes the provider, returning the stored result.
   #[inline]
   pub fn into_inner(self) -> T {
      self.result
   }
}

impl<T> Value<T> for Eager<T> {
   #[inline]
   fn get(&self) -> &T {
      &self.result
   }
}

impl<T> Lazy for Eager<T> {
   #[inline]
   fn is_initialized(&self) -> bool {
      true
   }
}
