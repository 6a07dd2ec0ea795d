//! Value provider capabilities.
//!
//! A provider is anything that hands out a value through a zero-argument accessor.
//! Providers come in two flavours: [`Value`] never fails, [`FallibleValue`] may hand out
//! a failure instead. [`Lazy`] lets callers ask whether the value has been computed
//! without computing it.
//!
//! All accessors return references into the provider, so repeated reads observe the very
//! same instance, including the same failure instance for fallible providers.

use std::sync::Arc;

/// A provider whose accessor cannot fail.
pub trait Value<T> {
   /// Returns the provided value.
   fn get(&self) -> &T;
}

/// A provider whose accessor may fail with an `E`.
///
/// `E` is chosen by the caller and need not implement [`std::error::Error`].
pub trait FallibleValue<T, E> {
   /// Returns the provided value, or the failure standing in for it.
   fn get(&self) -> Result<&T, &E>;
}

/// Introspection for providers that may defer their computation.
pub trait Lazy {
   /// Returns `true` if the value is already computed.
   ///
   /// Never triggers the computation.
   fn is_initialized(&self) -> bool;
}

impl<T, V: Value<T> + ?Sized> Value<T> for &V {
   #[inline]
   fn get(&self) -> &T {
      (**self).get()
   }
}

impl<T, V: Value<T> + ?Sized> Value<T> for Box<V> {
   #[inline]
   fn get(&self) -> &T {
      (**self).get()
   }
}

impl<T, V: Value<T> + ?Sized> Value<T> for Arc<V> {
   #[inline]
   fn get(&self) -> &T {
      (**self).get()
   }
}

impl<T, E, V: FallibleValue<T, E> + ?Sized> FallibleValue<T, E> for &V {
   #[inline]
   fn get(&self) -> Result<&T, &E> {
      (**self).get()
   }
}

impl<T, E, V: FallibleValue<T, E> + ?Sized> FallibleValue<T, E> for Box<V> {
   #[inline]
   fn get(&self) -> Result<&T, &E> {
      (**self).get()
   }
}

impl<T, E, V: FallibleValue<T, E> + ?Sized> FallibleValue<T, E> for Arc<V> {
   #[inline]
   fn get(&self) -> Result<&T, &E> {
      (**self).get()
   }
}

impl<L: Lazy + ?Sized> Lazy for &L {
   #[inline]
   fn is_initialized(&self) -> bool {
      (**self).is_initialized()
   }
}

impl<L: Lazy + ?Sized> Lazy for Box<L> {
   #[inline]
   fn is_initialized(&self) -> bool {
      (**self).is_initialized()
   }
}

impl<L: Lazy + ?Sized> Lazy for Arc<L> {
   #[inline]
   fn is_initialized(&self) -> bool {
      (**self).is_initialized()
   }
}
