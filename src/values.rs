//! Construction functions for every provider in the crate.
//!
//! Rust has no null, so an absent argument is an `Option`. The `*_or_empty` functions and
//! [`try_throwing`] are the entry points that accept absence; the rest take a value or
//! delegate that is known to be there.

use crate::constant::{Constant, Settled};
use crate::eager::Eager;
use crate::error::ValueError;
use crate::lazy::{LazyFallibleValue, LazyValue};

/// The empty provider: `get()` always returns `None`.
///
/// Returns a copy of the [`Constant::EMPTY`] const value, not a reference to one shared
/// instance. Copies compare equal, so test emptiness with `==` or `get()`, never by
/// address.
#[inline]
#[must_use]
pub const fn empty<T>() -> Constant<Option<T>> {
   Constant::<Option<T>>::EMPTY
}

/// The empty fallible provider: `get()` always returns `Ok(&None)`.
///
/// Like [`empty`], this is a fresh copy of the [`Settled::EMPTY`] const value.
#[inline]
#[must_use]
pub const fn empty_fallible<T, E>() -> Settled<Option<T>, E> {
   Settled::<Option<T>, E>::EMPTY
}

/// A provider that always returns `value`.
///
/// `of(None)` is indistinguishable from [`empty()`].
#[inline]
#[must_use]
pub const fn of<T>(value: T) -> Constant<T> {
   Constant::new(value)
}

/// A fallible provider that always succeeds with `value`.
#[inline]
#[must_use]
pub const fn fallible_of<T, E>(value: T) -> Settled<T, E> {
   Settled::value(value)
}

/// A fallible provider that always fails with `failure`.
#[inline]
#[must_use]
pub const fn throwing<T, E>(failure: E) -> Settled<T, E> {
   Settled::failure(failure)
}

/// Like [`throwing`], for a failure that may be absent.
///
/// # Errors
///
/// [`ValueError::MissingFailure`] if `failure` is `None`.
#[inline]
pub fn try_throwing<T, E>(failure: Option<E>) -> Result<Settled<T, E>, ValueError> {
   failure
      .map(Settled::failure)
      .ok_or(ValueError::MissingFailure)
}

/// A provider holding the result of running `delegate` right now.
#[inline]
pub fn eager<T, F>(delegate: F) -> Eager<T>
where
   F: FnOnce() -> T,
{
   Eager::new(delegate)
}

/// Like [`eager`], for a delegate that may be absent. An absent delegate yields a provider
/// of `None`.
#[inline]
pub fn eager_or_empty<T, F>(delegate: Option<F>) -> Eager<Option<T>>
where
   F: FnOnce() -> Option<T>,
{
   match delegate {
      Some(delegate) => Eager::new(delegate),
      None => Eager::with_value(None),
   }
}

/// A provider that runs `delegate` on first access, at most once.
#[inline]
#[must_use]
pub const fn lazy<T, F>(delegate: F) -> LazyValue<T, F>
where
   F: FnOnce() -> T,
{
   LazyValue::new(delegate)
}

/// Like [`lazy`], for a delegate that may be absent. An absent delegate yields a provider
/// that is initialized to `None` from the start.
///
/// ```rust
/// use once_values::values;
///
/// let absent = values::lazy_or_empty(None::<fn() -> Option<u32>>);
/// assert!(absent.is_initialized());
/// assert_eq!(absent.get(), &None);
/// ```
#[inline]
#[must_use]
pub fn lazy_or_empty<T, F>(delegate: Option<F>) -> LazyValue<Option<T>, F>
where
   F: FnOnce() -> Option<T>,
{
   match delegate {
      Some(delegate) => LazyValue::new(delegate),
      None => LazyValue::with_value(None),
   }
}

/// A fallible provider that runs `delegate` on first access, at most once, and caches a
/// failure like a value.
#[inline]
#[must_use]
pub const fn lazy_fallible<T, E, F>(delegate: F) -> LazyFallibleValue<T, E, F>
where
   F: FnOnce() -> Result<T, E>,
{
   LazyFallibleValue::new(delegate)
}

/// Like [`lazy_fallible`], for a delegate that may be absent. An absent delegate yields a
/// provider that is initialized to `Ok(None)` from the start.
#[inline]
#[must_use]
pub fn lazy_fallible_or_empty<T, E, F>(delegate: Option<F>) -> LazyFallibleValue<Option<T>, E, F>
where
   F: FnOnce() -> Result<Option<T>, E>,
{
   match delegate {
      Some(delegate) => LazyFallibleValue::new(delegate),
      None => LazyFallibleValue::with_outcome(Ok(None)),
   }
}
