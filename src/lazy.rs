//! Lazy memoizing value providers.
//!
//! This module provides [`LazyValue<T, F>`] and [`LazyFallibleValue<T, E, F>`]. Both hold
//! a delegate closure and run it on the first read, at most once for the lifetime of the
//! provider, no matter how many threads read concurrently. The outcome is then served to
//! every later read.
//!
//! Reads after publication are a single acquire load. The first read (and any reads
//! racing it) go through the per-instance lock word: one thread runs the delegate while
//! the others park, then all of them observe the published result.
//!
//! The fallible provider caches failures exactly like values. A delegate that returns
//! `Err(e)` is never retried; every later read returns `Err` pointing at that same `e`.
//! Build a new provider to try again.

use core::fmt;

use crate::memo::Memo;
use crate::value::{FallibleValue, Lazy, Value};

/// A value computed on first access, at most once.
///
/// ```rust
/// use once_values::LazyValue;
///
/// static GREETING: LazyValue<String> = LazyValue::new(|| "hello".repeat(2));
///
/// assert!(!GREETING.is_initialized());
/// assert_eq!(GREETING.get(), "hellohello");
/// assert!(GREETING.is_initialized());
/// ```
///
/// A delegate returning `None` is a perfectly good result: it is cached like any other and
/// the provider reports itself initialized.
///
/// Calling [`get`](Self::get) on a provider from inside its own delegate deadlocks.
pub struct LazyValue<T, F = fn() -> T> {
   memo: Memo<F, T>,
}

impl<T, F> LazyValue<T, F> {
   /// Creates a provider that is already evaluated to `value`.
   #[inline]
   #[must_use]
   pub const fn with_value(value: T) -> Self {
      Self {
         memo: Memo::with_value(value),
      }
   }

   /// Returns `true` once the delegate has run and its result is published.
   ///
   /// Never triggers evaluation and never blocks.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.memo.is_done()
   }

   /// Returns `true` if the delegate panicked. A poisoned provider never completes and
   /// every [`get`](Self::get) on it panics.
   #[inline]
   pub fn is_poisoned(&self) -> bool {
      self.memo.is_poisoned()
   }

   /// Returns the value if it has already been computed. Never evaluates.
   #[inline]
   pub fn peek(&self) -> Option<&T> {
      self.memo.get()
   }

   /// Consumes the provider: `Ok(value)` if evaluated, `Err(delegate)` if not.
   ///
   /// # Panics
   ///
   /// If the provider is poisoned.
   #[inline]
   pub fn into_inner(self) -> Result<T, F> {
      self.memo.into_inner()
   }
}

impl<T, F: FnOnce() -> T> LazyValue<T, F> {
   /// Creates a provider that will run `delegate` on first access.
   #[inline]
   #[must_use]
   pub const fn new(delegate: F) -> Self {
      Self {
         memo: Memo::new(delegate),
      }
   }

   /// Returns the value, running the delegate if this is the first access.
   ///
   /// Threads that arrive while another thread runs the delegate block until it is done.
   ///
   /// # Panics
   ///
   /// If the delegate panics (in this call or an earlier one).
   #[inline]
   pub fn get(&self) -> &T {
      self.memo.force(evaluate)
   }

   /// Like [`get`](Self::get), but waits for a concurrent evaluation without parking the
   /// runtime's worker thread. The delegate itself still runs synchronously.
   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   #[inline]
   pub async fn get_async(&self) -> &T {
      self.memo.force_async(evaluate).await
   }
}

fn evaluate<T, F: FnOnce() -> T>(delegate: F) -> T {
   log::trace!("evaluating lazy value delegate");
   let value = delegate();
   log::trace!("lazy value delegate returned; publishing");
   value
}

impl<T, F: FnOnce() -> T> Value<T> for LazyValue<T, F> {
   #[inline]
   fn get(&self) -> &T {
      LazyValue::get(self)
   }
}

impl<T, F> Lazy for LazyValue<T, F> {
   #[inline]
   fn is_initialized(&self) -> bool {
      self.memo.is_done()
   }
}

impl<T: Default> Default for LazyValue<T> {
   /// A provider that computes `T::default()` on first access.
   #[inline]
   fn default() -> Self {
      Self::new(T::default)
   }
}

impl<T: fmt::Debug, F> fmt::Debug for LazyValue<T, F> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("LazyValue");
      match self.peek() {
         Some(v) => d.field(v),
         None if self.is_poisoned() => d.field(&format_args!("<poisoned>")),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}

/// A fallible value computed on first access, at most once, with its failure cached.
///
/// ```rust
/// use once_values::LazyFallibleValue;
///
/// let port = LazyFallibleValue::new(|| "80a".parse::<u16>());
///
/// let first = port.get().unwrap_err();
/// let second = port.get().unwrap_err();
/// // Not just equal: the very same failure, never recomputed.
/// assert!(std::ptr::eq(first, second));
/// ```
///
/// Calling [`get`](Self::get) on a provider from inside its own delegate deadlocks.
pub struct LazyFallibleValue<T, E, F = fn() -> Result<T, E>> {
   memo: Memo<F, Result<T, E>>,
}

impl<T, E, F> LazyFallibleValue<T, E, F> {
   /// Creates a provider that is already evaluated to `outcome`.
   #[inline]
   #[must_use]
   pub const fn with_outcome(outcome: Result<T, E>) -> Self {
      Self {
         memo: Memo::with_value(outcome),
      }
   }

   /// Returns `true` once the delegate has run, whether it succeeded or failed.
   ///
   /// Never triggers evaluation and never blocks.
   #[inline]
   pub fn is_initialized(&self) -> bool {
      self.memo.is_done()
   }

   /// Returns `true` if the delegate panicked rather than returning.
   #[inline]
   pub fn is_poisoned(&self) -> bool {
      self.memo.is_poisoned()
   }

   /// Returns the outcome if it has already been computed. Never evaluates.
   #[inline]
   pub fn peek(&self) -> Option<Result<&T, &E>> {
      self.memo.get().map(Result::as_ref)
   }

   /// Consumes the provider: `Ok(outcome)` if evaluated, `Err(delegate)` if not.
   ///
   /// # Panics
   ///
   /// If the provider is poisoned.
   #[inline]
   pub fn into_inner(self) -> Result<Result<T, E>, F> {
      self.memo.into_inner()
   }
}

impl<T, E, F: FnOnce() -> Result<T, E>> LazyFallibleValue<T, E, F> {
   /// Creates a provider that will run `delegate` on first access.
   #[inline]
   #[must_use]
   pub const fn new(delegate: F) -> Self {
      Self {
         memo: Memo::new(delegate),
      }
   }

   /// Returns the value or the cached failure, running the delegate if this is the first
   /// access.
   ///
   /// Threads that arrive while another thread runs the delegate block until it is done.
   ///
   /// # Panics
   ///
   /// If the delegate panics (in this call or an earlier one).
   #[inline]
   pub fn get(&self) -> Result<&T, &E> {
      self.memo.force(capture).as_ref()
   }

   /// Like [`get`](Self::get), but waits for a concurrent evaluation without parking the
   /// runtime's worker thread. The delegate itself still runs synchronously.
   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   #[inline]
   pub async fn get_async(&self) -> Result<&T, &E> {
      self.memo.force_async(capture).await.as_ref()
   }
}

fn capture<T, E, F: FnOnce() -> Result<T, E>>(delegate: F) -> Result<T, E> {
   log::trace!("evaluating lazy fallible value delegate");
   let outcome = delegate();
   if outcome.is_err() {
      log::debug!("lazy fallible value delegate failed; caching the failure");
   }
   outcome
}

impl<T, E, F: FnOnce() -> Result<T, E>> FallibleValue<T, E> for LazyFallibleValue<T, E, F> {
   #[inline]
   fn get(&self) -> Result<&T, &E> {
      LazyFallibleValue::get(self)
   }
}

impl<T, E, F> Lazy for LazyFallibleValue<T, E, F> {
   #[inline]
   fn is_initialized(&self) -> bool {
      self.memo.is_done()
   }
}

impl<T: fmt::Debug, E: fmt::Debug, F> fmt::Debug for LazyFallibleValue<T, E, F> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      let mut d = f.debug_tuple("LazyFallibleValue");
      match self.peek() {
         Some(outcome) => d.field(&outcome),
         None if self.is_poisoned() => d.field(&format_args!("<poisoned>")),
         None => d.field(&format_args!("<uninit>")),
      };
      d.finish()
   }
}
