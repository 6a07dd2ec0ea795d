//! Memoizing value providers with at-most-once evaluation.
//!
//! A provider hands out a value through a zero-argument accessor. This crate provides
//! providers that know their value up front, compute it immediately, or compute it on
//! first access:
//!
//! - [`Constant<T>`] and [`Settled<T, E>`]: a fixed value, or a fixed failure.
//! - [`Eager<T>`]: runs its delegate inside the constructor.
//! - [`LazyValue<T, F>`]: runs its delegate on the first [`get`](LazyValue::get), at most
//!   once, even when many threads race the first read.
//! - [`LazyFallibleValue<T, E, F>`]: the same for delegates returning `Result`; a failure
//!   is cached and handed out on every later read instead of being retried.
//!
//! The [`values`] module gathers construction functions for all of them, including the
//! variants that accept an absent value, failure or delegate.
//!
//! # Features
//!
//! - **Lock-free fast path**: reading a published value is a single acquire load.
//! - **Efficient blocking**: threads racing the first read park on a futex via
//!   `parking_lot_core` until the one evaluation finishes.
//! - **Empty is a value**: a delegate returning `None` is cached like any other result.
//! - **Failure caching**: the stored failure is returned by reference, so every read sees
//!   the very same instance.
//! - **Async support**: `get_async` waits for a concurrent evaluation cooperatively on a
//!   tokio runtime.
//!
//! # Examples
//!
//! ## Lazy value
//!
//! ```rust
//! use once_values::values;
//!
//! let config = values::lazy(|| {
//!    // Runs once, on the first `get`, whichever thread gets there first.
//!    std::env::var("APP_MODE").ok()
//! });
//!
//! assert!(!config.is_initialized());
//! let mode = config.get();
//! assert!(config.is_initialized());
//! assert_eq!(config.get(), mode);
//! ```
//!
//! ## Cached failure
//!
//! ```rust
//! use once_values::values;
//!
//! let loaded = values::lazy_fallible(|| std::fs::read_to_string("/nonexistent/app.conf"));
//!
//! // The read is attempted once; both calls see the same error.
//! assert!(loaded.get().is_err());
//! assert!(std::ptr::eq(loaded.get().unwrap_err(), loaded.get().unwrap_err()));
//! ```

/// Fixed-value and fixed-failure providers.
mod constant;

/// Provider evaluated at construction.
mod eager;

/// Construction errors.
mod error;

/// Lazy memoizing providers.
mod lazy;

/// Storage for the lazy providers.
mod memo;

/// Internal synchronization state management.
mod state;

/// Provider capabilities.
mod value;

pub mod values;

pub use constant::{Constant, Settled};
pub use eager::Eager;
pub use error::ValueError;
pub use lazy::{LazyFallibleValue, LazyValue};
pub use value::{FallibleValue, Lazy, Value};
