//! Memo cell: a delegate that is replaced by its own result on first evaluation.
//!
//! [`Memo<F, T>`] is the storage behind both lazy providers. It holds the delegate `F`
//! until the first read, then moves it out, runs it under the lock word, and stores the
//! produced `T` in the same slot. The delegate is consumed by value, so it cannot run
//! twice, and whatever it captured is released as soon as evaluation finishes.
//!
//! The slot is a union: which field is live is decided by the lock word alone, never by
//! the payload, so a stored `None` or `Err` is as "evaluated" as any other value.

use core::cell::UnsafeCell;
use core::{mem, ptr};

use crate::state::{LockState, OnceGuard, OnceLock};

/// Either the pending delegate or the settled result.
union Slot<F, T> {
   pending: mem::ManuallyDrop<F>,
   settled: mem::ManuallyDrop<T>,
}

impl<F, T> Slot<F, T> {
   #[inline(always)]
   const fn pending(delegate: F) -> Self {
      Self {
         pending: mem::ManuallyDrop::new(delegate),
      }
   }

   #[inline(always)]
   const fn settled(value: T) -> Self {
      Self {
         settled: mem::ManuallyDrop::new(value),
      }
   }

   #[inline(always)]
   unsafe fn take_pending(&mut self) -> F {
      unsafe { mem::ManuallyDrop::take(&mut self.pending) }
   }

   #[inline(always)]
   unsafe fn take_settled(&mut self) -> T {
      unsafe { mem::ManuallyDrop::take(&mut self.settled) }
   }
}

/// Exclusive access to the slot, held by the one thread that won the lock.
struct Evaluation<'a, F, T> {
   slot: &'a mut Slot<F, T>,
   guard: OnceGuard<'a>,
}

impl<'a, F, T> Evaluation<'a, F, T> {
   /// # Safety
   ///
   /// `guard` must be the lock of the memo owning `slot`, and the slot must still hold
   /// the pending delegate.
   #[inline(always)]
   unsafe fn new(slot: &'a UnsafeCell<Slot<F, T>>, guard: OnceGuard<'a>) -> Self {
      Self {
         slot: unsafe { &mut *slot.get() },
         guard,
      }
   }

   /// Consumes the delegate, stores what `eval` makes of it, and publishes.
   #[inline(always)]
   fn run<G>(self, eval: G)
   where
      G: FnOnce(F) -> T,
   {
      // SAFETY: `new` requires a pending slot; this is the only read of it.
      let delegate = unsafe { self.slot.take_pending() };
      // If `eval` unwinds, `self.guard` is dropped and poisons the lock word; the slot
      // stays moved-from and is never read or dropped again.
      let value = eval(delegate);
      *self.slot = Slot::settled(value);
      self.guard.commit();
   }
}

/// Storage for a value computed at most once from a stored delegate.
pub(crate) struct Memo<F, T> {
   slot: UnsafeCell<Slot<F, T>>,
   lock: OnceLock,
}

impl<F, T> Memo<F, T> {
   #[inline]
   pub(crate) const fn new(delegate: F) -> Self {
      Self {
         lock: OnceLock::new(),
         slot: UnsafeCell::new(Slot::pending(delegate)),
      }
   }

   #[inline]
   pub(crate) const fn with_value(value: T) -> Self {
      Self {
         lock: OnceLock::done(),
         slot: UnsafeCell::new(Slot::settled(value)),
      }
   }

   #[inline]
   pub(crate) fn is_done(&self) -> bool {
      self.lock.is_done()
   }

   #[inline]
   pub(crate) fn is_poisoned(&self) -> bool {
      self.lock.is_poisoned()
   }

   /// Returns the stored result if it has been published. Never evaluates.
   #[inline]
   pub(crate) fn get(&self) -> Option<&T> {
      if self.is_done() {
         // SAFETY: `is_done` observed DONE with acquire ordering.
         Some(unsafe { self.get_unchecked() })
      } else {
         None
      }
   }

   /// # Safety
   ///
   /// DONE must have been observed with acquire ordering.
   #[inline]
   unsafe fn get_unchecked(&self) -> &T {
      debug_assert!(self.is_done(), "get_unchecked called on unevaluated Memo");
      unsafe { &(*self.slot.get()).settled }
   }

   /// Returns the result, running `eval` on the delegate if nobody has yet.
   ///
   /// Concurrent callers wait for the one evaluation in progress.
   ///
   /// # Panics
   ///
   /// If a previous evaluation unwound.
   #[inline]
   pub(crate) fn force<G>(&self, eval: G) -> &T
   where
      G: FnOnce(F) -> T,
   {
      if let Some(value) = self.get() {
         return value;
      }
      self.initialize(eval);
      // SAFETY: `initialize` only returns once DONE is set.
      unsafe { self.get_unchecked() }
   }

   #[cold]
   fn initialize<G>(&self, eval: G)
   where
      G: FnOnce(F) -> T,
   {
      match self.lock.lock() {
         LockState::Done => {}
         LockState::Poisoned => poisoned(),
         // SAFETY: We hold the lock and DONE is unset, so the delegate is still pending.
         LockState::Acquired(guard) => unsafe { Evaluation::new(&self.slot, guard).run(eval) },
      }
   }

   /// Async flavour of [`force`](Self::force): waiting for a concurrent evaluation yields
   /// to the runtime instead of parking the worker. `eval` itself still runs inline.
   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   #[inline]
   pub(crate) async fn force_async<G>(&self, eval: G) -> &T
   where
      G: FnOnce(F) -> T,
   {
      if let Some(value) = self.get() {
         return value;
      }
      self.initialize_async(eval).await;
      // SAFETY: `initialize_async` only returns once DONE is set.
      unsafe { self.get_unchecked() }
   }

   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   #[cold]
   async fn initialize_async<G>(&self, eval: G)
   where
      G: FnOnce(F) -> T,
   {
      match self.lock.lock_async().await {
         LockState::Done => {}
         LockState::Poisoned => poisoned(),
         // SAFETY: See `initialize`.
         LockState::Acquired(guard) => unsafe { Evaluation::new(&self.slot, guard).run(eval) },
      }
   }

   /// Unwraps the cell: `Ok(result)` if evaluated, `Err(delegate)` if still pending.
   ///
   /// # Panics
   ///
   /// If a previous evaluation unwound.
   pub(crate) fn into_inner(self) -> Result<T, F> {
      let this = mem::ManuallyDrop::new(self);
      if this.lock.is_poisoned() {
         poisoned();
      }
      // SAFETY: `this` is never dropped, so the slot is moved out exactly once.
      let mut slot = unsafe { ptr::read(this.slot.get()) };
      if this.lock.is_done() {
         // SAFETY: DONE means the settled field is live.
         Ok(unsafe { slot.take_settled() })
      } else {
         // SAFETY: Neither DONE nor POISONED, so the delegate never ran.
         Err(unsafe { slot.take_pending() })
      }
   }
}

#[cold]
#[track_caller]
fn poisoned() -> ! {
   panic!("lazy value instance has previously been poisoned")
}

// SAFETY:
// The delegate is moved out and run by exactly one thread, the lock holder, so it only
// has to be `Send`. The result is shared by reference between threads (`T: Sync`) and
// may be dropped by a thread other than the one that produced it (`T: Send`).
unsafe impl<F: Send, T: Send + Sync> Sync for Memo<F, T> {}
// SAFETY:
// Moving a `Memo` moves whichever of `F` or `T` is live.
unsafe impl<F: Send, T: Send> Send for Memo<F, T> {}

impl<F, T> Drop for Memo<F, T> {
   #[inline]
   fn drop(&mut self) {
      let slot = self.slot.get_mut();
      // SAFETY: The lock word says which field is live; a poisoned slot holds nothing.
      unsafe {
         if self.lock.is_done() {
            mem::ManuallyDrop::drop(&mut slot.settled);
         } else if !self.lock.is_poisoned() {
            mem::ManuallyDrop::drop(&mut slot.pending);
         }
      }
   }
}

#[cfg(test)]
mod tests {
   use std::panic::{self, AssertUnwindSafe};
   use std::sync::Arc;

   use super::*;

   #[test]
   fn test_pending_delegate_dropped_with_memo() {
      let captured = Arc::new(());
      let memo = {
         let captured = Arc::clone(&captured);
         Memo::<_, usize>::new(move || Arc::strong_count(&captured))
      };
      assert_eq!(Arc::strong_count(&captured), 2);
      drop(memo);
      assert_eq!(Arc::strong_count(&captured), 1);
   }

   #[test]
   fn test_delegate_released_after_evaluation() {
      let captured = Arc::new(());
      let memo = {
         let captured = Arc::clone(&captured);
         Memo::new(move || Arc::strong_count(&captured))
      };
      assert_eq!(*memo.force(|f| f()), 2);
      // The delegate and its captures are gone; only the result remains.
      assert_eq!(Arc::strong_count(&captured), 1);
   }

   #[test]
   fn test_settled_value_dropped_with_memo() {
      let value = Arc::new(());
      let memo = Memo::<fn() -> Arc<()>, _>::with_value(Arc::clone(&value));
      assert_eq!(Arc::strong_count(&value), 2);
      drop(memo);
      assert_eq!(Arc::strong_count(&value), 1);
   }

   #[test]
   fn test_into_inner() {
      let pending = Memo::<_, i32>::new(|| 7);
      let delegate = pending.into_inner().unwrap_err();
      assert_eq!(delegate(), 7);

      let evaluated = Memo::new(|| 7);
      evaluated.force(|f| f() * 6);
      assert_eq!(evaluated.into_inner().ok(), Some(42));
   }

   #[test]
   fn test_poisoned_memo_drops_nothing() {
      let captured = Arc::new(());
      let memo = {
         let captured = Arc::clone(&captured);
         Memo::<_, ()>::new(move || {
            let _captured = captured;
            panic!("delegate failure");
         })
      };
      let result = panic::catch_unwind(AssertUnwindSafe(|| memo.force(|f| f())));
      assert!(result.is_err());
      assert!(memo.is_poisoned());
      // The delegate was consumed by the failed evaluation.
      assert_eq!(Arc::strong_count(&captured), 1);
      drop(memo);
      assert_eq!(Arc::strong_count(&captured), 1);
   }
}
