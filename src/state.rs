//! Lock word shared by the lazy value providers.
//!
//! Every lazy provider owns one [`OnceLock`]: a single `AtomicU8` that is both the
//! "has this been evaluated" discriminant and the slow-path mutex. Readers that find
//! the value published never touch anything but an acquire load; readers that race the
//! first evaluation park on the address of the word via `parking_lot_core`.
//!
//! The byte is laid out as:
//! - Bit 0: DONE - the result has been published
//! - Bit 1: LOCKED - a thread is running the delegate
//! - Bit 2: WAITING - at least one thread is parked on the word
//! - Bit 3: POISONED - the delegate unwound; the provider can never complete
//! - Bits 4-7: EPOCH - generation counter, bumped on every terminal transition
//!
//! DONE and POISONED are terminal: once either is set the word is never written again,
//! which is what makes the state transition one-way.

use core::mem;
use core::sync::atomic::{AtomicU8, Ordering};

use parking_lot_core::{DEFAULT_PARK_TOKEN, DEFAULT_UNPARK_TOKEN};

/// Result of an attempt to take the evaluation lock.
pub(crate) enum LockState<'a> {
   /// The result is already published.
   Done,
   /// A previous evaluation unwound.
   Poisoned,
   /// The caller owns the evaluation and must commit through the guard.
   Acquired(OnceGuard<'a>),
}

/// Atomic evaluation state of a single provider instance.
#[repr(transparent)]
pub(crate) struct OnceLock(AtomicU8);

impl OnceLock {
   /// Bit flag: result published.
   const DONE: u8 = 1;
   /// Bit flag: delegate running.
   const LOCKED: u8 = 2;
   /// Bit flag: at least one thread is parked.
   const WAITING: u8 = 4;
   /// Bit flag: delegate unwound while holding the lock.
   const POISONED: u8 = 8;
   /// Start of epoch bits.
   const EPOCH_1: u8 = 16;
   /// Mask for epoch bits.
   const EPOCH_MASK: u8 = !(Self::DONE | Self::LOCKED | Self::WAITING | Self::POISONED);

   #[inline(always)]
   const fn next_epoch(current_state: u8) -> u8 {
      (current_state & Self::EPOCH_MASK).wrapping_add(Self::EPOCH_1) & Self::EPOCH_MASK
   }

   /// Creates the state of a provider whose delegate has not run yet.
   #[inline]
   pub(crate) const fn new() -> Self {
      Self(AtomicU8::new(0))
   }

   /// Creates the state of a provider that is evaluated from construction.
   #[inline]
   pub(crate) const fn done() -> Self {
      Self(AtomicU8::new(Self::DONE))
   }

   #[inline]
   fn notify_all(&self) {
      // SAFETY: The key is the address of the atomic, the same key used by `wait`.
      unsafe {
         parking_lot_core::unpark_all(self.0.as_ptr() as usize, DEFAULT_UNPARK_TOKEN);
      }
   }

   /// Parks the current thread until the word moves away from `expected_state`.
   #[inline]
   fn wait(&self, expected_state: u8) {
      // SAFETY: See `notify_all`.
      unsafe {
         // The validate closure runs under the bucket lock, so a `notify_all` issued after
         // the word changed can't be missed.
         let _ = parking_lot_core::park(
            self.0.as_ptr() as usize,
            || self.0.load(Ordering::Acquire) == expected_state,
            || {},
            |_, _| {},
            DEFAULT_PARK_TOKEN,
            None,
         );
      }
   }

   /// Swaps in a terminal flag with a fresh epoch and wakes parked threads.
   /// Returns the previous state.
   #[inline]
   fn settle(&self, flag: u8) -> u8 {
      let current_state = self.0.load(Ordering::Relaxed);
      let new_state = flag | Self::next_epoch(current_state);

      // Release pairs with the acquire loads in `is_done` and `lock_step`: whatever the
      // lock holder wrote into the slot is visible to anyone who observes `flag`.
      let prev_state = self.0.swap(new_state, Ordering::Release);
      if prev_state & Self::WAITING != 0 {
         self.notify_all();
      }
      prev_state
   }

   /// Publishes the result. Returns `true` if the state was not already DONE.
   #[inline]
   pub(crate) fn set_done(&self) -> bool {
      self.settle(Self::DONE) & Self::DONE == 0
   }

   /// Marks the provider as permanently failed to evaluate.
   #[inline]
   pub(crate) fn set_poisoned(&self) {
      self.settle(Self::POISONED);
   }

   /// Checks whether the result is published.
   ///
   /// Acquire ordering: a `true` here makes the published slot safe to read.
   #[inline]
   pub(crate) fn is_done(&self) -> bool {
      self.0.load(Ordering::Acquire) & Self::DONE != 0
   }

   /// Checks whether a previous evaluation unwound.
   #[inline]
   pub(crate) fn is_poisoned(&self) -> bool {
      self.0.load(Ordering::Acquire) & Self::POISONED != 0
   }

   /// One attempt at taking the lock.
   ///
   /// Returns `Ok` with a terminal or acquired state, or `Err(state)` when another thread
   /// holds the lock; in that case WAITING is set in `state` and the caller should park
   /// on it.
   #[inline]
   fn lock_step(&self) -> Result<LockState<'_>, u8> {
      loop {
         let current_state = self.0.load(Ordering::Acquire);
         if current_state & Self::DONE != 0 {
            return Ok(LockState::Done);
         }
         if current_state & Self::POISONED != 0 {
            return Ok(LockState::Poisoned);
         }

         if current_state & Self::LOCKED == 0 {
            match self.0.compare_exchange_weak(
               current_state,
               current_state | Self::LOCKED,
               Ordering::Acquire,
               Ordering::Relaxed,
            ) {
               Ok(_) => return Ok(LockState::Acquired(OnceGuard::new(self))),
               Err(_) => {
                  core::hint::spin_loop();
                  continue;
               }
            }
         }

         if current_state & Self::WAITING == 0 {
            let new_state = current_state | Self::WAITING;
            match self.0.compare_exchange_weak(
               current_state,
               new_state,
               Ordering::Relaxed,
               Ordering::Relaxed,
            ) {
               Ok(_) => return Err(new_state),
               Err(_) => {
                  core::hint::spin_loop();
                  continue;
               }
            }
         }
         return Err(current_state);
      }
   }

   /// Takes the evaluation lock, parking while another thread holds it.
   ///
   /// Never returns `Acquired` once the word is terminal, so the re-check after a wake-up
   /// is built in.
   #[inline]
   pub(crate) fn lock(&self) -> LockState<'_> {
      let mut state_when_failed = match self.lock_step() {
         Ok(state) => return state,
         Err(state) => state,
      };
      loop {
         self.wait(state_when_failed);
         match self.lock_step() {
            Ok(state) => return state,
            Err(new_state) => state_when_failed = new_state,
         }
      }
   }

   /// Takes the evaluation lock from async code.
   ///
   /// Yields to the runtime first, hoping the holder finishes; on the multi-thread runtime
   /// falls back to parking inside `block_in_place`.
   #[cfg(any(feature = "async-tokio", feature = "async-tokio-mt"))]
   #[inline]
   pub(crate) async fn lock_async(&self) -> LockState<'_> {
      #[allow(clippy::never_loop)]
      loop {
         for _ in 0..16 {
            match self.lock_step() {
               Ok(state) => return state,
               Err(state) => {
                  for _ in 0..32 {
                     tokio::task::yield_now().await;
                     if self.0.load(Ordering::Relaxed) != state {
                        break;
                     }
                  }
               }
            }
         }

         #[cfg(feature = "async-tokio-mt")]
         {
            return match self.lock_step() {
               Ok(state) => state,
               Err(state) => tokio::task::block_in_place(|| {
                  self.wait(state);
                  self.lock()
               }),
            };
         }
      }
   }
}

/// Proof of holding the evaluation lock.
///
/// Must be [`commit`](Self::commit)ted once the result is written. Dropping it instead
/// (the delegate unwound) poisons the provider and wakes every parked thread.
pub(crate) struct OnceGuard<'a> {
   state: &'a OnceLock,
}

impl<'a> OnceGuard<'a> {
   /// Assumes LOCKED is already set on `state`.
   #[inline(always)]
   const fn new(state: &'a OnceLock) -> Self {
      Self { state }
   }

   /// Publishes the result and releases the lock.
   #[inline(always)]
   pub(crate) fn commit(self) -> bool {
      let success = self.state.set_done();
      mem::forget(self);
      success
   }
}

impl Drop for OnceGuard<'_> {
   #[inline]
   fn drop(&mut self) {
      log::warn!("value delegate unwound during evaluation; provider poisoned");
      self.state.set_poisoned();
   }
}
