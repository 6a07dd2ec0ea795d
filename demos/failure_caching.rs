use std::sync::atomic::{AtomicUsize, Ordering};

use once_values::values;

static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

fn main() {
   let config = values::lazy_fallible(|| {
      ATTEMPTS.fetch_add(1, Ordering::Relaxed);
      println!("Attempting to read configuration...");
      std::fs::read_to_string("/nonexistent/app.conf")
   });

   // First access runs the delegate and fails
   match config.get() {
      Ok(_) => panic!("Should have failed"),
      Err(e) => println!("Caught error: {}", e),
   }
   assert!(config.is_initialized()); // A failure is a settled outcome

   // Later accesses replay the very same failure without retrying
   for _ in 0..3 {
      match config.get() {
         Ok(_) => panic!("Should have failed"),
         Err(e) => println!("Replayed error: {}", e),
      }
   }
   assert_eq!(ATTEMPTS.load(Ordering::Relaxed), 1);

   // A fresh provider is the only way to try again
   let retry = values::lazy_fallible(|| Ok::<_, std::io::Error>("defaults".to_string()));
   println!("Retry got: {}", retry.get().unwrap());
}
