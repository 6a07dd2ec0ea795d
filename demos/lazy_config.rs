use std::sync::atomic::{AtomicUsize, Ordering};

use once_values::LazyValue;

static COUNTER: AtomicUsize = AtomicUsize::new(0);
static CONFIG: LazyValue<Option<String>> = LazyValue::new(|| {
   // This closure runs only once
   COUNTER.fetch_add(1, Ordering::Relaxed);
   println!("Loading configuration...");
   // Simulate work
   std::thread::sleep(std::time::Duration::from_millis(50));
   std::env::var("APP_MODE").ok()
});

fn main() {
   let threads: Vec<_> = (0..5)
      .map(|_| {
         std::thread::spawn(|| {
            println!("Thread sees mode: {:?}", CONFIG.get());
         })
      })
      .collect();

   for t in threads {
      t.join().unwrap();
   }

   // A missing variable is cached as `None` like any other result
   assert!(CONFIG.is_initialized());
   assert_eq!(COUNTER.load(Ordering::Relaxed), 1); // Delegate ran only once
   println!("Final mode: {:?}", CONFIG.get());
}
