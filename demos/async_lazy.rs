use std::sync::atomic::{AtomicUsize, Ordering};

use once_values::LazyValue;

static COUNTER: AtomicUsize = AtomicUsize::new(0);
static DATA: LazyValue<String> = LazyValue::new(|| {
   // This closure runs only once
   COUNTER.fetch_add(1, Ordering::Relaxed);
   println!("Initializing data...");
   std::thread::sleep(std::time::Duration::from_millis(50));
   "Expensive data".to_string()
});

#[tokio::main]
async fn main() {
   let tasks: Vec<_> = (0..5)
      .map(|_| {
         tokio::spawn(async {
            println!("Task access: {}", DATA.get_async().await);
         })
      })
      .collect();

   for t in tasks {
      t.await.unwrap();
   }

   assert_eq!(DATA.peek(), Some(&"Expensive data".to_string()));
   assert_eq!(COUNTER.load(Ordering::Relaxed), 1); // Delegate ran only once
   println!("Final data: {}", DATA.get());
}
