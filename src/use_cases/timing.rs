use std::future::Future;
use std::time::{Duration, Instant};

// Output of a timed async operation.
pub struct Timed<T> {
    pub result: T,
    pub duration: Duration,
}

/// Awaits `future` and reports how long it took on the wall clock.
pub async fn measure_async<F, T>(future: F) -> Timed<T>
where
    F: Future<Output = T>,
{
    let started = Instant::now();
    let result = future.await;
    Timed {
        result,
        duration: started.elapsed(),
    }
}
