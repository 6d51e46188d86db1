extern crate chrono;
extern crate std;

/// Injectable time source. The polling loops, the backoff fetcher, and the
/// render loop only see time through this trait, so tests can fast-forward
/// instead of sleeping wall-clock time.
pub trait Clock: Sync {
    fn now_ts(&self) -> i64;
    fn sleep(&self, duration: std::time::Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ts(&self) -> i64 {
        return chrono::Utc::now().timestamp();
    }

    fn sleep(&self, duration: std::time::Duration) {
        std::thread::sleep(duration);
    }
}
