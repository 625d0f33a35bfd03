use std::time::Duration;

use tokio::time::Instant;

/// Holds back a rapidly changing value until it has stopped changing for a
/// fixed delay.
///
/// The debouncer owns no task: the timer only exists while a caller awaits
/// [`Debouncer::settled`], so dropping the debouncer (or the future) tears it
/// down with no dangling emission.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new value and restart the wait. Any value pushed earlier and
    /// not yet emitted is superseded and will never be emitted.
    pub fn push(&mut self, value: T) {
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + self.delay,
        });
    }

    /// Drop the scheduled emission, returning the value it would have carried.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Wait until the latest pushed value has been stable for the full delay
    /// and return it. Never resolves while nothing is pending.
    ///
    /// Cancel-safe: the pending value is only taken once the deadline has
    /// passed, so this can be used as a `tokio::select!` branch.
    pub async fn settled(&mut self) -> T {
        loop {
            let Some(deadline) = self.deadline() else {
                std::future::pending::<()>().await;
                continue;
            };
            tokio::time::sleep_until(deadline).await;
            if let Some(p) = self.pending.take() {
                return p.value;
            }
        }
    }
}
