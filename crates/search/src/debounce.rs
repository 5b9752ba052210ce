//! Last-query-wins debouncing with generation tokens.
//!
//! Every submitted query takes a [`Ticket`] carrying the next generation
//! number. A ticket is current only while no newer ticket has been issued.
//! Nothing is cancelled: superseded work simply notices it is stale and
//! drops its result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Proof of submission for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Issue a ticket, superseding every earlier one.
    pub fn issue(&self) -> Ticket {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket { generation }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.generation
    }

    /// Wait out the idle window; true if `ticket` is still the latest afterwards.
    pub async fn settle(&self, ticket: &Ticket) -> bool {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.is_current(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let debouncer = Debouncer::new(Duration::from_millis(150));
        let first = debouncer.issue();
        assert!(debouncer.is_current(&first));

        let second = debouncer.issue();
        assert!(!debouncer.is_current(&first));
        assert!(debouncer.is_current(&second));
        assert!(second.generation() > first.generation());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_full_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(150));
        let ticket = debouncer.issue();

        let start = tokio::time::Instant::now();
        assert!(debouncer.settle(&ticket).await);
        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_reports_superseded() {
        let debouncer = std::sync::Arc::new(Debouncer::new(Duration::from_millis(150)));
        let ticket = debouncer.issue();

        let waiter = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.settle(&ticket).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let newer = debouncer.issue();

        assert!(!waiter.await.unwrap());
        assert!(debouncer.is_current(&newer));
    }
}
