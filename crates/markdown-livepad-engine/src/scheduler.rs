//! Debounced render scheduling.
//!
//! The scheduler holds at most one pending render. Every change replaces it
//! and pushes the deadline back by the quiet period, so a burst of edits
//! collapses into one render of the latest text. Time is passed in by the
//! caller, which keeps the scheduler deterministic and lets the host event
//! loop decide how it waits.

use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending {
    text: Arc<str>,
    deadline: Instant,
    coalesced: usize,
}

#[derive(Debug)]
pub struct RenderScheduler {
    quiet: Duration,
    pending: Option<Pending>,
}

impl RenderScheduler {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Records a change at `now`, replacing any render still waiting.
    /// Returns the new deadline.
    pub fn on_content_change(&mut self, text: Arc<str>, now: Instant) -> Instant {
        let deadline = now + self.quiet;
        let coalesced = match self.pending.take() {
            Some(previous) => {
                log::debug!("replacing pending render ({} changes so far)", previous.coalesced + 1);
                previous.coalesced + 1
            }
            None => 0,
        };
        self.pending = Some(Pending {
            text,
            deadline,
            coalesced,
        });
        deadline
    }

    /// When the pending render is due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending text once its quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Arc<str>> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due { self.flush() } else { None }
    }

    /// Runs `render` with the pending text if it is due. Returns whether it ran.
    pub fn run_due(&mut self, now: Instant, render: impl FnOnce(&str)) -> bool {
        match self.poll(now) {
            Some(text) => {
                render(&text);
                true
            }
            None => false,
        }
    }

    /// Takes the pending text immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<Arc<str>> {
        self.pending.take().map(|p| p.text)
    }

    /// Drops the pending render without running it.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const QUIET: Duration = Duration::from_millis(300);

    fn text(s: &str) -> Arc<str> {
        Arc::from(s)
    }

    #[test]
    fn burst_collapses_into_one_render_of_latest_text() {
        let start = Instant::now();
        let mut scheduler = RenderScheduler::new(QUIET);
        scheduler.on_content_change(text("a"), start);
        scheduler.on_content_change(text("ab"), start + Duration::from_millis(100));
        scheduler.on_content_change(text("abc"), start + Duration::from_millis(200));

        let mut renders = vec![];
        let mut now = start;
        while now <= start + Duration::from_secs(2) {
            scheduler.run_due(now, |t| renders.push(t.to_string()));
            now += Duration::from_millis(50);
        }

        assert_eq!(renders, vec!["abc"]);
    }

    #[test]
    fn not_due_before_quiet_period() {
        let start = Instant::now();
        let mut scheduler = RenderScheduler::new(QUIET);
        let deadline = scheduler.on_content_change(text("x"), start);

        assert_eq!(deadline, start + QUIET);
        assert_eq!(scheduler.poll(start + Duration::from_millis(299)), None);
        assert_eq!(scheduler.poll(deadline).as_deref(), Some("x"));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn new_change_pushes_deadline_back() {
        let start = Instant::now();
        let mut scheduler = RenderScheduler::new(QUIET);
        scheduler.on_content_change(text("a"), start);
        let later = start + Duration::from_millis(250);
        scheduler.on_content_change(text("b"), later);

        assert_eq!(scheduler.poll(start + QUIET), None);
        assert_eq!(scheduler.deadline(), Some(later + QUIET));
    }

    #[test]
    fn flush_ignores_deadline_and_cancel_drops() {
        let now = Instant::now();
        let mut scheduler = RenderScheduler::new(QUIET);
        scheduler.on_content_change(text("soon"), now);
        assert_eq!(scheduler.flush().as_deref(), Some("soon"));
        assert_eq!(scheduler.flush(), None);

        scheduler.on_content_change(text("never"), now);
        assert!(scheduler.cancel());
        assert!(!scheduler.run_due(now + QUIET, |_| panic!("cancelled render ran")));
    }

    #[test]
    fn idle_scheduler_has_no_deadline() {
        let scheduler = RenderScheduler::new(QUIET);
        assert_eq!(scheduler.deadline(), None);
    }
}
