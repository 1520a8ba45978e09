use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Handle to an interval registered with the [`Scheduler`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntervalId(u64);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// A registered interval came due
    Interval(IntervalId),
    /// The event source is gone
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!("terminal input reader stopped: {e}");
                    break;
                }
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    id: IntervalId,
    period: Duration,
    next_due: Instant,
}

/// Fixed-period timers, fired one at a time by the [`Runner`]
#[derive(Debug, Default)]
pub struct Scheduler {
    intervals: Vec<Interval>,
    next_id: u64,
}

impl Scheduler {
    pub fn register(&mut self, period: Duration, now: Instant) -> IntervalId {
        let id = IntervalId(self.next_id);
        self.next_id += 1;
        self.intervals.push(Interval {
            id,
            period,
            next_due: now + period,
        });
        tracing::debug!(?id, ?period, "interval registered");
        id
    }

    /// Returns false if `id` was not scheduled
    pub fn cancel(&mut self, id: IntervalId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|i| i.id != id);
        let removed = self.intervals.len() != before;
        if removed {
            tracing::debug!(?id, "interval cancelled");
        }
        removed
    }

    pub fn is_scheduled(&self, id: IntervalId) -> bool {
        self.intervals.iter().any(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.intervals.iter().map(|i| i.next_due).min()
    }

    /// Fire the earliest interval due at `now` and schedule its next run.
    /// An interval that fell behind resumes one period from `now` instead of bursting.
    pub fn take_due(&mut self, now: Instant) -> Option<IntervalId> {
        let interval = self
            .intervals
            .iter_mut()
            .filter(|i| i.next_due <= now)
            .min_by_key(|i| i.next_due)?;
        interval.next_due += interval.period;
        if interval.next_due <= now {
            interval.next_due = now + interval.period;
        }
        Some(interval.id)
    }
}

/// Runner that advances the application one event/interval at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    scheduler: Scheduler,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self {
            event_source,
            scheduler: Scheduler::default(),
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Blocks until the next event or until an interval comes due.
    ///
    /// Due intervals are checked before the event queue so a steady stream
    /// of input can't delay them past their period.
    pub fn step(&mut self) -> AppEvent {
        loop {
            let now = Instant::now();
            if let Some(id) = self.scheduler.take_due(now) {
                return AppEvent::Interval(id);
            }

            let timeout = match self.scheduler.next_deadline() {
                Some(deadline) => deadline.saturating_duration_since(now),
                None => Duration::MAX,
            };

            match self.event_source.recv_timeout(timeout) {
                Ok(ev) => return ev,
                Err(RecvTimeoutError::Timeout) => {}
                // no more input can arrive, so nothing could ever quit the loop
                Err(RecvTimeoutError::Disconnected) => return AppEvent::Closed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    fn key(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_step_fires_interval_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(TestEventSource::new(rx));
        let id = runner
            .scheduler_mut()
            .register(Duration::from_millis(1), Instant::now());

        assert_matches!(runner.step(), AppEvent::Interval(got) if got == id);
    }

    #[test]
    fn test_step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        let mut runner = Runner::new(TestEventSource::new(rx));
        runner
            .scheduler_mut()
            .register(Duration::from_secs(60), Instant::now());

        assert_matches!(runner.step(), AppEvent::Resize);
    }

    #[test]
    fn test_step_reports_closed_when_idle_and_disconnected() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let mut runner = Runner::new(TestEventSource::new(rx));
        assert_matches!(runner.step(), AppEvent::Closed);
    }

    #[test]
    fn test_step_reports_closed_while_interval_scheduled() {
        let (tx, rx) = mpsc::channel::<AppEvent>();
        drop(tx);
        let mut runner = Runner::new(TestEventSource::new(rx));
        runner
            .scheduler_mut()
            .register(Duration::from_millis(5), Instant::now());

        let started = Instant::now();
        let mut closed = false;
        while started.elapsed() < Duration::from_millis(300) {
            if matches!(runner.step(), AppEvent::Closed) {
                closed = true;
                break;
            }
        }
        assert!(closed, "runner should report Closed once input is gone");
        assert_eq!(runner.scheduler().len(), 1);
    }

    #[test]
    fn test_queued_events_drain_before_closed() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        drop(tx);
        let mut runner = Runner::new(TestEventSource::new(rx));
        runner
            .scheduler_mut()
            .register(Duration::from_secs(60), Instant::now());

        assert_matches!(runner.step(), AppEvent::Resize);
        assert_matches!(runner.step(), AppEvent::Closed);
    }

    #[test]
    fn test_key_storm_does_not_starve_interval() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..10_000 {
            tx.send(key('a')).unwrap();
        }
        let mut runner = Runner::new(TestEventSource::new(rx));
        let id = runner
            .scheduler_mut()
            .register(Duration::from_millis(5), Instant::now());

        let started = Instant::now();
        let mut fired = false;
        while started.elapsed() < Duration::from_secs(2) {
            if let AppEvent::Interval(got) = runner.step() {
                assert_eq!(got, id);
                fired = true;
                break;
            }
            std::thread::sleep(Duration::from_micros(50));
        }
        assert!(fired, "interval should fire while keys are queued");
    }

    #[test]
    fn test_scheduler_cancel_removes_interval() {
        let now = Instant::now();
        let mut scheduler = Scheduler::default();
        let a = scheduler.register(Duration::from_millis(500), now);
        let b = scheduler.register(Duration::from_millis(100), now);
        assert_eq!(scheduler.len(), 2);
        assert_eq!(scheduler.next_deadline(), Some(now + Duration::from_millis(100)));

        assert!(scheduler.cancel(b));
        assert!(!scheduler.cancel(b));
        assert!(scheduler.is_scheduled(a));
        assert!(!scheduler.is_scheduled(b));
        assert_eq!(scheduler.next_deadline(), Some(now + Duration::from_millis(500)));
    }

    #[test]
    fn test_scheduler_take_due_reschedules() {
        let now = Instant::now();
        let period = Duration::from_millis(500);
        let mut scheduler = Scheduler::default();
        let id = scheduler.register(period, now);

        assert_eq!(scheduler.take_due(now), None);
        assert_eq!(scheduler.take_due(now + period), Some(id));
        assert_eq!(scheduler.take_due(now + period), None);
        assert_eq!(scheduler.next_deadline(), Some(now + period * 2));
    }

    #[test]
    fn test_scheduler_does_not_burst_after_stall() {
        let now = Instant::now();
        let period = Duration::from_millis(500);
        let mut scheduler = Scheduler::default();
        let id = scheduler.register(period, now);

        let late = now + Duration::from_secs(10);
        assert_eq!(scheduler.take_due(late), Some(id));
        assert_eq!(scheduler.take_due(late), None);
        assert_eq!(scheduler.next_deadline(), Some(late + period));
    }
}
