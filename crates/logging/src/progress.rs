//! crates/logging/src/progress.rs
//! Counting progress indicator that reports through a logger.

use std::fmt;
use std::time::{Duration, Instant};

use logging_sink::formatted_duration;

use crate::levels::{INFO, Level};
use crate::logger::{Logger, render};

/// Tracks `current` out of `total` units of work and logs each advance.
///
/// Reports are written at `info` unless [`severity`](Self::severity) picks
/// another level, and carry the subject given at creation. A minimum interval
/// can be set to thin out reports; reaching the total always reports.
///
/// # Examples
///
/// ```
/// use logging::Logger;
/// use logging_sink::{OutputChain, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::new(OutputChain::builder(buffer.clone()).build());
///
/// let mut progress = logger.progress("import", 4);
/// progress.increment();
/// progress.increment_by(3);
///
/// assert!(progress.is_complete());
/// let output = buffer.contents_lossy();
/// assert!(output.contains("1/4 (25.00%) completed"));
/// assert!(output.contains("4/4 (100.00%) completed"));
/// ```
pub struct Progress {
    logger: Logger,
    subject: String,
    severity: Level,
    total: u64,
    current: u64,
    start: Instant,
    minimum_interval: Duration,
    last_report: Option<Instant>,
}

impl Progress {
    pub(crate) fn new(logger: Logger, subject: &str, total: u64) -> Self {
        Self {
            logger,
            subject: subject.to_owned(),
            severity: INFO,
            total,
            current: 0,
            start: Instant::now(),
            minimum_interval: Duration::ZERO,
            last_report: None,
        }
    }

    /// Reports at `level` instead of `info`.
    pub fn severity(mut self, level: Level) -> Self {
        self.severity = level;
        self
    }

    /// Skips reports closer together than `interval`, except the final one.
    pub fn minimum_interval(mut self, interval: Duration) -> Self {
        self.minimum_interval = interval;
        self
    }

    /// Advances by one unit.
    pub fn increment(&mut self) -> &mut Self {
        self.increment_by(1)
    }

    /// Advances by `amount` units and reports.
    pub fn increment_by(&mut self, amount: u64) -> &mut Self {
        self.current = self.current.saturating_add(amount);
        if self.should_report() {
            self.report();
        }
        self
    }

    /// Changes the total, for work whose size is discovered while running.
    pub fn resize(&mut self, total: u64) -> &mut Self {
        self.total = total;
        self
    }

    /// Logs `message` under the progress subject without advancing.
    pub fn mark(&self, message: impl fmt::Display) {
        if self.logger.accepts(self.severity) {
            let text = render(&message);
            self.logger.log(self.severity, Some(&self.subject), &text, &[]);
        }
    }

    /// Units completed so far.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.current
    }

    /// Units expected in total.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Units left, never negative.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.total.saturating_sub(self.current)
    }

    /// Completed fraction in `0.0..=1.0`; an empty total counts as done.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        }
    }

    /// Reports whether every unit is done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.total
    }

    /// Time since the indicator was created.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.start.elapsed()
    }

    /// Projected time to completion from the average time per unit.
    ///
    /// `None` until at least one unit is done.
    #[must_use]
    pub fn estimated_remaining(&self) -> Option<Duration> {
        if self.current == 0 {
            return None;
        }
        let per_unit = self.duration().as_secs_f64() / self.current as f64;
        Duration::try_from_secs_f64(per_unit * self.remaining() as f64).ok()
    }

    fn should_report(&mut self) -> bool {
        let now = Instant::now();
        let due = self.is_complete()
            || self
                .last_report
                .is_none_or(|last| now.duration_since(last) >= self.minimum_interval);
        if due {
            self.last_report = Some(now);
        }
        due
    }

    fn report(&self) {
        if !self.logger.accepts(self.severity) {
            return;
        }
        let text = self.to_string();
        let current = self.current;
        let total = self.total;
        self.logger.log(
            self.severity,
            Some(&self.subject),
            &text,
            &[("current", &current), ("total", &total)],
        );
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.2}%) completed",
            self.current,
            self.total,
            self.ratio() * 100.0
        )?;
        match self.estimated_remaining() {
            Some(remaining) => write!(
                f,
                " in {}, {} remaining.",
                formatted_duration(self.duration()),
                formatted_duration(remaining)
            ),
            None => f.write_str(", waiting for estimate..."),
        }
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("subject", &self.subject)
            .field("current", &self.current)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::{DEBUG, WARN};
    use logging_sink::{OutputChain, SharedBuffer};

    fn capture() -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        (
            Logger::new(OutputChain::builder(buffer.clone()).build()),
            buffer,
        )
    }

    #[test]
    fn every_increment_reports_by_default() {
        let (logger, buffer) = capture();
        let mut progress = logger.progress("copy", 3);
        progress.increment().increment().increment();
        let output = buffer.contents_lossy();
        assert_eq!(output.matches("completed").count(), 3);
        assert!(output.contains("info: copy"));
        assert!(output.contains("current=3"));
        assert!(output.contains("total=3"));
    }

    #[test]
    fn bookkeeping() {
        let (logger, _) = capture();
        let mut progress = logger.progress("work", 8);
        assert!(progress.ratio().abs() < f64::EPSILON);
        assert!(progress.estimated_remaining().is_none());
        progress.increment_by(2);
        assert_eq!(progress.current(), 2);
        assert_eq!(progress.remaining(), 6);
        assert!((progress.ratio() - 0.25).abs() < f64::EPSILON);
        assert!(progress.estimated_remaining().is_some());
        progress.increment_by(100);
        assert_eq!(progress.remaining(), 0);
        assert!((progress.ratio() - 1.0).abs() < f64::EPSILON);
        assert!(progress.is_complete());
    }

    #[test]
    fn empty_total_is_complete() {
        let (logger, _) = capture();
        let progress = logger.progress("nothing", 0);
        assert!(progress.is_complete());
        assert!((progress.ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn waiting_message_before_first_unit() {
        let (logger, _) = capture();
        let progress = logger.progress("scan", 5);
        assert_eq!(progress.to_string(), "0/5 (0.00%) completed, waiting for estimate...");
    }

    #[test]
    fn severity_is_respected_by_filter() {
        let (logger, buffer) = capture();
        let mut progress = logger.progress("scan", 2).severity(DEBUG);
        progress.increment();
        assert!(buffer.is_empty());

        let mut loud = logger.progress("scan", 2).severity(WARN);
        loud.increment();
        assert!(buffer.contents_lossy().contains("warn: scan"));
    }

    #[test]
    fn interval_thins_reports_but_final_one_is_kept() {
        let (logger, buffer) = capture();
        let mut progress = logger
            .progress("sync", 10)
            .minimum_interval(Duration::from_secs(3_600));
        for _ in 0..10 {
            progress.increment();
        }
        let output = buffer.contents_lossy();
        assert_eq!(output.matches("completed").count(), 2);
        assert!(output.contains("10/10"));
    }

    #[test]
    fn mark_logs_under_subject() {
        let (logger, buffer) = capture();
        let mut progress = logger.progress("index", 10);
        progress.resize(20);
        progress.mark("switching phase");
        assert_eq!(progress.total(), 20);
        let output = buffer.contents_lossy();
        assert!(output.contains("info: index"));
        assert!(output.contains("| switching phase"));
    }
}
