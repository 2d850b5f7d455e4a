//! Periodic job scheduler
//!
//! Runs named jobs on the calling thread. A job that returns an error or
//! panics is reported through a push sink and keeps its schedule.

use crate::alerts::{Priority, PushMessage, PushSink};
use crate::error::AppError;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

type Task = Box<dyn FnMut() -> Result<(), AppError>>;

struct Job {
    name: String,
    interval: Duration,
    priority: Priority,
    task: Task,
    next_run: Option<Instant>,
}

/// Outcome of a single job run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Failed(String),
    Panicked(String),
}

/// Single-threaded interval scheduler
pub struct Scheduler {
    jobs: Vec<Job>,
    reporter: Option<Box<dyn PushSink>>,
}

impl Scheduler {
    /// Create an empty scheduler without a failure reporter
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            reporter: None,
        }
    }

    /// Builder: report job failures through `reporter`
    pub fn with_reporter(mut self, reporter: Box<dyn PushSink>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Register a job that runs immediately and then every `interval`
    pub fn add_job<F>(
        &mut self,
        name: impl Into<String>,
        interval: Duration,
        priority: Priority,
        task: F,
    ) where
        F: FnMut() -> Result<(), AppError> + 'static,
    {
        let name = name.into();
        log::debug!("Scheduled job '{}' every {:?}", name, interval);
        self.jobs.push(Job {
            name,
            interval,
            priority,
            task: Box::new(task),
            next_run: None,
        });
    }

    /// Number of registered jobs
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Earliest instant any job is due, `None` when a job has never run
    pub fn next_due(&self) -> Option<Instant> {
        let mut due = None;
        for job in &self.jobs {
            let next = job.next_run?;
            due = Some(due.map_or(next, |d: Instant| d.min(next)));
        }
        due
    }

    /// Run every job due at `now` and return their outcomes
    pub fn run_pending(&mut self, now: Instant) -> Vec<(String, JobOutcome)> {
        let mut outcomes = Vec::new();
        for job in &mut self.jobs {
            if job.next_run.is_some_and(|next| next > now) {
                continue;
            }
            job.next_run = Some(now + job.interval);
            let outcome = execute(job);
            report(self.reporter.as_deref(), job, &outcome);
            outcomes.push((job.name.clone(), outcome));
        }
        outcomes
    }

    /// Run every job once regardless of schedule
    pub fn run_once(&mut self) -> Vec<(String, JobOutcome)> {
        let mut outcomes = Vec::new();
        for job in &mut self.jobs {
            let outcome = execute(job);
            report(self.reporter.as_deref(), job, &outcome);
            outcomes.push((job.name.clone(), outcome));
        }
        outcomes
    }

    /// Run jobs forever, sleeping until the next one is due
    pub fn run(&mut self) {
        if self.jobs.is_empty() {
            log::warn!("No jobs scheduled");
            return;
        }

        loop {
            self.run_pending(Instant::now());

            if let Some(due) = self.next_due() {
                let wait = due.saturating_duration_since(Instant::now());
                if !wait.is_zero() {
                    thread::sleep(wait);
                }
            }
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn execute(job: &mut Job) -> JobOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| (job.task)())) {
        Ok(Ok(())) => JobOutcome::Completed,
        Ok(Err(e)) => JobOutcome::Failed(e.to_string()),
        Err(payload) => JobOutcome::Panicked(panic_message(payload.as_ref())),
    }
}

fn report(reporter: Option<&dyn PushSink>, job: &Job, outcome: &JobOutcome) {
    let message = match outcome {
        JobOutcome::Completed => return,
        JobOutcome::Failed(message) | JobOutcome::Panicked(message) => message,
    };

    log::error!("Job '{}' failed: {}", job.name, message);

    if let Some(reporter) = reporter {
        reporter.push(
            PushMessage::new(message.clone())
                .with_title(format!("🐞 Exception in job {}", job.name))
                .with_priority(job.priority),
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "job panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingNotifier;
    use std::cell::Cell;
    use std::rc::Rc;

    const MINUTE: Duration = Duration::from_secs(60);

    fn counter_job(scheduler: &mut Scheduler, name: &str, interval: Duration) -> Rc<Cell<u32>> {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        scheduler.add_job(name, interval, Priority::Normal, move || {
            counter.set(counter.get() + 1);
            Ok(())
        });
        runs
    }

    #[test]
    fn test_jobs_run_immediately_then_on_interval() {
        let mut scheduler = Scheduler::new();
        let runs = counter_job(&mut scheduler, "poll", MINUTE);
        let start = Instant::now();

        assert!(scheduler.next_due().is_none());
        scheduler.run_pending(start);
        assert_eq!(runs.get(), 1);
        assert_eq!(scheduler.next_due(), Some(start + MINUTE));

        scheduler.run_pending(start + Duration::from_secs(30));
        assert_eq!(runs.get(), 1);

        scheduler.run_pending(start + MINUTE);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_next_due_is_earliest_job() {
        let mut scheduler = Scheduler::new();
        counter_job(&mut scheduler, "slow", MINUTE * 10);
        counter_job(&mut scheduler, "fast", MINUTE);
        let start = Instant::now();

        scheduler.run_pending(start);
        assert_eq!(scheduler.next_due(), Some(start + MINUTE));
        assert_eq!(scheduler.job_count(), 2);
    }

    #[test]
    fn test_failed_job_is_reported() {
        let recorder = RecordingNotifier::new();
        let mut scheduler = Scheduler::new().with_reporter(Box::new(recorder.clone()));
        scheduler.add_job("poll", MINUTE, Priority::High, || {
            Err(AppError::Job {
                name: "poll".to_string(),
                message: "boom".to_string(),
            })
        });

        let outcomes = scheduler.run_once();
        assert!(matches!(outcomes[0].1, JobOutcome::Failed(_)));

        let pushes = recorder.pushes();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].title.as_deref(), Some("🐞 Exception in job poll"));
        assert_eq!(pushes[0].message, "Job 'poll' failed: boom");
        assert_eq!(pushes[0].priority, Priority::High);
    }

    #[test]
    fn test_panicking_job_is_caught_and_rescheduled() {
        let recorder = RecordingNotifier::new();
        let mut scheduler = Scheduler::new().with_reporter(Box::new(recorder.clone()));
        scheduler.add_job("flaky", MINUTE, Priority::Normal, || panic!("sensor vanished"));
        let runs = counter_job(&mut scheduler, "steady", MINUTE);
        let start = Instant::now();

        let outcomes = scheduler.run_pending(start);
        assert_eq!(
            outcomes[0].1,
            JobOutcome::Panicked("sensor vanished".to_string())
        );
        assert_eq!(outcomes[1].1, JobOutcome::Completed);
        assert_eq!(runs.get(), 1);

        scheduler.run_pending(start + MINUTE);
        assert_eq!(recorder.pushes().len(), 2);
        assert_eq!(recorder.pushes()[0].message, "sensor vanished");
    }

    #[test]
    fn test_successful_jobs_push_nothing() {
        let recorder = RecordingNotifier::new();
        let mut scheduler = Scheduler::new().with_reporter(Box::new(recorder.clone()));
        counter_job(&mut scheduler, "poll", MINUTE);

        scheduler.run_once();
        assert!(recorder.pushes().is_empty());
    }

    #[test]
    fn test_failure_without_reporter_is_logged_only() {
        let mut scheduler = Scheduler::new();
        scheduler.add_job("poll", MINUTE, Priority::Normal, || {
            Err(AppError::Job {
                name: "poll".to_string(),
                message: "boom".to_string(),
            })
        });
        let outcomes = scheduler.run_once();
        assert_eq!(outcomes.len(), 1);
    }
}
