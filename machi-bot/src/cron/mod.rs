//! Cron job scheduling module for periodic tasks.
//!
//! This module provides a simple cron-like scheduler for running periodic tasks
//! such as reminders, status checks, or scheduled messages.

mod job;
mod scheduler;
mod storage;

pub use job::{CronJob, CronJobBuilder, CronJobId, CronSchedule, JobStatus};
pub use scheduler::{CronScheduler, SchedulerHandle};
pub use storage::{CronStorage, FileCronStorage, MemoryCronStorage};
