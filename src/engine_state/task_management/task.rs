//! # Task System Core Traits
//!
//! A `Task` is a unit of deferred work that runs on the simulation timeline against a
//! mutable context (the voxel world for chunk generation). Tasks own everything they
//! need apart from the context, so they can sit in a queue across many frames.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()` with a deadline
//! 2. The scheduler tick pops it once idle time is available or the deadline has passed
//! 3. The task's `process()` consumes it and mutates the context

/// A unit of work that runs against a context of type `C`.
pub trait Task<C> {
    /// Performs the work, consuming the task.
    ///
    /// The context may have changed arbitrarily since the task was published, so the
    /// task must re-check that its work is still wanted.
    fn process(self: Box<Self>, context: &mut C);

    /// A short human-readable description used in log messages.
    fn describe(&self) -> String;
}
