//! # Task Management System
//!
//! A cooperative, single-threaded scheduler for deferred work.
//!
//! ## Scheduling Rules
//! - Tasks run strictly in FIFO order, one at a time, never preempted.
//! - A scheduler tick pops the front task while idle time remains in the tick.
//! - A task whose deadline has passed is popped even without idle time, so every
//!   published task is guaranteed to run shortly after its deadline.
//!
//! ## Example Usage
//! ```ignore
//! let mut task_manager = TaskManager::new();
//! task_manager.publish_task(Box::new(MyTask::new(...)), now + timeout);
//!
//! // In the main loop:
//! while let Some(task) = task_manager.next_task(Instant::now(), idle_until) {
//!     task.process(&mut context);
//! }
//! ```

pub mod task;

use std::collections::VecDeque;

use log::warn;
use task::Task;
use web_time::Instant;

/// A task waiting in the queue together with the time it must run by.
struct QueuedTask<C> {
    task: Box<dyn Task<C>>,
    deadline: Instant,
}

/// FIFO queue of deferred tasks with per-task deadlines.
pub struct TaskManager<C> {
    queued_tasks: VecDeque<QueuedTask<C>>,
}

impl<C> TaskManager<C> {
    /// Creates an empty task manager.
    pub fn new() -> Self {
        TaskManager {
            queued_tasks: VecDeque::new(),
        }
    }

    /// Appends a task to the back of the queue.
    ///
    /// # Arguments
    /// * `task` - The task to run
    /// * `deadline` - The instant after which the task runs even without idle time
    pub fn publish_task(&mut self, task: Box<dyn Task<C>>, deadline: Instant) {
        self.queued_tasks.push_back(QueuedTask { task, deadline });
    }

    /// Pops the next task that is allowed to run at `now`.
    ///
    /// # Arguments
    /// * `now` - The current time
    /// * `idle_until` - End of the idle window of this tick
    ///
    /// # Returns
    /// The front task if `now` is still inside the idle window or the front task's
    /// deadline has passed, otherwise `None`.
    pub fn next_task(&mut self, now: Instant, idle_until: Instant) -> Option<Box<dyn Task<C>>> {
        let front = self.queued_tasks.front()?;

        if now < idle_until {
            return self.queued_tasks.pop_front().map(|queued| queued.task);
        }

        if front.deadline <= now {
            warn!(
                "Deferred task '{}' exceeded its deadline and runs without idle time",
                front.task.describe()
            );
            return self.queued_tasks.pop_front().map(|queued| queued.task);
        }

        None
    }

    /// Removes every queued task and returns them in FIFO order.
    pub fn drain(&mut self) -> Vec<Box<dyn Task<C>>> {
        self.queued_tasks.drain(..).map(|queued| queued.task).collect()
    }

    /// Drops every queued task without running it.
    pub fn clear(&mut self) {
        self.queued_tasks.clear();
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.queued_tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued_tasks.is_empty()
    }
}

impl<C> Default for TaskManager<C> {
    fn default() -> Self {
        Self::new()
    }
}
