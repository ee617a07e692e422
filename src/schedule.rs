//! Deferred fire-once tasks with cancel-on-drop handles.
//!
//! The controller keeps at most one handle for the pending transition-marker
//! removal. Replacing that handle drops the old one, which cancels it, so
//! repeated theme changes never stack timers.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub type Task = Box<dyn FnOnce()>;

/// Runs a task once after a delay. Dropping the returned handle before the
/// delay elapses cancels the task.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Task) -> Self::Handle;
}

// =============================================================================
// MANUAL SCHEDULER
// =============================================================================

struct Pending {
    id: u64,
    due_ms: u64,
    task: Task,
}

#[derive(Default)]
struct Queue {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending>,
}

/// Virtual clock scheduler. Time only moves through [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Queue>>,
}

/// Handle for a task queued on a [`ManualScheduler`].
pub struct ManualHandle {
    id: u64,
    queue: Weak<RefCell<Queue>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        if let Some(queue) = self.queue.upgrade() {
            if let Ok(mut queue) = queue.try_borrow_mut() {
                queue.pending.retain(|p| p.id != self.id);
            }
        }
    }
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks still waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.queue.borrow().now_ms
    }

    /// Move the clock forward, running due tasks in deadline order.
    pub fn advance(&self, ms: u64) {
        let target = self.queue.borrow().now_ms + ms;
        while let Some(task) = self.pop_due(target) {
            task();
        }
        self.queue.borrow_mut().now_ms = target;
    }

    fn pop_due(&self, target: u64) -> Option<Task> {
        let mut queue = self.queue.borrow_mut();
        let idx = queue
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= target)
            .min_by_key(|(_, p)| (p.due_ms, p.id))
            .map(|(idx, _)| idx)?;
        let next = queue.pending.remove(idx);
        queue.now_ms = next.due_ms;
        Some(next.task)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay_ms: u32, task: Task) -> ManualHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let due_ms = queue.now_ms + u64::from(delay_ms);
        queue.pending.push(Pending { id, due_ms, task });
        ManualHandle { id, queue: Rc::downgrade(&self.queue) }
    }
}
