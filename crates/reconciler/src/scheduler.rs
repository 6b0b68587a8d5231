//! FIFO task queue serialising reconciliation operations.
//!
//! Operations submitted while another one is executing (for example from a
//! host mutation hook) are appended and run after it, in submission order.
//! The head task is popped only once it has completed; a failing task halts
//! the queue for good and stays at the head together with everything behind
//! it.

use crate::error::ReconcileError;
use crate::props::Props;
use crate::tag::Tag;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// One declared reconciliation operation.
#[derive(Clone, Debug)]
pub enum Operation {
    Open { tag: Tag, props: Props },
    Text(String),
    /// Close the open scope, optionally checking its tag.
    Close(Option<Tag>),
    Finish,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Open { .. } => "open",
            Operation::Text(_) => "text",
            Operation::Close(_) => "close",
            Operation::Finish => "finish",
        }
    }
}

/// Immutable queued operation; cloning shares the payload.
#[derive(Clone, Debug)]
pub struct Task(Rc<Operation>);

impl Task {
    pub fn new(op: Operation) -> Self {
        Task(Rc::new(op))
    }

    pub fn operation(&self) -> &Operation {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Draining,
    /// A task failed; nothing runs any more.
    Halted,
}

#[derive(Debug)]
pub struct TaskQueue {
    tasks: RefCell<VecDeque<Task>>,
    state: Cell<SchedulerState>,
    error: RefCell<Option<ReconcileError>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self {
            tasks: RefCell::new(VecDeque::new()),
            state: Cell::new(SchedulerState::Idle),
            error: RefCell::new(None),
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state.get()
    }

    /// Tasks not yet completed, the running one included.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    pub fn error(&self) -> Option<ReconcileError> {
        self.error.borrow().clone()
    }

    /// Append `task`. Returns `true` when the caller became the drainer
    /// (Idle → Draining) and must call [`TaskQueue::drain`].
    pub fn enqueue(&self, task: Task) -> bool {
        log::trace!(target: "reconciler.queue", "enqueue {} ({:?})", task.operation().name(), self.state());
        self.tasks.borrow_mut().push_back(task);
        match self.state() {
            SchedulerState::Idle => {
                self.state.set(SchedulerState::Draining);
                true
            }
            SchedulerState::Draining => false,
            SchedulerState::Halted => {
                log::warn!(target: "reconciler.queue", "queue halted; task will never run");
                false
            }
        }
    }

    /// Run queued tasks in order until the queue is empty or a task fails.
    ///
    /// `run` may re-enter [`TaskQueue::enqueue`]; no queue borrow is held
    /// while it executes.
    pub fn drain<F>(&self, mut run: F) -> Result<(), ReconcileError>
    where
        F: FnMut(&Operation) -> Result<(), ReconcileError>,
    {
        debug_assert_eq!(self.state(), SchedulerState::Draining);
        loop {
            let head = self.tasks.borrow().front().cloned();
            let Some(task) = head else {
                break;
            };
            log::trace!(target: "reconciler.queue", "run {}", task.operation().name());
            if let Err(err) = run(task.operation()) {
                log::debug!(
                    target: "reconciler.queue",
                    "halted on {}: {err}; {} task(s) abandoned",
                    task.operation().name(),
                    self.len()
                );
                self.state.set(SchedulerState::Halted);
                *self.error.borrow_mut() = Some(err.clone());
                return Err(err);
            }
            self.tasks.borrow_mut().pop_front();
        }
        self.state.set(SchedulerState::Idle);
        Ok(())
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Operation, SchedulerState, Task, TaskQueue};
    use crate::error::ReconcileError;
    use std::cell::RefCell;

    fn text(value: &str) -> Task {
        Task::new(Operation::Text(value.to_string()))
    }

    fn label(op: &Operation) -> String {
        match op {
            Operation::Text(value) => value.clone(),
            other => other.name().to_string(),
        }
    }

    #[test]
    fn tasks_run_in_submission_order() {
        let queue = TaskQueue::new();
        let seen = RefCell::new(Vec::new());
        assert!(queue.enqueue(text("a")));
        assert!(!queue.enqueue(text("b")));
        queue
            .drain(|op| {
                seen.borrow_mut().push(label(op));
                Ok(())
            })
            .unwrap();
        assert_eq!(*seen.borrow(), ["a", "b"]);
        assert_eq!(queue.state(), SchedulerState::Idle);
        assert!(queue.is_empty());
    }

    #[test]
    fn reentrant_enqueue_runs_after_current_task() {
        let queue = TaskQueue::new();
        let seen = RefCell::new(Vec::new());
        assert!(queue.enqueue(text("first")));
        assert!(!queue.enqueue(text("second")));
        queue
            .drain(|op| {
                let name = label(op);
                if name == "first" {
                    assert!(!queue.enqueue(text("nested")));
                    assert_eq!(queue.len(), 3);
                }
                seen.borrow_mut().push(name);
                Ok(())
            })
            .unwrap();
        assert_eq!(*seen.borrow(), ["first", "second", "nested"]);
    }

    #[test]
    fn failure_halts_and_keeps_remaining_tasks() {
        let queue = TaskQueue::new();
        let err = ReconcileError::UnbalancedClose {
            root: "#document-fragment".to_string(),
        };
        queue.enqueue(text("ok"));
        queue.enqueue(Task::new(Operation::Close(None)));
        queue.enqueue(text("never"));

        let mut ran = Vec::new();
        let result = queue.drain(|op| {
            ran.push(label(op));
            match op {
                Operation::Close(_) => Err(err.clone()),
                _ => Ok(()),
            }
        });

        assert_eq!(result, Err(err.clone()));
        assert_eq!(ran, ["ok", "close"]);
        assert_eq!(queue.state(), SchedulerState::Halted);
        assert_eq!(queue.error(), Some(err));
        assert_eq!(queue.len(), 2);

        assert!(!queue.enqueue(text("late")));
        assert_eq!(queue.len(), 3);
    }
}
