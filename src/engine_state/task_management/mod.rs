//! # Task Management System
//!
//! A worker pool for CPU-bound work such as terrain generation.
//!
//! ## Architecture Overview
//! - `TaskManager`: owns the workers, the queues and the task id counter
//! - `Task`: a unit of work that runs on a worker
//! - `TaskResult`: the result of a completed task, applied on the coordinating thread
//! - `TaskChannel`: the channel pair connecting the manager to one worker
//!
//! ## Queues
//! Published tasks wait in one of two FIFO queues. The priority queue is always
//! drained before the normal queue, so a priority task never waits behind
//! normal work that was published earlier but not yet dispatched.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. `process_queued_tasks()` hands queued tasks to idle workers, round-robin,
//!    priority queue first, and records their ids as dispatched
//! 3. Workers process tasks and send back results
//! 4. `process_completed_tasks()` applies results on the coordinating thread
//!
//! With zero workers, `process_queued_tasks()` runs every queued task inline and
//! the results are applied by the next `process_completed_tasks()`.
//!
//! ## Worker Loss
//! A worker that exits (for instance because a task panicked) takes the tasks
//! it was holding with it. Their ids are reported by `take_lost()` so the
//! owner can publish them again. Once no worker is left, tasks run inline.
//!
//! ## Example Usage
//! ```ignore
//! let mut task_manager = TaskManager::new(num_workers);
//! task_manager.publish_task(Box::new(task), TaskPriority::Normal);
//!
//! // In the frame loop:
//! task_manager.process_completed_tasks(&mut pipeline);
//! task_manager.process_queued_tasks();
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{info, warn};
use task::{Task, TaskId, TaskResult};

use super::voxels::pipeline::GenerationPipeline;

/// Queue class of a published task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskPriority {
    /// Dispatched before any normal task.
    High,
    /// Dispatched in publication order once no high-priority task is waiting.
    Normal,
}

type QueuedTask = (TaskId, Box<dyn Task>);
type CompletedTask = (TaskId, Box<dyn TaskResult>);

/// A communication channel between the coordinating thread and a worker thread.
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<QueuedTask>,
    result_receiver: Receiver<CompletedTask>,
    /// Ids sent to this worker and not yet answered
    tasks_in_flight: Vec<TaskId>,
    connected: bool,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    priority_tasks: VecDeque<QueuedTask>,
    queued_tasks: VecDeque<QueuedTask>,
    /// Results of tasks run inline when there are no workers
    inline_results: VecDeque<CompletedTask>,
    /// Ids handed to workers since the last `take_dispatched()`
    dispatched: Vec<TaskId>,
    /// Ids held by workers that exited, since the last `take_lost()`
    lost: Vec<TaskId>,
    current_channel: usize,
    next_task_id: TaskId,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Keeping this at 1 means a task sitting in a worker's channel can never be
/// overtaken by a later priority task.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create. `0` runs tasks
    ///   inline on the calling thread.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<QueuedTask>();
            let (result_tx, result_rx) = channel::<CompletedTask>();

            let task_closure = move || {
                while let Ok((task_id, task)) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send((task_id, result)).is_err() {
                        break;
                    }
                }
            };

            match thread::Builder::new()
                .name(format!("task-worker-{worker_index}"))
                .spawn(task_closure)
            {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    result_receiver: result_rx,
                    tasks_in_flight: Vec::new(),
                    connected: true,
                    _worker: worker,
                }),
                Err(err) => warn!("Failed to spawn task worker {}: {}", worker_index, err),
            }
        }

        info!(
            "Task manager started with {} workers (available parallelism: {:?})",
            channels.len(),
            thread::available_parallelism()
        );

        TaskManager {
            channels,
            priority_tasks: VecDeque::new(),
            queued_tasks: VecDeque::new(),
            inline_results: VecDeque::new(),
            dispatched: Vec::new(),
            lost: Vec::new(),
            current_channel: 0,
            next_task_id: 0,
        }
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.iter().filter(|c| c.connected).count()
    }

    /// Queues a task and returns its id.
    ///
    /// The task is not sent to a worker until the next
    /// [`Self::process_queued_tasks`].
    pub fn publish_task(&mut self, task: Box<dyn Task>, priority: TaskPriority) -> TaskId {
        let task_id = self.next_task_id;
        self.next_task_id += 1;
        match priority {
            TaskPriority::High => self.priority_tasks.push_back((task_id, task)),
            TaskPriority::Normal => self.queued_tasks.push_back((task_id, task)),
        }
        task_id
    }

    /// Number of tasks waiting for a worker.
    pub fn queued_len(&self) -> usize {
        self.priority_tasks.len() + self.queued_tasks.len()
    }

    /// Number of tasks currently on workers, plus inline results not yet applied.
    pub fn in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|c| c.tasks_in_flight.len())
            .sum::<usize>()
            + self.inline_results.len()
    }

    /// `true` when nothing is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_len() == 0 && self.in_flight() == 0
    }

    /// Ids of tasks dispatched since the last call, in dispatch order.
    pub fn take_dispatched(&mut self) -> Vec<TaskId> {
        std::mem::take(&mut self.dispatched)
    }

    /// Ids of tasks lost with a worker since the last call.
    ///
    /// A lost task never produces a result.
    pub fn take_lost(&mut self) -> Vec<TaskId> {
        std::mem::take(&mut self.lost)
    }

    fn pop_next_task(&mut self) -> Option<QueuedTask> {
        self.priority_tasks
            .pop_front()
            .or_else(|| self.queued_tasks.pop_front())
    }

    fn push_back_front(&mut self, task: QueuedTask, priority: bool) {
        if priority {
            self.priority_tasks.push_front(task);
        } else {
            self.queued_tasks.push_front(task);
        }
    }

    /// Finds an available worker channel, round-robin from the last used one.
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|step| (self.current_channel + step) % len)
            .find(|&idx| {
                let channel = &self.channels[idx];
                channel.connected && channel.tasks_in_flight.len() < MAX_TASKS_IN_FLIGHT
            })
    }

    /// Dispatches queued tasks to idle workers, priority queue first.
    ///
    /// Without workers, every queued task is run inline instead.
    pub fn process_queued_tasks(&mut self) {
        if self.worker_count() == 0 {
            while let Some((task_id, task)) = self.pop_next_task() {
                self.dispatched.push(task_id);
                let result = task.process();
                self.inline_results.push_back((task_id, result));
            }
            return;
        }

        while let Some(channel_idx) = self.find_available_channel() {
            let from_priority = !self.priority_tasks.is_empty();
            let Some((task_id, task)) = self.pop_next_task() else {
                break;
            };

            match self.channels[channel_idx].task_sender.send((task_id, task)) {
                Ok(()) => {
                    self.channels[channel_idx].tasks_in_flight.push(task_id);
                    self.dispatched.push(task_id);
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                }
                Err(err) => {
                    warn!("Task worker {} disconnected, requeueing task {}", channel_idx, task_id);
                    self.channels[channel_idx].connected = false;
                    self.push_back_front(err.0, from_priority);
                }
            }
        }
    }

    /// Applies all completed task results on the coordinating thread.
    ///
    /// # Arguments
    /// * `pipeline` - The pipeline the results are applied to
    pub fn process_completed_tasks(&mut self, pipeline: &mut GenerationPipeline) {
        let mut completed = Vec::new();
        while let Some(result) = self.inline_results.pop_front() {
            completed.push(result);
        }

        for (channel_idx, channel) in self.channels.iter_mut().enumerate() {
            loop {
                match channel.result_receiver.try_recv() {
                    Ok(result) => {
                        channel.tasks_in_flight.retain(|&id| id != result.0);
                        completed.push(result);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        if channel.connected {
                            warn!(
                                "Task worker {} exited, losing tasks {:?}",
                                channel_idx, channel.tasks_in_flight
                            );
                        }
                        channel.connected = false;
                        self.lost.append(&mut channel.tasks_in_flight);
                        break;
                    }
                }
            }
        }

        for (task_id, result) in completed {
            result.handle_result(task_id, pipeline);
        }
    }
}
