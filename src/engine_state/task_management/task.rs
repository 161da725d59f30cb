//! # Task System Core Traits
//!
//! ## Core Components
//! - `Task`: a unit of work executed on a worker thread
//! - `TaskResult`: the result of a completed task, applied on the coordinating thread
//!
//! ## Task Lifecycle
//! 1. A `Task` is published via `TaskManager::publish_task()` and receives a [`TaskId`]
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called on the coordinating thread with
//!    the id of the task that produced it
//!
//! ## Thread Safety
//! Tasks own everything they need. Results carry data back; they never mutate
//! shared state from the worker side.

use crate::engine_state::voxels::pipeline::GenerationPipeline;

/// Identifier handed out for every published task.
pub type TaskId = u64;

/// A unit of work that can be executed on a worker thread.
///
/// # Implementation Guidelines
/// - Must be `Send` to be transferred between threads
/// - Should own all its data; no references into coordinating-thread state
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// # Returns
    /// A boxed `TaskResult` that will be processed on the coordinating thread.
    fn process(&self) -> Box<dyn TaskResult>;
}

/// The result of processing a `Task`.
pub trait TaskResult: Send {
    /// Applies the result on the coordinating thread.
    ///
    /// # Arguments
    /// * `task_id` - The id the producing task was published under
    /// * `pipeline` - The generation pipeline owning the chunk store
    fn handle_result(self: Box<Self>, task_id: TaskId, pipeline: &mut GenerationPipeline);
}
