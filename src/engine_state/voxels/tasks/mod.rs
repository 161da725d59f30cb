//! # Voxel Task System
//!
//! Tasks related to voxel world generation. They run on the task manager's
//! workers so the coordinating thread stays free for meshing.

pub mod chunk_generation_task;
