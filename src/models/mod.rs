//! Data layer: entity models and portable repository operations.

pub mod task;

pub use task::{NewTask, Task};
