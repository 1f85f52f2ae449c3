pub mod forms;
pub mod tracing;
pub mod views;
