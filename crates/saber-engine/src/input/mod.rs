pub mod landmarks;
pub mod queue;
