pub mod actor;
pub mod emitter;
pub mod enemy;
