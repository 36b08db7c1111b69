pub mod adapter;
pub mod scheduler;
