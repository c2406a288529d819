//! Platform pieces a host can compose a node from

pub mod memory_store;
pub mod shared_node;
