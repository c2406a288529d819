#![no_std]

//! Mesh light node
//!
//! Composes the lighting and CTL servers behind a handler registry and
//! routes inbound model events and timer expiries to them.
//!
//! - `app` - The node and its error type
//! - `controllers` - Registry handlers mapping decoded events onto the servers
//! - `infrastructure` - Storage adapter and the node guard for threaded hosts

pub mod app;
pub mod config;
mod controllers;
pub mod infrastructure;

pub use app::{MeshLightNode, NodeError};
pub use config::NodeConfig;
pub use infrastructure::{memory_store::MemoryStore, shared_node::SharedNode};
