//! Application layer: the mesh light node and its error type

mod node;

pub use node::MeshLightNode;

use core::fmt;

use myrtio_mesh_lighting::EngineError;
use myrtio_mesh_model::RegistryError;

/// Error returned by node operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeError {
    /// A lighting server failed
    Engine(EngineError),
    /// Model registration failed
    Registry(RegistryError),
}

impl From<EngineError> for NodeError {
    fn from(err: EngineError) -> Self {
        NodeError::Engine(err)
    }
}

impl From<RegistryError> for NodeError {
    fn from(err: RegistryError) -> Self {
        NodeError::Registry(err)
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Engine(err) => write!(f, "engine error: {}", err),
            NodeError::Registry(err) => write!(f, "registry error: {}", err),
        }
    }
}
