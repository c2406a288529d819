use core::fmt;

/// Error returned by the state/request codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Wrong payload length for the kind, unknown kind or mismatched target
    InvalidParameter,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::InvalidParameter => write!(f, "invalid parameter"),
        }
    }
}

/// Error returned by the handler registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The (model, element) pair already has handlers
    AlreadyRegistered,
    /// The table is full and growth is disabled (or allocation failed)
    NoCapacity,
    /// Every handler slot was empty
    NullHandlers,
    /// No handlers registered for the (model, element) pair
    NotFound,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyRegistered => write!(f, "model already registered"),
            RegistryError::NoCapacity => write!(f, "registry is full"),
            RegistryError::NullHandlers => write!(f, "no handlers given"),
            RegistryError::NotFound => write!(f, "model not registered"),
        }
    }
}
