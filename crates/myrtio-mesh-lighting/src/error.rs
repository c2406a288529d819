use core::fmt;

/// Error reported by a timer service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// No free timer slot
    NoResources,
    /// Periodic timer with a zero period
    ZeroPeriod,
    /// Platform timer failure
    Driver,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::NoResources => write!(f, "no free timer"),
            TimerError::ZeroPeriod => write!(f, "periodic timer needs a non-zero period"),
            TimerError::Driver => write!(f, "timer driver error"),
        }
    }
}

/// Error reported by the mesh transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The stack cannot take the message right now
    Busy,
    /// Payload did not encode
    Encoding,
    /// Stack failure
    Driver,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Busy => write!(f, "transport busy"),
            TransportError::Encoding => write!(f, "state encoding failed"),
            TransportError::Driver => write!(f, "transport error"),
        }
    }
}

/// Error reported by the key/value store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    NotFound,
    /// Stored value is larger than the read buffer
    BufferTooSmall,
    NoSpace,
    Driver,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "key not found"),
            StoreError::BufferTooSmall => write!(f, "buffer too small"),
            StoreError::NoSpace => write!(f, "store is full"),
            StoreError::Driver => write!(f, "store driver error"),
        }
    }
}

/// Error surfaced by the lighting servers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A timer could not be started or stopped
    Timer(TimerError),
}

impl From<TimerError> for EngineError {
    fn from(err: TimerError) -> Self {
        EngineError::Timer(err)
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Timer(err) => write!(f, "timer failure: {}", err),
        }
    }
}
