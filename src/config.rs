use myrtio_mesh_lighting::{CtlServerConfig, LightingServerConfig};

/// Registry slots allocated up front, one per registered model
pub const REGISTRY_CAPACITY: usize = 10;
/// Registry growth step once the initial slots are used
pub const REGISTRY_INCREMENT: usize = 4;

/// Node composition settings
#[derive(Debug, Clone, Copy)]
pub struct NodeConfig {
    pub lighting: LightingServerConfig,
    pub ctl: CtlServerConfig,
    pub registry_capacity: usize,
    pub registry_increment: usize,
}

impl NodeConfig {
    pub const DEFAULT: Self = Self {
        lighting: LightingServerConfig::DEFAULT,
        ctl: CtlServerConfig::DEFAULT,
        registry_capacity: REGISTRY_CAPACITY,
        registry_increment: REGISTRY_INCREMENT,
    };
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
