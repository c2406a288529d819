use embassy_time::Duration;

/// Default delay between the last change and the persistence write
pub const NVM_SAVE_TIME: Duration = Duration::from_millis(5000);

/// Lightness restored when no non-zero value was ever set
pub const LIGHTNESS_LAST_DEFAULT: u16 = 0xFFFF;
pub const LIGHTNESS_DEFAULT_DEFAULT: u16 = 0;

/// Lighting (on/off, lightness, primary level) server settings
#[derive(Debug, Clone, Copy)]
pub struct LightingServerConfig {
    /// Element hosting the lighting models
    pub element_index: u16,
    /// Persistence key of the lightbulb record
    pub ps_key: u16,
    pub nvm_save_time: Duration,
    pub lightness_min: u16,
    pub lightness_max: u16,
}

impl LightingServerConfig {
    pub const DEFAULT: Self = Self {
        element_index: 0,
        ps_key: 0x4004,
        nvm_save_time: NVM_SAVE_TIME,
        lightness_min: 0x0001,
        lightness_max: 0xFFFF,
    };
}

impl Default for LightingServerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// CTL server settings
#[derive(Debug, Clone, Copy)]
pub struct CtlServerConfig {
    /// Element hosting the CTL and CTL setup servers
    pub element_index: u16,
    /// Element hosting the CTL temperature and secondary level servers
    pub temperature_element_index: u16,
    pub ps_key: u16,
    pub nvm_save_time: Duration,
    /// Absolute lower bound of the temperature range, in kelvin
    pub temperature_min: u16,
    /// Absolute upper bound of the temperature range, in kelvin
    pub temperature_max: u16,
    pub default_temperature: u16,
    pub default_delta_uv: i16,
}

impl CtlServerConfig {
    pub const DEFAULT: Self = Self {
        element_index: 0,
        temperature_element_index: 1,
        ps_key: 0x4005,
        nvm_save_time: NVM_SAVE_TIME,
        temperature_min: 800,
        temperature_max: 20000,
        default_temperature: 6500,
        default_delta_uv: 0,
    };
}

impl Default for CtlServerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
