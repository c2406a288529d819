//! Mesh model identifiers

pub const GENERIC_ONOFF_SERVER: u16 = 0x1000;
pub const GENERIC_ONOFF_CLIENT: u16 = 0x1001;
pub const GENERIC_LEVEL_SERVER: u16 = 0x1002;
pub const GENERIC_LEVEL_CLIENT: u16 = 0x1003;
pub const GENERIC_TRANSITION_TIME_SERVER: u16 = 0x1004;
pub const GENERIC_TRANSITION_TIME_CLIENT: u16 = 0x1005;
pub const GENERIC_POWER_ONOFF_SERVER: u16 = 0x1006;
pub const GENERIC_POWER_ONOFF_SETUP_SERVER: u16 = 0x1007;
pub const GENERIC_POWER_ONOFF_CLIENT: u16 = 0x1008;
pub const LIGHT_LIGHTNESS_SERVER: u16 = 0x1300;
pub const LIGHT_LIGHTNESS_SETUP_SERVER: u16 = 0x1301;
pub const LIGHT_LIGHTNESS_CLIENT: u16 = 0x1302;
pub const LIGHT_CTL_SERVER: u16 = 0x1303;
pub const LIGHT_CTL_SETUP_SERVER: u16 = 0x1304;
pub const LIGHT_CTL_CLIENT: u16 = 0x1305;
pub const LIGHT_CTL_TEMPERATURE_SERVER: u16 = 0x1306;
