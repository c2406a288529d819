//! Persisted server records
//!
//! Records are stored verbatim, so field order and types are part of the
//! storage format.

use bytemuck::{Pod, Zeroable};

use crate::config::{
    CtlServerConfig, LIGHTNESS_DEFAULT_DEFAULT, LIGHTNESS_LAST_DEFAULT, LightingServerConfig,
};

/// Generic OnPowerUp values
pub const ON_POWER_UP_OFF: u8 = 0;
pub const ON_POWER_UP_ON: u8 = 1;
pub const ON_POWER_UP_RESTORE: u8 = 2;

pub const ONOFF_OFF: u8 = 0;
pub const ONOFF_ON: u8 = 1;

/// Raise to `min`, then lower to `max`, so `max` wins an inverted range
pub(crate) fn bound<T: Ord>(value: T, min: T, max: T) -> T {
    value.max(min).min(max)
}

/// Lighting server record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
pub struct LightbulbRecord {
    pub onoff_current: u8,
    pub onoff_target: u8,
    /// Default transition time byte
    pub transition_time: u8,
    pub on_power_up: u8,
    pub lightness_current: u16,
    pub lightness_target: u16,
    pub lightness_last: u16,
    pub lightness_default: u16,
    pub lightness_min: u16,
    pub lightness_max: u16,
    pub pri_level_current: i16,
    pub pri_level_target: i16,
}

impl LightbulbRecord {
    /// Record used when nothing valid is stored
    pub fn defaults(config: &LightingServerConfig) -> Self {
        let mut record = Self {
            lightness_last: LIGHTNESS_LAST_DEFAULT,
            lightness_default: LIGHTNESS_DEFAULT_DEFAULT,
            lightness_min: config.lightness_min,
            lightness_max: config.lightness_max,
            ..Self::zeroed()
        };
        record.validate_and_correct();
        record
    }

    /// Bring bounds and values back into a consistent range
    ///
    /// `min` yields to `max`. Zero lightness means off and is kept, every
    /// other lightness value is clamped into `[min, max]`.
    pub fn validate_and_correct(&mut self) {
        if self.lightness_min > self.lightness_max {
            self.lightness_min = self.lightness_max;
        }
        self.lightness_default = self.clamp_lightness(self.lightness_default);
        self.lightness_current = self.clamp_lightness(self.lightness_current);
        self.lightness_target = self.clamp_lightness(self.lightness_target);
    }

    /// Clamp a requested lightness into range, zero meaning off
    pub fn clamp_lightness(&self, lightness: u16) -> u16 {
        if lightness == 0 {
            0
        } else {
            bound(lightness, self.lightness_min, self.lightness_max)
        }
    }
}

/// CTL server record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
pub struct CtlRecord {
    pub temperature_current: u16,
    pub temperature_target: u16,
    pub temperature_default: u16,
    pub temperature_min: u16,
    pub temperature_max: u16,
    pub delta_uv_current: i16,
    pub delta_uv_target: i16,
    pub delta_uv_default: i16,
    pub sec_level_current: i16,
    pub sec_level_target: i16,
}

impl CtlRecord {
    pub fn defaults(config: &CtlServerConfig) -> Self {
        let mut record = Self {
            temperature_default: config.default_temperature,
            temperature_min: config.temperature_min,
            temperature_max: config.temperature_max,
            delta_uv_default: config.default_delta_uv,
            ..Self::zeroed()
        };
        record.validate_and_correct(config);
        record
    }

    /// Bring the temperature range inside the configured absolute bounds
    /// and every temperature inside the range
    pub fn validate_and_correct(&mut self, config: &CtlServerConfig) {
        self.temperature_min = bound(
            self.temperature_min,
            config.temperature_min,
            config.temperature_max,
        );
        if self.temperature_min > self.temperature_max {
            self.temperature_min = self.temperature_max;
        }
        let (min, max) = (self.temperature_min, self.temperature_max);
        self.temperature_default = bound(self.temperature_default, min, max);
        self.temperature_current = bound(self.temperature_current, min, max);
        self.temperature_target = bound(self.temperature_target, min, max);
    }

    pub fn clamp_temperature(&self, temperature: u16) -> u16 {
        bound(temperature, self.temperature_min, self.temperature_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_have_no_padding() {
        assert_eq!(size_of::<LightbulbRecord>(), 20);
        assert_eq!(size_of::<CtlRecord>(), 20);
    }

    #[test]
    fn inverted_lightness_range_lowers_min() {
        let mut record = LightbulbRecord {
            lightness_min: 100,
            lightness_max: 50,
            lightness_current: 10,
            lightness_target: 200,
            lightness_default: 0,
            ..LightbulbRecord::zeroed()
        };
        record.validate_and_correct();

        assert_eq!(record.lightness_min, 50);
        assert_eq!(record.lightness_max, 50);
        assert_eq!(record.lightness_current, 50);
        assert_eq!(record.lightness_target, 50);
        assert_eq!(record.lightness_default, 0);
    }

    #[test]
    fn default_lightness_is_clamped_unless_zero() {
        let mut record = LightbulbRecord {
            lightness_min: 100,
            lightness_max: 200,
            lightness_default: 20,
            ..LightbulbRecord::zeroed()
        };
        record.validate_and_correct();
        assert_eq!(record.lightness_default, 100);
    }

    #[test]
    fn defaults_follow_config() {
        let record = LightbulbRecord::defaults(&LightingServerConfig::DEFAULT);

        assert_eq!(record.lightness_last, 0xFFFF);
        assert_eq!(record.lightness_default, 0);
        assert_eq!(record.lightness_min, 1);
        assert_eq!(record.lightness_current, 0);
    }

    #[test]
    fn ctl_min_is_held_to_absolute_bounds() {
        let config = CtlServerConfig::DEFAULT;
        let mut record = CtlRecord {
            temperature_min: 100,
            temperature_max: 6000,
            temperature_default: 7000,
            temperature_current: 500,
            temperature_target: 4000,
            ..CtlRecord::zeroed()
        };
        record.validate_and_correct(&config);

        assert_eq!(record.temperature_min, 800);
        assert_eq!(record.temperature_default, 6000);
        assert_eq!(record.temperature_current, 800);
        assert_eq!(record.temperature_target, 4000);
    }
}
