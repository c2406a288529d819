//! Conversions between bound lighting states

/// Offset between lightness (unsigned) and generic level (signed)
const LEVEL_OFFSET: i32 = 32768;

pub const fn lightness_to_level(lightness: u16) -> i16 {
    (lightness as i32 - LEVEL_OFFSET) as i16
}

pub const fn level_to_lightness(level: i16) -> u16 {
    (level as i32 + LEVEL_OFFSET) as u16
}

/// Level reached by adding `delta`, saturated to the level range
pub fn saturating_level(level: i16, delta: i32) -> i16 {
    i32::from(level)
        .saturating_add(delta)
        .clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Perceptual (actual) lightness to linear lightness, rounded up
pub const fn actual_to_linear(actual: u16) -> u16 {
    let actual = actual as u32;
    ((actual * actual + 65534) / 65535) as u16
}

/// Linear lightness to perceptual (actual) lightness
pub fn linear_to_actual(linear: u16) -> u16 {
    (65535u32 * u32::from(linear)).isqrt() as u16
}

/// Map a generic level onto the `[min, max]` temperature range
pub const fn level_to_temperature(level: i16, min: u16, max: u16) -> u16 {
    if max <= min {
        return min;
    }
    let span = (max - min) as u32;
    let position = (level as i32 + LEVEL_OFFSET) as u32;
    min + (position * span / 65535) as u16
}

/// Map a temperature in `[min, max]` onto the generic level range
pub const fn temperature_to_level(temperature: u16, min: u16, max: u16) -> i16 {
    if max <= min || temperature <= min {
        return i16::MIN;
    }
    if temperature >= max {
        return i16::MAX;
    }
    let offset = (temperature - min) as u32;
    let span = (max - min) as u32;
    ((offset * 65535 / span) as i32 - LEVEL_OFFSET) as i16
}
