//! Transition time byte format
//!
//! Bits 0-5 hold the number of steps, bits 6-7 the step resolution
//! (100 ms, 1 s, 10 s or 10 min). A step count of `0x3F` means unknown.

/// Step count marking an unknown transition time
pub const UNKNOWN_STEPS: u8 = 0x3F;

/// Largest representable step count
pub const MAX_STEPS: u8 = 0x3E;

/// Transition time byte for an unknown value
pub const UNKNOWN_TRANSITION_TIME: u8 = UNKNOWN_STEPS;

/// Largest transition time representable by the byte format (62 x 10 min)
pub const MAX_TRANSITION_TIME_MS: u32 = 37_200_000;

/// Remaining time reported while the end of a change is not known
pub const UNKNOWN_REMAINING_TIME: u32 = 40_000_000;

const STEP_RESOLUTIONS_MS: [u32; 4] = [100, 1_000, 10_000, 600_000];

/// Whether a remaining time in milliseconds means "unknown"
pub const fn is_unknown_remaining(ms: u32) -> bool {
    ms > MAX_TRANSITION_TIME_MS
}

/// Decode a transition time byte, `None` when the value is unknown
pub const fn transition_time_to_ms(value: u8) -> Option<u32> {
    let steps = value & UNKNOWN_STEPS;
    if steps == UNKNOWN_STEPS {
        return None;
    }
    let resolution = STEP_RESOLUTIONS_MS[(value >> 6) as usize];
    Some(steps as u32 * resolution)
}

/// Encode milliseconds with the finest resolution that fits
///
/// Values are rounded down to a whole number of steps. Values beyond the
/// representable range encode as unknown.
pub const fn ms_to_transition_time(ms: u32) -> u8 {
    let mut index = 0;
    while index < STEP_RESOLUTIONS_MS.len() {
        let steps = ms / STEP_RESOLUTIONS_MS[index];
        if steps <= MAX_STEPS as u32 {
            return ((index as u8) << 6) | steps as u8;
        }
        index += 1;
    }
    UNKNOWN_TRANSITION_TIME
}
