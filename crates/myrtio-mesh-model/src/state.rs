//! Generic state values

use crate::{kind::StateKind, property::PropertyValue};

/// Inclusive `[min, max]` range of a 16-bit state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub min: u16,
    pub max: u16,
}

/// Range prefixed by a status code, as reported by setup servers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeWithStatus {
    pub status: u8,
    pub range: Range,
}

/// Battery state
///
/// Both times are 24-bit minute counts on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Battery {
    pub level: u8,
    pub time_to_discharge: u32,
    pub time_to_charge: u32,
    pub flags: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalLocation {
    pub latitude: i32,
    pub longitude: i32,
    pub altitude: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalLocation {
    pub north: i16,
    pub east: i16,
    pub altitude: i16,
    pub floor: u8,
    pub uncertainty: u16,
}

/// Device property with access flags and a borrowed raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Property<'a> {
    pub id: u16,
    pub access: u8,
    pub value: PropertyValue<'a>,
}

/// Light LC property with a borrowed raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LcProperty<'a> {
    pub id: u16,
    pub value: PropertyValue<'a>,
}

/// CTL lightness and temperature pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ctl {
    pub lightness: u16,
    pub temperature: u16,
}

/// CTL temperature and delta UV pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CtlTemperature {
    pub temperature: u16,
    pub delta_uv: i16,
}

/// Full CTL triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CtlTriple {
    pub lightness: u16,
    pub temperature: u16,
    pub delta_uv: i16,
}

/// HSL triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hsl {
    pub lightness: u16,
    pub hue: u16,
    pub saturation: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HslRange {
    pub hue_min: u16,
    pub hue_max: u16,
    pub saturation_min: u16,
    pub saturation_max: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HslRangeWithStatus {
    pub status: u8,
    pub range: HslRange,
}

/// Generic state value
///
/// Variable-length variants borrow from the buffer they were decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State<'a> {
    OnOff(u8),
    OnPowerUp(u8),
    Level(i16),
    PowerLevelActual(u16),
    PowerLevelLast(u16),
    PowerLevelDefault(u16),
    PowerLevelRange(Range),
    PowerLevelRangeWithStatus(RangeWithStatus),
    TransitionTime(u8),
    Battery(Battery),
    LocationGlobal(GlobalLocation),
    LocationLocal(LocalLocation),
    PropertyUser(Property<'a>),
    PropertyAdmin(Property<'a>),
    PropertyManufacturer(Property<'a>),
    PropertyListUser(PropertyValue<'a>),
    PropertyListAdmin(PropertyValue<'a>),
    PropertyListManufacturer(PropertyValue<'a>),
    PropertyListClient(PropertyValue<'a>),
    LightnessActual(u16),
    LightnessLinear(u16),
    LightnessLast(u16),
    LightnessDefault(u16),
    LightnessRange(Range),
    LightnessRangeWithStatus(RangeWithStatus),
    Ctl(Ctl),
    CtlTemperature(CtlTemperature),
    CtlDefault(CtlTriple),
    CtlTemperatureRange(Range),
    CtlTemperatureRangeWithStatus(RangeWithStatus),
    CtlLightnessTemperature(CtlTriple),
    Hsl(Hsl),
    HslHue(u16),
    HslSaturation(u16),
    HslDefault(Hsl),
    HslRange(HslRange),
    HslRangeWithStatus(HslRangeWithStatus),
    HslTarget(Hsl),
    LcMode(u8),
    LcOccupancyMode(u8),
    LcLightOnOff(u8),
    LcProperty(LcProperty<'a>),
}

impl State<'_> {
    pub const fn kind(&self) -> StateKind {
        match self {
            State::OnOff(_) => StateKind::OnOff,
            State::OnPowerUp(_) => StateKind::OnPowerUp,
            State::Level(_) => StateKind::Level,
            State::PowerLevelActual(_) => StateKind::PowerLevelActual,
            State::PowerLevelLast(_) => StateKind::PowerLevelLast,
            State::PowerLevelDefault(_) => StateKind::PowerLevelDefault,
            State::PowerLevelRange(_) => StateKind::PowerLevelRange,
            State::PowerLevelRangeWithStatus(_) => StateKind::PowerLevelRangeWithStatus,
            State::TransitionTime(_) => StateKind::TransitionTime,
            State::Battery(_) => StateKind::Battery,
            State::LocationGlobal(_) => StateKind::LocationGlobal,
            State::LocationLocal(_) => StateKind::LocationLocal,
            State::PropertyUser(_) => StateKind::PropertyUser,
            State::PropertyAdmin(_) => StateKind::PropertyAdmin,
            State::PropertyManufacturer(_) => StateKind::PropertyManufacturer,
            State::PropertyListUser(_) => StateKind::PropertyListUser,
            State::PropertyListAdmin(_) => StateKind::PropertyListAdmin,
            State::PropertyListManufacturer(_) => StateKind::PropertyListManufacturer,
            State::PropertyListClient(_) => StateKind::PropertyListClient,
            State::LightnessActual(_) => StateKind::LightnessActual,
            State::LightnessLinear(_) => StateKind::LightnessLinear,
            State::LightnessLast(_) => StateKind::LightnessLast,
            State::LightnessDefault(_) => StateKind::LightnessDefault,
            State::LightnessRange(_) => StateKind::LightnessRange,
            State::LightnessRangeWithStatus(_) => StateKind::LightnessRangeWithStatus,
            State::Ctl(_) => StateKind::Ctl,
            State::CtlTemperature(_) => StateKind::CtlTemperature,
            State::CtlDefault(_) => StateKind::CtlDefault,
            State::CtlTemperatureRange(_) => StateKind::CtlTemperatureRange,
            State::CtlTemperatureRangeWithStatus(_) => StateKind::CtlTemperatureRangeWithStatus,
            State::CtlLightnessTemperature(_) => StateKind::CtlLightnessTemperature,
            State::Hsl(_) => StateKind::Hsl,
            State::HslHue(_) => StateKind::HslHue,
            State::HslSaturation(_) => StateKind::HslSaturation,
            State::HslDefault(_) => StateKind::HslDefault,
            State::HslRange(_) => StateKind::HslRange,
            State::HslRangeWithStatus(_) => StateKind::HslRangeWithStatus,
            State::HslTarget(_) => StateKind::HslTarget,
            State::LcMode(_) => StateKind::LcMode,
            State::LcOccupancyMode(_) => StateKind::LcOccupancyMode,
            State::LcLightOnOff(_) => StateKind::LcLightOnOff,
            State::LcProperty(_) => StateKind::LcProperty,
        }
    }
}
