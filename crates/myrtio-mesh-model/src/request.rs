//! Generic request values

use crate::{
    kind::RequestKind,
    property::PropertyValue,
    state::{
        CtlTemperature, CtlTriple, GlobalLocation, Hsl, HslRange, LcProperty, LocalLocation, Range,
    },
};

/// Generic request value
///
/// Transition time and delay travel beside the request in the event envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    OnOff(u8),
    OnPowerUp(u8),
    /// Default transition time, encoded as a transition time byte
    TransitionTime(u8),
    Level(i16),
    LevelDelta(i32),
    LevelMove(i16),
    LevelHalt,
    PowerLevelActual(u16),
    PowerLevelDefault(u16),
    PowerLevelRange(Range),
    LocationGlobal(GlobalLocation),
    LocationLocal(LocalLocation),
    PropertyUser {
        id: u16,
        value: PropertyValue<'a>,
    },
    PropertyAdmin {
        id: u16,
        access: u8,
        value: PropertyValue<'a>,
    },
    PropertyManufacturer {
        id: u16,
        access: u8,
    },
    LightnessActual(u16),
    LightnessLinear(u16),
    LightnessDefault(u16),
    LightnessRange(Range),
    Ctl(CtlTriple),
    CtlTemperature(CtlTemperature),
    CtlDefault(CtlTriple),
    CtlTemperatureRange(Range),
    Hsl(Hsl),
    HslHue(u16),
    HslSaturation(u16),
    HslDefault(Hsl),
    HslRange(HslRange),
    LcMode(u8),
    LcOccupancyMode(u8),
    LcLightOnOff(u8),
    LcPropertySet(LcProperty<'a>),
}

impl Request<'_> {
    pub const fn kind(&self) -> RequestKind {
        match self {
            Request::OnOff(_) => RequestKind::OnOff,
            Request::OnPowerUp(_) => RequestKind::OnPowerUp,
            Request::TransitionTime(_) => RequestKind::TransitionTime,
            Request::Level(_) => RequestKind::Level,
            Request::LevelDelta(_) => RequestKind::LevelDelta,
            Request::LevelMove(_) => RequestKind::LevelMove,
            Request::LevelHalt => RequestKind::LevelHalt,
            Request::PowerLevelActual(_) => RequestKind::PowerLevelActual,
            Request::PowerLevelDefault(_) => RequestKind::PowerLevelDefault,
            Request::PowerLevelRange(_) => RequestKind::PowerLevelRange,
            Request::LocationGlobal(_) => RequestKind::LocationGlobal,
            Request::LocationLocal(_) => RequestKind::LocationLocal,
            Request::PropertyUser { .. } => RequestKind::PropertyUser,
            Request::PropertyAdmin { .. } => RequestKind::PropertyAdmin,
            Request::PropertyManufacturer { .. } => RequestKind::PropertyManufacturer,
            Request::LightnessActual(_) => RequestKind::LightnessActual,
            Request::LightnessLinear(_) => RequestKind::LightnessLinear,
            Request::LightnessDefault(_) => RequestKind::LightnessDefault,
            Request::LightnessRange(_) => RequestKind::LightnessRange,
            Request::Ctl(_) => RequestKind::Ctl,
            Request::CtlTemperature(_) => RequestKind::CtlTemperature,
            Request::CtlDefault(_) => RequestKind::CtlDefault,
            Request::CtlTemperatureRange(_) => RequestKind::CtlTemperatureRange,
            Request::Hsl(_) => RequestKind::Hsl,
            Request::HslHue(_) => RequestKind::HslHue,
            Request::HslSaturation(_) => RequestKind::HslSaturation,
            Request::HslDefault(_) => RequestKind::HslDefault,
            Request::HslRange(_) => RequestKind::HslRange,
            Request::LcMode(_) => RequestKind::LcMode,
            Request::LcOccupancyMode(_) => RequestKind::LcOccupancyMode,
            Request::LcLightOnOff(_) => RequestKind::LcLightOnOff,
            Request::LcPropertySet(_) => RequestKind::LcPropertySet,
        }
    }
}
