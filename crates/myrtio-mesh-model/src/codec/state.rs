use super::wire::{U24_MAX, WireReader, WireWriter};
use crate::{
    error::CodecError,
    kind::StateKind,
    property::PropertyValue,
    state::{
        Battery, Ctl, CtlTemperature, CtlTriple, GlobalLocation, Hsl, HslRange,
        HslRangeWithStatus, LcProperty, LocalLocation, Property, Range, RangeWithStatus, State,
    },
};

/// Header length of device property states (id + access)
const PROPERTY_HEADER_LEN: usize = 3;
/// Header length of LC property states (id)
const LC_PROPERTY_HEADER_LEN: usize = 2;

/// Wire length of a fixed-size state kind, `None` for variable-length kinds
pub(crate) const fn fixed_len(kind: StateKind) -> Option<usize> {
    let len = match kind {
        StateKind::OnOff
        | StateKind::OnPowerUp
        | StateKind::TransitionTime
        | StateKind::LcMode
        | StateKind::LcOccupancyMode
        | StateKind::LcLightOnOff => 1,
        StateKind::Level
        | StateKind::PowerLevelActual
        | StateKind::PowerLevelLast
        | StateKind::PowerLevelDefault
        | StateKind::LightnessActual
        | StateKind::LightnessLinear
        | StateKind::LightnessLast
        | StateKind::LightnessDefault
        | StateKind::HslHue
        | StateKind::HslSaturation => 2,
        StateKind::PowerLevelRange
        | StateKind::LightnessRange
        | StateKind::CtlTemperatureRange
        | StateKind::Ctl
        | StateKind::CtlTemperature => 4,
        StateKind::PowerLevelRangeWithStatus
        | StateKind::LightnessRangeWithStatus
        | StateKind::CtlTemperatureRangeWithStatus => 5,
        StateKind::CtlDefault
        | StateKind::CtlLightnessTemperature
        | StateKind::Hsl
        | StateKind::HslDefault
        | StateKind::HslTarget => 6,
        StateKind::Battery | StateKind::HslRange => 8,
        StateKind::HslRangeWithStatus | StateKind::LocationLocal => 9,
        StateKind::LocationGlobal => 10,
        StateKind::PropertyUser
        | StateKind::PropertyAdmin
        | StateKind::PropertyManufacturer
        | StateKind::PropertyListUser
        | StateKind::PropertyListAdmin
        | StateKind::PropertyListManufacturer
        | StateKind::PropertyListClient
        | StateKind::LcProperty => return None,
    };
    Some(len)
}

/// Whether the kind may carry a target value after the current one
pub(crate) const fn has_target(kind: StateKind) -> bool {
    matches!(
        kind,
        StateKind::OnOff
            | StateKind::Level
            | StateKind::PowerLevelActual
            | StateKind::LightnessActual
            | StateKind::LightnessLinear
            | StateKind::Ctl
            | StateKind::CtlTemperature
            | StateKind::Hsl
            | StateKind::HslHue
            | StateKind::HslSaturation
            | StateKind::LcLightOnOff
    )
}

/// Exact encoded length of one state value
pub(crate) fn encoded_len(state: &State<'_>) -> Result<usize, CodecError> {
    // Field ranges are checked here so that encoding never fails midway
    if matches!(state, State::Battery(battery)
        if battery.time_to_discharge > U24_MAX || battery.time_to_charge > U24_MAX)
    {
        return Err(CodecError::InvalidParameter);
    }
    if let Some(len) = fixed_len(state.kind()) {
        return Ok(len);
    }
    let len = match state {
        State::PropertyUser(property)
        | State::PropertyAdmin(property)
        | State::PropertyManufacturer(property) => PROPERTY_HEADER_LEN + property.value.len(),
        State::PropertyListUser(list)
        | State::PropertyListAdmin(list)
        | State::PropertyListManufacturer(list)
        | State::PropertyListClient(list) => {
            if list.len() % 2 != 0 {
                return Err(CodecError::InvalidParameter);
            }
            list.len()
        }
        State::LcProperty(property) => LC_PROPERTY_HEADER_LEN + property.value.len(),
        _ => return Err(CodecError::InvalidParameter),
    };
    Ok(len)
}

fn encode_range(w: &mut WireWriter<'_>, range: &Range) -> Result<(), CodecError> {
    w.u16(range.min)?;
    w.u16(range.max)
}

fn encode_range_with_status(
    w: &mut WireWriter<'_>,
    value: &RangeWithStatus,
) -> Result<(), CodecError> {
    w.u8(value.status)?;
    encode_range(w, &value.range)
}

fn encode_hsl(w: &mut WireWriter<'_>, hsl: &Hsl) -> Result<(), CodecError> {
    w.u16(hsl.lightness)?;
    w.u16(hsl.hue)?;
    w.u16(hsl.saturation)
}

fn encode_hsl_range(w: &mut WireWriter<'_>, range: &HslRange) -> Result<(), CodecError> {
    w.u16(range.hue_min)?;
    w.u16(range.hue_max)?;
    w.u16(range.saturation_min)?;
    w.u16(range.saturation_max)
}

fn encode_ctl_triple(w: &mut WireWriter<'_>, ctl: &CtlTriple) -> Result<(), CodecError> {
    w.u16(ctl.lightness)?;
    w.u16(ctl.temperature)?;
    w.i16(ctl.delta_uv)
}

pub(super) fn encode_global_location(
    w: &mut WireWriter<'_>,
    location: &GlobalLocation,
) -> Result<(), CodecError> {
    w.i32(location.latitude)?;
    w.i32(location.longitude)?;
    w.i16(location.altitude)
}

pub(super) fn encode_local_location(
    w: &mut WireWriter<'_>,
    location: &LocalLocation,
) -> Result<(), CodecError> {
    w.i16(location.north)?;
    w.i16(location.east)?;
    w.i16(location.altitude)?;
    w.u8(location.floor)?;
    w.u16(location.uncertainty)
}

/// Write one state value
pub(crate) fn encode(w: &mut WireWriter<'_>, state: &State<'_>) -> Result<(), CodecError> {
    match state {
        State::OnOff(v)
        | State::OnPowerUp(v)
        | State::TransitionTime(v)
        | State::LcMode(v)
        | State::LcOccupancyMode(v)
        | State::LcLightOnOff(v) => w.u8(*v),
        State::Level(v) => w.i16(*v),
        State::PowerLevelActual(v)
        | State::PowerLevelLast(v)
        | State::PowerLevelDefault(v)
        | State::LightnessActual(v)
        | State::LightnessLinear(v)
        | State::LightnessLast(v)
        | State::LightnessDefault(v)
        | State::HslHue(v)
        | State::HslSaturation(v) => w.u16(*v),
        State::PowerLevelRange(range)
        | State::LightnessRange(range)
        | State::CtlTemperatureRange(range) => encode_range(w, range),
        State::PowerLevelRangeWithStatus(value)
        | State::LightnessRangeWithStatus(value)
        | State::CtlTemperatureRangeWithStatus(value) => encode_range_with_status(w, value),
        State::Battery(battery) => {
            w.u8(battery.level)?;
            w.u24(battery.time_to_discharge)?;
            w.u24(battery.time_to_charge)?;
            w.u8(battery.flags)
        }
        State::LocationGlobal(location) => encode_global_location(w, location),
        State::LocationLocal(location) => encode_local_location(w, location),
        State::PropertyUser(property)
        | State::PropertyAdmin(property)
        | State::PropertyManufacturer(property) => {
            w.u16(property.id)?;
            w.u8(property.access)?;
            w.bytes(property.value.bytes())
        }
        State::PropertyListUser(list)
        | State::PropertyListAdmin(list)
        | State::PropertyListManufacturer(list)
        | State::PropertyListClient(list) => w.bytes(list.bytes()),
        State::Ctl(ctl) => {
            w.u16(ctl.lightness)?;
            w.u16(ctl.temperature)
        }
        State::CtlTemperature(value) => {
            w.u16(value.temperature)?;
            w.i16(value.delta_uv)
        }
        State::CtlDefault(ctl) | State::CtlLightnessTemperature(ctl) => encode_ctl_triple(w, ctl),
        State::Hsl(hsl) | State::HslDefault(hsl) | State::HslTarget(hsl) => encode_hsl(w, hsl),
        State::HslRange(range) => encode_hsl_range(w, range),
        State::HslRangeWithStatus(value) => {
            w.u8(value.status)?;
            encode_hsl_range(w, &value.range)
        }
        State::LcProperty(property) => {
            w.u16(property.id)?;
            w.bytes(property.value.bytes())
        }
    }
}

fn decode_range(r: &mut WireReader<'_>) -> Result<Range, CodecError> {
    Ok(Range {
        min: r.u16()?,
        max: r.u16()?,
    })
}

fn decode_range_with_status(r: &mut WireReader<'_>) -> Result<RangeWithStatus, CodecError> {
    let status = r.u8()?;
    Ok(RangeWithStatus {
        status,
        range: decode_range(r)?,
    })
}

fn decode_hsl(r: &mut WireReader<'_>) -> Result<Hsl, CodecError> {
    Ok(Hsl {
        lightness: r.u16()?,
        hue: r.u16()?,
        saturation: r.u16()?,
    })
}

fn decode_hsl_range(r: &mut WireReader<'_>) -> Result<HslRange, CodecError> {
    Ok(HslRange {
        hue_min: r.u16()?,
        hue_max: r.u16()?,
        saturation_min: r.u16()?,
        saturation_max: r.u16()?,
    })
}

fn decode_ctl_triple(r: &mut WireReader<'_>) -> Result<CtlTriple, CodecError> {
    Ok(CtlTriple {
        lightness: r.u16()?,
        temperature: r.u16()?,
        delta_uv: r.i16()?,
    })
}

pub(super) fn decode_global_location(r: &mut WireReader<'_>) -> Result<GlobalLocation, CodecError> {
    Ok(GlobalLocation {
        latitude: r.i32()?,
        longitude: r.i32()?,
        altitude: r.i16()?,
    })
}

pub(super) fn decode_local_location(r: &mut WireReader<'_>) -> Result<LocalLocation, CodecError> {
    Ok(LocalLocation {
        north: r.i16()?,
        east: r.i16()?,
        altitude: r.i16()?,
        floor: r.u8()?,
        uncertainty: r.u16()?,
    })
}

/// View over the rest of the buffer from the reader position
pub(super) fn trailing_view<'a>(r: &WireReader<'a>) -> Result<PropertyValue<'a>, CodecError> {
    let buffer = r.buffer();
    let offset = r.position();
    PropertyValue::new(buffer, offset, buffer.len().saturating_sub(offset))
        .ok_or(CodecError::InvalidParameter)
}

/// Decode one state value occupying exactly `buf`
pub(crate) fn decode(kind: StateKind, buf: &[u8]) -> Result<State<'_>, CodecError> {
    match fixed_len(kind) {
        Some(len) if buf.len() != len => return Err(CodecError::InvalidParameter),
        Some(_) => {}
        None => check_variable_len(kind, buf.len())?,
    }

    let mut r = WireReader::new(buf);
    let state = match kind {
        StateKind::OnOff => State::OnOff(r.u8()?),
        StateKind::OnPowerUp => State::OnPowerUp(r.u8()?),
        StateKind::TransitionTime => State::TransitionTime(r.u8()?),
        StateKind::LcMode => State::LcMode(r.u8()?),
        StateKind::LcOccupancyMode => State::LcOccupancyMode(r.u8()?),
        StateKind::LcLightOnOff => State::LcLightOnOff(r.u8()?),
        StateKind::Level => State::Level(r.i16()?),
        StateKind::PowerLevelActual => State::PowerLevelActual(r.u16()?),
        StateKind::PowerLevelLast => State::PowerLevelLast(r.u16()?),
        StateKind::PowerLevelDefault => State::PowerLevelDefault(r.u16()?),
        StateKind::LightnessActual => State::LightnessActual(r.u16()?),
        StateKind::LightnessLinear => State::LightnessLinear(r.u16()?),
        StateKind::LightnessLast => State::LightnessLast(r.u16()?),
        StateKind::LightnessDefault => State::LightnessDefault(r.u16()?),
        StateKind::HslHue => State::HslHue(r.u16()?),
        StateKind::HslSaturation => State::HslSaturation(r.u16()?),
        StateKind::PowerLevelRange => State::PowerLevelRange(decode_range(&mut r)?),
        StateKind::LightnessRange => State::LightnessRange(decode_range(&mut r)?),
        StateKind::CtlTemperatureRange => State::CtlTemperatureRange(decode_range(&mut r)?),
        StateKind::PowerLevelRangeWithStatus => {
            State::PowerLevelRangeWithStatus(decode_range_with_status(&mut r)?)
        }
        StateKind::LightnessRangeWithStatus => {
            State::LightnessRangeWithStatus(decode_range_with_status(&mut r)?)
        }
        StateKind::CtlTemperatureRangeWithStatus => {
            State::CtlTemperatureRangeWithStatus(decode_range_with_status(&mut r)?)
        }
        StateKind::Battery => State::Battery(Battery {
            level: r.u8()?,
            time_to_discharge: r.u24()?,
            time_to_charge: r.u24()?,
            flags: r.u8()?,
        }),
        StateKind::LocationGlobal => State::LocationGlobal(decode_global_location(&mut r)?),
        StateKind::LocationLocal => State::LocationLocal(decode_local_location(&mut r)?),
        StateKind::PropertyUser | StateKind::PropertyAdmin | StateKind::PropertyManufacturer => {
            let id = r.u16()?;
            let access = r.u8()?;
            let property = Property {
                id,
                access,
                value: trailing_view(&r)?,
            };
            match kind {
                StateKind::PropertyUser => State::PropertyUser(property),
                StateKind::PropertyAdmin => State::PropertyAdmin(property),
                _ => State::PropertyManufacturer(property),
            }
        }
        StateKind::PropertyListUser => State::PropertyListUser(PropertyValue::from_slice(buf)),
        StateKind::PropertyListAdmin => State::PropertyListAdmin(PropertyValue::from_slice(buf)),
        StateKind::PropertyListManufacturer => {
            State::PropertyListManufacturer(PropertyValue::from_slice(buf))
        }
        StateKind::PropertyListClient => State::PropertyListClient(PropertyValue::from_slice(buf)),
        StateKind::Ctl => State::Ctl(Ctl {
            lightness: r.u16()?,
            temperature: r.u16()?,
        }),
        StateKind::CtlTemperature => State::CtlTemperature(CtlTemperature {
            temperature: r.u16()?,
            delta_uv: r.i16()?,
        }),
        StateKind::CtlDefault => State::CtlDefault(decode_ctl_triple(&mut r)?),
        StateKind::CtlLightnessTemperature => {
            State::CtlLightnessTemperature(decode_ctl_triple(&mut r)?)
        }
        StateKind::Hsl => State::Hsl(decode_hsl(&mut r)?),
        StateKind::HslDefault => State::HslDefault(decode_hsl(&mut r)?),
        StateKind::HslTarget => State::HslTarget(decode_hsl(&mut r)?),
        StateKind::HslRange => State::HslRange(decode_hsl_range(&mut r)?),
        StateKind::HslRangeWithStatus => {
            let status = r.u8()?;
            State::HslRangeWithStatus(HslRangeWithStatus {
                status,
                range: decode_hsl_range(&mut r)?,
            })
        }
        StateKind::LcProperty => {
            let id = r.u16()?;
            State::LcProperty(LcProperty {
                id,
                value: trailing_view(&r)?,
            })
        }
    };
    Ok(state)
}

fn check_variable_len(kind: StateKind, len: usize) -> Result<(), CodecError> {
    let valid = match kind {
        StateKind::PropertyUser | StateKind::PropertyAdmin | StateKind::PropertyManufacturer => {
            len >= PROPERTY_HEADER_LEN
        }
        StateKind::LcProperty => len >= LC_PROPERTY_HEADER_LEN,
        // Even length only, the pair layout is not decoded here
        StateKind::PropertyListUser
        | StateKind::PropertyListAdmin
        | StateKind::PropertyListManufacturer
        | StateKind::PropertyListClient => len % 2 == 0,
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CodecError::InvalidParameter)
    }
}
