use super::{
    state::{
        decode_global_location, decode_local_location, encode_global_location,
        encode_local_location, trailing_view,
    },
    wire::{WireReader, WireWriter},
};
use crate::{
    error::CodecError,
    kind::RequestKind,
    request::Request,
    state::{CtlTemperature, CtlTriple, Hsl, HslRange, LcProperty, Range},
};

/// Minimum length of a user property request (id)
const PROPERTY_USER_MIN_LEN: usize = 2;
/// Minimum length of an admin property request (id + access)
const PROPERTY_ADMIN_MIN_LEN: usize = 3;
/// Minimum length of an LC property set request (id)
const LC_PROPERTY_MIN_LEN: usize = 2;

/// Wire length of a fixed-size request kind, `None` for variable-length kinds
pub(crate) const fn fixed_len(kind: RequestKind) -> Option<usize> {
    let len = match kind {
        RequestKind::LevelHalt => 0,
        RequestKind::OnOff
        | RequestKind::OnPowerUp
        | RequestKind::TransitionTime
        | RequestKind::LcMode
        | RequestKind::LcOccupancyMode
        | RequestKind::LcLightOnOff => 1,
        RequestKind::Level
        | RequestKind::LevelMove
        | RequestKind::PowerLevelActual
        | RequestKind::PowerLevelDefault
        | RequestKind::LightnessActual
        | RequestKind::LightnessLinear
        | RequestKind::LightnessDefault
        | RequestKind::HslHue
        | RequestKind::HslSaturation => 2,
        RequestKind::PropertyManufacturer => 3,
        RequestKind::LevelDelta
        | RequestKind::PowerLevelRange
        | RequestKind::LightnessRange
        | RequestKind::CtlTemperature
        | RequestKind::CtlTemperatureRange => 4,
        RequestKind::Ctl
        | RequestKind::CtlDefault
        | RequestKind::Hsl
        | RequestKind::HslDefault => 6,
        RequestKind::HslRange => 8,
        RequestKind::LocationLocal => 9,
        RequestKind::LocationGlobal => 10,
        RequestKind::PropertyUser | RequestKind::PropertyAdmin | RequestKind::LcPropertySet => {
            return None;
        }
    };
    Some(len)
}

/// Exact encoded length of a request
pub(crate) fn encoded_len(request: &Request<'_>) -> usize {
    match request {
        Request::PropertyUser { value, .. } => PROPERTY_USER_MIN_LEN + value.len(),
        Request::PropertyAdmin { value, .. } => PROPERTY_ADMIN_MIN_LEN + value.len(),
        Request::LcPropertySet(property) => LC_PROPERTY_MIN_LEN + property.value.len(),
        other => fixed_len(other.kind()).unwrap_or(0),
    }
}

fn encode_range(w: &mut WireWriter<'_>, range: &Range) -> Result<(), CodecError> {
    w.u16(range.min)?;
    w.u16(range.max)
}

fn encode_triple(w: &mut WireWriter<'_>, a: u16, b: u16, c: u16) -> Result<(), CodecError> {
    w.u16(a)?;
    w.u16(b)?;
    w.u16(c)
}

pub(crate) fn encode(w: &mut WireWriter<'_>, request: &Request<'_>) -> Result<(), CodecError> {
    match request {
        Request::OnOff(v)
        | Request::OnPowerUp(v)
        | Request::TransitionTime(v)
        | Request::LcMode(v)
        | Request::LcOccupancyMode(v)
        | Request::LcLightOnOff(v) => w.u8(*v),
        Request::Level(v) | Request::LevelMove(v) => w.i16(*v),
        Request::LevelDelta(v) => w.i32(*v),
        Request::LevelHalt => Ok(()),
        Request::PowerLevelActual(v)
        | Request::PowerLevelDefault(v)
        | Request::LightnessActual(v)
        | Request::LightnessLinear(v)
        | Request::LightnessDefault(v)
        | Request::HslHue(v)
        | Request::HslSaturation(v) => w.u16(*v),
        Request::PowerLevelRange(range)
        | Request::LightnessRange(range)
        | Request::CtlTemperatureRange(range) => encode_range(w, range),
        Request::LocationGlobal(location) => encode_global_location(w, location),
        Request::LocationLocal(location) => encode_local_location(w, location),
        Request::PropertyUser { id, value } => {
            w.u16(*id)?;
            w.bytes(value.bytes())
        }
        Request::PropertyAdmin { id, access, value } => {
            w.u16(*id)?;
            w.u8(*access)?;
            w.bytes(value.bytes())
        }
        Request::PropertyManufacturer { id, access } => {
            w.u16(*id)?;
            w.u8(*access)
        }
        Request::Ctl(ctl) | Request::CtlDefault(ctl) => {
            w.u16(ctl.lightness)?;
            w.u16(ctl.temperature)?;
            w.i16(ctl.delta_uv)
        }
        Request::CtlTemperature(value) => {
            w.u16(value.temperature)?;
            w.i16(value.delta_uv)
        }
        Request::Hsl(hsl) | Request::HslDefault(hsl) => {
            encode_triple(w, hsl.lightness, hsl.hue, hsl.saturation)
        }
        Request::HslRange(range) => {
            encode_range(
                w,
                &Range {
                    min: range.hue_min,
                    max: range.hue_max,
                },
            )?;
            encode_range(
                w,
                &Range {
                    min: range.saturation_min,
                    max: range.saturation_max,
                },
            )
        }
        Request::LcPropertySet(property) => {
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

fn decode_ctl_triple(r: &mut WireReader<'_>) -> Result<CtlTriple, CodecError> {
    Ok(CtlTriple {
        lightness: r.u16()?,
        temperature: r.u16()?,
        delta_uv: r.i16()?,
    })
}

fn decode_hsl(r: &mut WireReader<'_>) -> Result<Hsl, CodecError> {
    Ok(Hsl {
        lightness: r.u16()?,
        hue: r.u16()?,
        saturation: r.u16()?,
    })
}

pub(crate) fn decode(kind: RequestKind, buf: &[u8]) -> Result<Request<'_>, CodecError> {
    let valid_len = match fixed_len(kind) {
        Some(len) => buf.len() == len,
        None => match kind {
            RequestKind::PropertyUser => buf.len() >= PROPERTY_USER_MIN_LEN,
            RequestKind::PropertyAdmin => buf.len() >= PROPERTY_ADMIN_MIN_LEN,
            _ => buf.len() >= LC_PROPERTY_MIN_LEN,
        },
    };
    if !valid_len {
        return Err(CodecError::InvalidParameter);
    }

    let mut r = WireReader::new(buf);
    let request = match kind {
        RequestKind::OnOff => Request::OnOff(r.u8()?),
        RequestKind::OnPowerUp => Request::OnPowerUp(r.u8()?),
        RequestKind::TransitionTime => Request::TransitionTime(r.u8()?),
        RequestKind::LcMode => Request::LcMode(r.u8()?),
        RequestKind::LcOccupancyMode => Request::LcOccupancyMode(r.u8()?),
        RequestKind::LcLightOnOff => Request::LcLightOnOff(r.u8()?),
        RequestKind::Level => Request::Level(r.i16()?),
        RequestKind::LevelDelta => Request::LevelDelta(r.i32()?),
        RequestKind::LevelMove => Request::LevelMove(r.i16()?),
        RequestKind::LevelHalt => Request::LevelHalt,
        RequestKind::PowerLevelActual => Request::PowerLevelActual(r.u16()?),
        RequestKind::PowerLevelDefault => Request::PowerLevelDefault(r.u16()?),
        RequestKind::PowerLevelRange => Request::PowerLevelRange(decode_range(&mut r)?),
        RequestKind::LocationGlobal => Request::LocationGlobal(decode_global_location(&mut r)?),
        RequestKind::LocationLocal => Request::LocationLocal(decode_local_location(&mut r)?),
        RequestKind::PropertyUser => {
            let id = r.u16()?;
            Request::PropertyUser {
                id,
                value: trailing_view(&r)?,
            }
        }
        RequestKind::PropertyAdmin => {
            let id = r.u16()?;
            let access = r.u8()?;
            Request::PropertyAdmin {
                id,
                access,
                value: trailing_view(&r)?,
            }
        }
        RequestKind::PropertyManufacturer => Request::PropertyManufacturer {
            id: r.u16()?,
            access: r.u8()?,
        },
        RequestKind::LightnessActual => Request::LightnessActual(r.u16()?),
        RequestKind::LightnessLinear => Request::LightnessLinear(r.u16()?),
        RequestKind::LightnessDefault => Request::LightnessDefault(r.u16()?),
        RequestKind::LightnessRange => Request::LightnessRange(decode_range(&mut r)?),
        RequestKind::Ctl => Request::Ctl(decode_ctl_triple(&mut r)?),
        RequestKind::CtlDefault => Request::CtlDefault(decode_ctl_triple(&mut r)?),
        RequestKind::CtlTemperature => Request::CtlTemperature(CtlTemperature {
            temperature: r.u16()?,
            delta_uv: r.i16()?,
        }),
        RequestKind::CtlTemperatureRange => Request::CtlTemperatureRange(decode_range(&mut r)?),
        RequestKind::Hsl => Request::Hsl(decode_hsl(&mut r)?),
        RequestKind::HslDefault => Request::HslDefault(decode_hsl(&mut r)?),
        RequestKind::HslHue => Request::HslHue(r.u16()?),
        RequestKind::HslSaturation => Request::HslSaturation(r.u16()?),
        RequestKind::HslRange => {
            let hue = decode_range(&mut r)?;
            let saturation = decode_range(&mut r)?;
            Request::HslRange(HslRange {
                hue_min: hue.min,
                hue_max: hue.max,
                saturation_min: saturation.min,
                saturation_max: saturation.max,
            })
        }
        RequestKind::LcPropertySet => {
            let id = r.u16()?;
            Request::LcPropertySet(LcProperty {
                id,
                value: trailing_view(&r)?,
            })
        }
    };
    Ok(request)
}
