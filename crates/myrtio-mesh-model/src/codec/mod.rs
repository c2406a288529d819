//! Binary codec for generic states and requests
//!
//! Every encoder computes the exact payload length first and only writes
//! once the destination is known to fit, so a failed call leaves the
//! destination untouched.

mod request;
mod state;
mod wire;

use wire::WireWriter;

use crate::{
    error::CodecError,
    kind::{RequestKind, StateKind},
    request::Request,
    state::State,
};

/// Encoded length of a request
pub fn request_len(request: &Request<'_>) -> usize {
    request::encoded_len(request)
}

/// Encoded length of a state with an optional target
pub fn state_len(current: &State<'_>, target: Option<&State<'_>>) -> Result<usize, CodecError> {
    let current_len = state::encoded_len(current)?;
    match target {
        None => Ok(current_len),
        Some(target) => {
            if target.kind() != current.kind() || !state::has_target(current.kind()) {
                return Err(CodecError::InvalidParameter);
            }
            Ok(current_len + state::encoded_len(target)?)
        }
    }
}

/// Serialize a request into `buffer`, returning the number of bytes written
pub fn serialize_request(request: &Request<'_>, buffer: &mut [u8]) -> Result<usize, CodecError> {
    let len = request_len(request);
    let out = buffer.get_mut(..len).ok_or(CodecError::InvalidParameter)?;
    request::encode(&mut WireWriter::new(out), request)?;
    Ok(len)
}

/// Deserialize a request of the given kind
///
/// Property views in the result borrow from `buffer`.
pub fn deserialize_request(kind: RequestKind, buffer: &[u8]) -> Result<Request<'_>, CodecError> {
    request::decode(kind, buffer)
}

/// Serialize a state and its optional target into `buffer`
///
/// The target must have the same kind as `current` and the kind must
/// support targets. The remaining time is not part of the payload.
pub fn serialize_state(
    current: &State<'_>,
    target: Option<&State<'_>>,
    buffer: &mut [u8],
) -> Result<usize, CodecError> {
    let len = state_len(current, target)?;
    let out = buffer.get_mut(..len).ok_or(CodecError::InvalidParameter)?;
    let mut writer = WireWriter::new(out);
    state::encode(&mut writer, current)?;
    if let Some(target) = target {
        state::encode(&mut writer, target)?;
    }
    Ok(len)
}

/// Deserialize a state of the given kind
///
/// Whether a target is present is inferred from the buffer length alone.
pub fn deserialize_state(
    kind: StateKind,
    buffer: &[u8],
) -> Result<(State<'_>, Option<State<'_>>), CodecError> {
    if let Some(len) = state::fixed_len(kind) {
        if state::has_target(kind) && buffer.len() == len * 2 {
            let (current, target) = buffer.split_at(len);
            return Ok((state::decode(kind, current)?, Some(state::decode(kind, target)?)));
        }
    }
    Ok((state::decode(kind, buffer)?, None))
}
