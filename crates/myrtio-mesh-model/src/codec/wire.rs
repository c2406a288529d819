//! Little-endian cursors over wire buffers

use crate::error::CodecError;

/// Largest value of a 24-bit wire field
pub(crate) const U24_MAX: u32 = 0x00FF_FFFF;

/// Write cursor over a buffer already checked to fit the payload
pub(crate) struct WireWriter<'b> {
    buf: &'b mut [u8],
    pos: usize,
}

impl<'b> WireWriter<'b> {
    pub(crate) fn new(buf: &'b mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn bytes(&mut self, data: &[u8]) -> Result<(), CodecError> {
        let end = self.pos + data.len();
        let dst = self
            .buf
            .get_mut(self.pos..end)
            .ok_or(CodecError::InvalidParameter)?;
        dst.copy_from_slice(data);
        self.pos = end;
        Ok(())
    }

    pub(crate) fn u8(&mut self, value: u8) -> Result<(), CodecError> {
        self.bytes(&[value])
    }

    pub(crate) fn u16(&mut self, value: u16) -> Result<(), CodecError> {
        self.bytes(&value.to_le_bytes())
    }

    pub(crate) fn i16(&mut self, value: i16) -> Result<(), CodecError> {
        self.bytes(&value.to_le_bytes())
    }

    pub(crate) fn u24(&mut self, value: u32) -> Result<(), CodecError> {
        if value > U24_MAX {
            return Err(CodecError::InvalidParameter);
        }
        self.bytes(&value.to_le_bytes()[..3])
    }

    pub(crate) fn i32(&mut self, value: i32) -> Result<(), CodecError> {
        self.bytes(&value.to_le_bytes())
    }
}

/// Read cursor over a buffer already checked to hold the payload
pub(crate) struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let end = self.pos + N;
        let bytes = self
            .buf
            .get(self.pos..end)
            .and_then(|slice| <[u8; N]>::try_from(slice).ok())
            .ok_or(CodecError::InvalidParameter)?;
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, CodecError> {
        self.take::<1>().map(|[b]| b)
    }

    pub(crate) fn u16(&mut self) -> Result<u16, CodecError> {
        self.take().map(u16::from_le_bytes)
    }

    pub(crate) fn i16(&mut self) -> Result<i16, CodecError> {
        self.take().map(i16::from_le_bytes)
    }

    pub(crate) fn u24(&mut self) -> Result<u32, CodecError> {
        self.take::<3>().map(|[a, b, c]| u32::from_le_bytes([a, b, c, 0]))
    }

    pub(crate) fn i32(&mut self) -> Result<i32, CodecError> {
        self.take().map(i32::from_le_bytes)
    }
}
