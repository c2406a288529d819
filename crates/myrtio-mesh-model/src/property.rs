/// Borrowed view of a variable-length value inside a caller-owned buffer
///
/// The view stores the whole source buffer plus an offset and length, so
/// it cannot outlive the buffer it was decoded from.
#[derive(Debug, Clone, Copy)]
pub struct PropertyValue<'a> {
    buffer: &'a [u8],
    offset: usize,
    len: usize,
}

impl<'a> PropertyValue<'a> {
    /// View `len` bytes of `buffer` starting at `offset`
    ///
    /// Returns `None` if the range does not fit in `buffer`.
    pub fn new(buffer: &'a [u8], offset: usize, len: usize) -> Option<Self> {
        let end = offset.checked_add(len)?;
        (end <= buffer.len()).then_some(Self {
            buffer,
            offset,
            len,
        })
    }

    /// View the whole slice
    pub const fn from_slice(bytes: &'a [u8]) -> Self {
        Self {
            buffer: bytes,
            offset: 0,
            len: bytes.len(),
        }
    }

    /// Empty view
    pub const fn empty() -> Self {
        Self::from_slice(&[])
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Underlying buffer the view points into
    pub const fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Viewed bytes
    pub fn bytes(&self) -> &'a [u8] {
        &self.buffer[self.offset..self.offset + self.len]
    }
}

/// Views compare by the bytes they expose, not by where they point.
impl PartialEq for PropertyValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes() == other.bytes()
    }
}

impl Eq for PropertyValue<'_> {}

impl Default for PropertyValue<'_> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_points_into_source_buffer() {
        let source = [1u8, 2, 3, 4, 5];
        let view = PropertyValue::new(&source, 2, 3).unwrap();

        assert_eq!(view.bytes(), &[3, 4, 5]);
        assert_eq!(view.offset(), 2);
        assert!(core::ptr::eq(view.buffer(), &source[..]));
    }

    #[test]
    fn out_of_range_view_is_rejected() {
        let source = [0u8; 4];
        assert!(PropertyValue::new(&source, 3, 2).is_none());
        assert!(PropertyValue::new(&source, usize::MAX, 2).is_none());
    }
}
