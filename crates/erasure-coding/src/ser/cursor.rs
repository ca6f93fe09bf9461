use super::error::{SerError, SerKind, SerResult};

/// Cursor over a byte slice. Every read names the structure and field it
/// belongs to so that failures point at the offending part of the input.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
    kind: SerKind,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8], kind: SerKind) -> Self {
        Self {
            bytes,
            offset: 0,
            kind,
        }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Reads exactly `len` bytes without copying.
    pub fn read_exact(&mut self, len: usize, field: &'static str) -> SerResult<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .ok_or_else(|| SerError::invalid_length(self.kind, field))?;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or_else(|| SerError::unexpected_end(self.kind, field))?;
        self.offset = end;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> SerResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N, field)?);
        Ok(out)
    }

    /// Big-endian `u32`.
    pub fn read_u32(&mut self, field: &'static str) -> SerResult<u32> {
        self.read_array::<4>(field).map(u32::from_be_bytes)
    }

    /// Fails when unread bytes remain.
    pub fn finish(&self) -> SerResult<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(SerError::trailing_bytes(self.kind, self.offset, remaining)),
        }
    }
}

/// Appends `value` as a big-endian `u32`, failing if it does not fit.
pub(crate) fn write_len(
    out: &mut Vec<u8>,
    value: usize,
    kind: SerKind,
    field: &'static str,
) -> SerResult<()> {
    let value = u32::try_from(value).map_err(|_| SerError::invalid_length(kind, field))?;
    out.extend_from_slice(&value.to_be_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_in_order() {
        let bytes = [0, 0, 0, 7, 1, 2, 3];
        let mut reader = ByteReader::new(&bytes, SerKind::FrameCoeffs);
        assert_eq!(reader.read_u32("count").unwrap(), 7);
        assert_eq!(reader.read_exact(2, "body").unwrap(), &[1, 2]);
        assert_eq!(reader.position(), 6);
        assert_eq!(reader.remaining(), 1);
        assert_eq!(
            reader.finish().unwrap_err(),
            SerError::trailing_bytes(SerKind::FrameCoeffs, 6, 1)
        );
    }

    #[test]
    fn test_short_read_does_not_advance() {
        let bytes = [0, 1];
        let mut reader = ByteReader::new(&bytes, SerKind::Bundle);
        let err = reader.read_u32("count").unwrap_err();
        assert_eq!(err, SerError::unexpected_end(SerKind::Bundle, "count"));
        assert_eq!(reader.position(), 0);
        assert!(!reader.is_empty());
    }

    #[test]
    fn test_write_len_rejects_overflow() {
        let mut out = vec![];
        write_len(&mut out, 3, SerKind::ProofSlice, "count").unwrap();
        assert_eq!(out, [0, 0, 0, 3]);
        #[cfg(target_pointer_width = "64")]
        assert!(write_len(&mut out, u32::MAX as usize + 1, SerKind::ProofSlice, "count").is_err());
    }
}
