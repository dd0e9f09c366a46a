//! Fixed-width, big-endian binary packing.
//!
//! Encodings are not self-describing: there are no tags and fixed-size
//! fields carry no length prefix. Both [`Writer`] and [`Reader`] latch the
//! first error they hit. Every later call becomes a no-op and the error is
//! surfaced once, through `err()`, at the end of a batch of operations.

use crate::address::{Address, ADDRESS_LEN};
use crate::error::CodecError;
use crate::id::{Id, ID_LEN};

/// Writer lifecycle. The only transition is `Writing -> Poisoned`.
#[derive(Clone, Debug, PartialEq, Eq)]
enum WriterState {
    Writing,
    Poisoned(CodecError),
}

/// Capacity-bounded byte writer.
#[derive(Clone, Debug)]
pub struct Writer {
    buf: Vec<u8>,
    limit: usize,
    state: WriterState,
}

impl Writer {
    /// Create a writer that refuses to grow past `limit` bytes.
    pub fn new(initial_capacity: usize, limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(initial_capacity.min(limit)),
            limit,
            state: WriterState::Writing,
        }
    }

    /// Checks that `n` more bytes fit, poisoning the writer if they don't.
    fn admit(&mut self, n: usize) -> bool {
        if self.is_poisoned() {
            return false;
        }
        let requested = self.buf.len().saturating_add(n);
        if requested > self.limit {
            self.state = WriterState::Poisoned(CodecError::CapacityExceeded {
                limit: self.limit,
                requested,
            });
            return false;
        }
        true
    }

    pub fn pack_byte(&mut self, value: u8) {
        if self.admit(1) {
            self.buf.push(value);
        }
    }

    pub fn pack_bool(&mut self, value: bool) {
        self.pack_byte(u8::from(value));
    }

    pub fn pack_u64(&mut self, value: u64) {
        self.pack_fixed_bytes(&value.to_be_bytes());
    }

    pub fn pack_i64(&mut self, value: i64) {
        self.pack_fixed_bytes(&value.to_be_bytes());
    }

    /// Writes `bytes` verbatim. The caller guarantees the length matches the
    /// field's declared size; no length is written.
    pub fn pack_fixed_bytes(&mut self, bytes: &[u8]) {
        if self.admit(bytes.len()) {
            self.buf.extend_from_slice(bytes);
        }
    }

    pub fn pack_id(&mut self, id: &Id) {
        self.pack_fixed_bytes(id.as_bytes());
    }

    pub fn pack_address(&mut self, address: &Address) {
        self.pack_fixed_bytes(address.as_bytes());
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_poisoned(&self) -> bool {
        matches!(self.state, WriterState::Poisoned(_))
    }

    /// Returns the latched error, if any.
    pub fn err(&self) -> Result<(), CodecError> {
        match &self.state {
            WriterState::Writing => Ok(()),
            WriterState::Poisoned(err) => Err(err.clone()),
        }
    }

    /// Bytes written before any error occurred.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the writer, returning its bytes or the latched error.
    pub fn into_bytes(self) -> Result<Vec<u8>, CodecError> {
        match self.state {
            WriterState::Writing => Ok(self.buf),
            WriterState::Poisoned(err) => Err(err),
        }
    }
}

/// Cursor over a byte slice, the dual of [`Writer`].
///
/// Reads past the end latch [`CodecError::InsufficientBytes`] and return
/// zeroed values from then on.
#[derive(Clone, Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
    err: Option<CodecError>,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: 0,
            err: None,
        }
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.err.is_some() {
            return None;
        }
        let remaining = self.remaining();
        if n > remaining {
            self.err = Some(CodecError::InsufficientBytes {
                needed: n,
                remaining,
            });
            return None;
        }
        let out = self.buf.get(self.offset..self.offset + n)?;
        self.offset += n;
        Some(out)
    }

    pub fn unpack_byte(&mut self) -> u8 {
        self.take(1)
            .and_then(|bytes| bytes.first().copied())
            .unwrap_or_default()
    }

    pub fn unpack_bool(&mut self) -> bool {
        match self.unpack_byte() {
            0 => false,
            1 => true,
            other => {
                self.fail(CodecError::InvalidBool(other));
                false
            }
        }
    }

    pub fn unpack_u64(&mut self) -> u64 {
        u64::from_be_bytes(self.unpack_fixed())
    }

    pub fn unpack_i64(&mut self) -> i64 {
        i64::from_be_bytes(self.unpack_fixed())
    }

    /// Reads exactly `N` bytes.
    pub fn unpack_fixed<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        if let Some(bytes) = self.take(N) {
            out.copy_from_slice(bytes);
        }
        out
    }

    /// Reads exactly `len` bytes into a new vector.
    pub fn unpack_fixed_vec(&mut self, len: usize) -> Vec<u8> {
        self.take(len).map(<[u8]>::to_vec).unwrap_or_default()
    }

    pub fn unpack_id(&mut self) -> Id {
        Id::new(self.unpack_fixed::<ID_LEN>())
    }

    pub fn unpack_address(&mut self) -> Address {
        Address::from_bytes(self.unpack_fixed::<ADDRESS_LEN>())
    }

    /// Latch an error raised by a caller-side check (e.g. an unknown type id).
    pub fn fail(&mut self, err: CodecError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn err(&self) -> Result<(), CodecError> {
        match &self.err {
            None => Ok(()),
            Some(err) => Err(err.clone()),
        }
    }

    /// Completes a decode: surfaces the latched error and rejects leftovers.
    pub fn finish(self) -> Result<(), CodecError> {
        self.err()?;
        match self.remaining() {
            0 => Ok(()),
            n => Err(CodecError::TrailingBytes(n)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian_fixed_widths() {
        let mut w = Writer::new(0, 64);
        w.pack_i64(1717111222000);
        w.pack_u64(10_000_000_000);
        w.pack_byte(0xab);
        assert_eq!(
            hex::encode(w.into_bytes().unwrap()),
            "0000018fcbcdeef000000002540be400ab"
        );
    }

    #[test]
    fn test_capacity_error_is_sticky() {
        let mut w = Writer::new(0, 9);
        w.pack_u64(1);
        w.pack_u64(2); // overflows
        assert!(w.is_poisoned());

        // A write that would fit is still ignored once poisoned.
        w.pack_byte(3);
        assert_eq!(w.len(), 8);

        let err = w.err().unwrap_err();
        assert!(err.is_capacity_exceeded());
        assert_eq!(
            err,
            CodecError::CapacityExceeded {
                limit: 9,
                requested: 16
            }
        );
        assert!(w.into_bytes().is_err());
    }

    #[test]
    fn test_write_exactly_at_limit() {
        let mut w = Writer::new(0, 8);
        w.pack_u64(u64::MAX);
        assert!(w.err().is_ok());
        assert_eq!(w.into_bytes().unwrap(), vec![0xff; 8]);
    }

    #[test]
    fn test_reader_underrun_is_sticky() {
        let bytes = [0u8, 0, 0, 0, 0, 0, 0, 7, 1, 2];
        let mut r = Reader::new(&bytes);
        assert_eq!(r.unpack_u64(), 7);
        assert_eq!(r.unpack_u64(), 0); // only 2 bytes left
        assert_eq!(
            r.err().unwrap_err(),
            CodecError::InsufficientBytes {
                needed: 8,
                remaining: 2
            }
        );
        // Later reads don't advance.
        assert_eq!(r.unpack_byte(), 0);
        assert_eq!(r.offset(), 8);
    }

    #[test]
    fn test_reader_rejects_trailing_bytes() {
        let mut r = Reader::new(&[1, 2, 3]);
        assert_eq!(r.unpack_byte(), 1);
        assert_eq!(r.finish().unwrap_err(), CodecError::TrailingBytes(2));
    }

    #[test]
    fn test_reader_bool() {
        let mut r = Reader::new(&[0, 1, 2]);
        assert!(!r.unpack_bool());
        assert!(r.unpack_bool());
        r.unpack_bool();
        assert_eq!(r.err().unwrap_err(), CodecError::InvalidBool(2));
    }

    #[test]
    fn test_first_error_wins() {
        let mut r = Reader::new(&[5]);
        r.unpack_bool();
        r.fail(CodecError::TrailingBytes(1));
        assert_eq!(r.err().unwrap_err(), CodecError::InvalidBool(5));
    }
}
