use std::ffi::{CString, c_char};

use crate::core::SendMessageReceipt;
use crate::errors::UdfError;

/// A complete result buffer owned by Rust until handed to the host.
///
/// The bytes are NUL terminated; [`OwnedBuffer::len`] excludes the
/// terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedBuffer(CString);

impl OwnedBuffer {
    /// # Errors
    ///
    /// Returns `Encode` if the payload contains an interior NUL byte.
    pub fn new(bytes: Vec<u8>) -> Result<Self, UdfError> {
        CString::new(bytes)
            .map(Self)
            .map_err(|e| UdfError::Encode(e.to_string()))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.as_bytes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transfers ownership out. The pointer must come back through
    /// [`OwnedBuffer::from_raw`] exactly once.
    #[must_use]
    pub fn into_raw(self) -> *mut c_char {
        self.0.into_raw()
    }

    /// # Safety
    ///
    /// `ptr` must have been produced by [`OwnedBuffer::into_raw`] and not
    /// reclaimed before.
    #[must_use]
    pub unsafe fn from_raw(ptr: *mut c_char) -> Self {
        Self(unsafe { CString::from_raw(ptr) })
    }
}

/// Serializes the send acknowledgement as JSON.
///
/// # Errors
///
/// Returns `Encode` if serialization fails.
pub fn encode_receipt(receipt: &SendMessageReceipt) -> Result<OwnedBuffer, UdfError> {
    let json = serde_json::to_vec(receipt).map_err(|e| UdfError::Encode(e.to_string()))?;
    OwnedBuffer::new(json)
}

/// Copies `message` into a fixed-capacity, NUL terminated diagnostic area.
/// Oversized messages are cut on a character boundary. Returns the number of
/// message bytes written.
pub fn write_diagnostic(area: &mut [u8], message: &str) -> usize {
    let Some(room) = area.len().checked_sub(1) else {
        return 0;
    };
    let mut end = message.len().min(room);
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    area[..end].copy_from_slice(&message.as_bytes()[..end]);
    area[end] = 0;
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_omits_absent_fields() {
        let receipt = SendMessageReceipt {
            message_id: Some("1".to_string()),
            ..Default::default()
        };
        let buf = encode_receipt(&receipt).unwrap();
        assert_eq!(buf.as_bytes(), br#"{"MessageId":"1"}"#);
        assert_eq!(buf.len(), 17);
    }

    #[test]
    fn test_raw_round_trip_keeps_terminator() {
        let buf = OwnedBuffer::new(b"abc".to_vec()).unwrap();
        let ptr = buf.into_raw();
        let terminator = unsafe { *ptr.add(3) };
        assert_eq!(terminator, 0);
        let back = unsafe { OwnedBuffer::from_raw(ptr) };
        assert_eq!(back.as_bytes(), b"abc");
    }

    #[test]
    fn test_interior_nul_is_encode_error() {
        assert!(matches!(
            OwnedBuffer::new(b"a\0b".to_vec()),
            Err(UdfError::Encode(_))
        ));
    }

    #[test]
    fn test_diagnostic_fits() {
        let mut area = [0xAAu8; 16];
        let written = write_diagnostic(&mut area, "too few");
        assert_eq!(written, 7);
        assert_eq!(&area[..8], b"too few\0");
    }

    #[test]
    fn test_diagnostic_truncates_to_capacity() {
        let mut area = [0xAAu8; 8];
        let written = write_diagnostic(&mut area, "a much longer message");
        assert_eq!(written, 7);
        assert_eq!(&area, b"a much \0");
    }

    #[test]
    fn test_diagnostic_truncates_on_char_boundary() {
        let mut area = [0xAAu8; 4];
        // "é" is two bytes wide.
        let written = write_diagnostic(&mut area, "aéé");
        assert_eq!(written, 3);
        assert_eq!(&area[..3], "aé".as_bytes());
        assert_eq!(area[3], 0);

        let mut small = [0xAAu8; 3];
        let written = write_diagnostic(&mut small, "aéé");
        assert_eq!(written, 1);
        assert_eq!(&small[..2], b"a\0");
    }

    #[test]
    fn test_diagnostic_zero_capacity_writes_nothing() {
        let mut area: [u8; 0] = [];
        assert_eq!(write_diagnostic(&mut area, "x"), 0);
    }
}
