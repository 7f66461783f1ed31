//! Connection identifier value type.

use std::fmt;

use crate::error::QuicError;

/// Maximum connection ID length in bytes (RFC 9000, section 5.1).
pub const MAX_CID_LEN: usize = 20;

/// An opaque QUIC connection identifier.
///
/// Equality and hashing are structural: two ids with identical bytes are
/// interchangeable no matter which lifecycle event produced them. The
/// registry treats the value purely as a lookup key and imposes no
/// structure beyond the length bound; how ids are chosen and encoded is a
/// connection-layer concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(Vec<u8>);

impl ConnectionId {
    /// Create a connection id from raw bytes.
    ///
    /// Zero-length ids are valid (a peer may elect not to use ids at all);
    /// ids longer than [`MAX_CID_LEN`] are rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, QuicError> {
        let bytes = bytes.into();
        if bytes.len() > MAX_CID_LEN {
            return Err(QuicError::invalid_connection_id(bytes.len()));
        }
        Ok(Self(bytes))
    }

    /// The raw id bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the id in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the zero-length id.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_equality() {
        let a = ConnectionId::new([0xab, 0xcd]).unwrap();
        let b = ConnectionId::new(vec![0xab, 0xcd]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_length_id_is_valid() {
        let cid = ConnectionId::new([]).unwrap();
        assert!(cid.is_empty());
        assert_eq!(cid.to_string(), "");
    }

    #[test]
    fn test_max_length_enforced() {
        assert!(ConnectionId::new(vec![0u8; MAX_CID_LEN]).is_ok());
        let err = ConnectionId::new(vec![0u8; MAX_CID_LEN + 1]).unwrap_err();
        assert_eq!(err, QuicError::InvalidConnectionId { len: 21 });
    }

    #[test]
    fn test_display_is_hex() {
        let cid = ConnectionId::new([0x01, 0xfe, 0x20]).unwrap();
        assert_eq!(cid.to_string(), "01fe20");
    }
}
