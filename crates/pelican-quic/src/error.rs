//! Error types for the QUIC transport library.

use thiserror::Error;

use crate::cid::MAX_CID_LEN;

/// QUIC transport errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuicError {
    /// Connection ID longer than the protocol allows
    #[error("connection id of {len} bytes exceeds the maximum of {MAX_CID_LEN}")]
    InvalidConnectionId {
        /// Length of the rejected id
        len: usize,
    },
}

impl QuicError {
    /// Create a new invalid-connection-id error.
    pub fn invalid_connection_id(len: usize) -> Self {
        Self::InvalidConnectionId { len }
    }
}
