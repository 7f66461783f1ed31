//! # pelican-quic
//!
//! Server-side connection-ID plumbing for a QUIC-carried transport.
//!
//! QUIC addresses a connection by opaque connection identifiers (CIDs)
//! carried inside every datagram, not by the socket 4-tuple. A server must
//! therefore keep a routing table from CID to live connection, where one
//! connection may own several CIDs at once (ID rotation, migration). This
//! crate implements that table and the lifecycle operations around it:
//!
//! - **Registry**: concurrent CID-to-connection map with register, extend,
//!   retire, conditional deregister, lookup and multi-key teardown
//! - **ConnectionId**: the opaque, bounded-length lookup key
//! - **ServerConnection**: the capability trait the connection layer
//!   implements so the registry can drive teardown
//! - **Diagnostics**: an injected sink for anomaly reporting, so the
//!   registry never aborts a caller on internal inconsistency
//!
//! Datagram receipt, header parsing, the per-connection state machine and
//! crypto all live elsewhere; the dispatch layer calls [`ConnectionRegistry::lookup`]
//! once per inbound datagram and the lifecycle driver calls the mutating
//! operations as connection state evolves.

pub mod connection;
pub mod diagnostics;
pub mod registry;

mod cid;
mod error;

pub use cid::{ConnectionId, MAX_CID_LEN};
pub use connection::{next_stable_id, ServerConnection};
pub use diagnostics::{DiagnosticLevel, DiagnosticSink, NoopSink, TracingSink};
pub use error::QuicError;
pub use registry::ConnectionRegistry;
