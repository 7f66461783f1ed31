//! Connection-ID registry for datagram routing.
//!
//! This module provides the thread-safe table that maps every connection id
//! a connection owns to that connection, enabling the dispatch layer to
//! route each inbound datagram to its owner.
//!
//! ```text
//! dispatch thread ----lookup(cid)----> ConnectionRegistry <----register/extend/
//!                                            |                 retire/teardown---- lifecycle driver
//!                                            v
//!                            DashMap<ConnectionId, Arc<dyn ServerConnection>>
//! ```
//!
//! A connection's footprint grows as it issues additional ids and shrinks
//! as ids are retired; teardown removes every id in one best-effort pass
//! and terminates the connection.

mod connection_registry;

pub use connection_registry::ConnectionRegistry;
