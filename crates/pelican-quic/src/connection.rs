//! Connection handle trait consumed by the registry.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cid::ConnectionId;

/// The capability surface a server connection exposes to the registry.
///
/// The concrete connection state machine (handshake, flow control, streams)
/// lives outside this crate; the registry only needs enough of it to route
/// datagrams and to drive teardown. Implementations must be safe to call
/// from the datagram dispatch thread and the lifecycle driver concurrently.
///
/// The `Display` supertrait provides the connection's display identity,
/// used to order the diagnostic table dump.
pub trait ServerConnection: fmt::Display + Send + Sync {
    /// The ordered set of connection ids currently routable to this
    /// connection. Non-empty while the connection is live.
    fn active_connection_ids(&self) -> Vec<ConnectionId>;

    /// The connection id the client first used to address this connection.
    ///
    /// May have been replaced during establishment, so it is not
    /// necessarily a member of [`active_connection_ids`](Self::active_connection_ids).
    fn original_destination_connection_id(&self) -> ConnectionId;

    /// Whether the connection has entered its terminal state.
    fn is_closed(&self) -> bool;

    /// Release the connection's resources.
    ///
    /// The registry invokes this exactly once per teardown, but the
    /// implementation must tolerate defensive extra calls from other paths
    /// without corrupting state.
    fn terminate(&self);

    /// Stable numeric identity for this connection object.
    ///
    /// Used where the registry needs "is this the same connection" rather
    /// than key equality (teardown consistency check, conditional
    /// deregister). Obtain one from [`next_stable_id`] at construction;
    /// the value must never change for the lifetime of the connection.
    fn stable_id(&self) -> u64;
}

static STABLE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-wide unique stable id for a new connection.
pub fn next_stable_id() -> u64 {
    STABLE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_ids_are_unique_and_nonzero() {
        let a = next_stable_id();
        let b = next_stable_id();
        assert_ne!(a, 0);
        assert_ne!(a, b);
    }
}
