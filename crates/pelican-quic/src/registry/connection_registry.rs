//! Connection Registry implementation.
//!
//! Tracks live server connections by every connection id they own, for
//! per-datagram routing and multi-id teardown.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, instrument};

use crate::cid::ConnectionId;
use crate::connection::ServerConnection;
use crate::diagnostics::{DiagnosticLevel, DiagnosticSink};

/// Registry mapping connection ids to live connections.
///
/// Thread-safe table from [`ConnectionId`] to [`ServerConnection`] handle.
/// Uses DashMap for linearizable per-key operations without a global lock:
/// the dispatch path calls [`lookup`](Self::lookup) once per inbound
/// datagram and must not contend with lifecycle writers touching unrelated
/// ids.
///
/// A connection owns several ids at once during id rotation and migration.
/// All of them map to the same handle (and are removed together by
/// [`teardown`](Self::teardown)); ids are unique among currently registered
/// entries but may be reused after a connection is fully gone.
///
/// No operation here returns an error or panics on misuse. Anomalies such
/// as stale removals, extensions from unknown ids, or ownership mismatches
/// at teardown degrade to reports on the injected [`DiagnosticSink`] and
/// the registry keeps serving.
///
/// ## Usage
///
/// ```ignore
/// let registry = ConnectionRegistry::default();
///
/// // Handshake accepted:
/// registry.register(Arc::clone(&connection), initial_cid);
///
/// // Connection issues an additional id:
/// registry.extend(&initial_cid, new_cid);
///
/// // Routing an inbound datagram:
/// if let Some(connection) = registry.lookup(&dcid) { /* dispatch */ }
///
/// // Connection fully closed:
/// registry.teardown(&connection);
/// ```
pub struct ConnectionRegistry {
    /// Map of connection id to the owning connection
    connections: DashMap<ConnectionId, Arc<dyn ServerConnection>>,
    /// Sink for anomaly reports; never consulted for control flow
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl ConnectionRegistry {
    /// Create a new registry reporting anomalies to the given sink.
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        info!("Creating connection registry");
        Self {
            connections: DashMap::new(),
            diagnostics,
        }
    }

    /// Register a connection under an id.
    ///
    /// Inserts unconditionally. If the id is already bound to a different
    /// connection the old binding is silently replaced; two live
    /// connections should never share an id, and the permissive overwrite
    /// is the contract callers rely on today.
    #[instrument(skip(self, connection), fields(cid = %cid, conn = %connection))]
    pub fn register(&self, connection: Arc<dyn ServerConnection>, cid: ConnectionId) {
        let existing = self.connections.insert(cid, connection);
        if existing.is_some() {
            debug!("Replaced existing registration");
        } else {
            debug!("Registered new connection id");
        }
    }

    /// Map an additional id to the connection currently registered under
    /// `existing`.
    ///
    /// If `existing` is not registered (it was concurrently retired, or the
    /// connection already tore down) nothing is inserted: the issuance
    /// request lost the race and loses gracefully, with a diagnostic.
    #[instrument(skip(self), fields(existing = %existing, new_cid = %new_cid))]
    pub fn extend(&self, existing: &ConnectionId, new_cid: ConnectionId) {
        // Clone the handle out rather than holding the shard guard across
        // the insert; the two point operations need not be atomic together.
        let connection = self.connections.get(existing).map(|e| Arc::clone(e.value()));
        match connection {
            Some(connection) => {
                self.connections.insert(new_cid, connection);
                debug!("Registered additional connection id");
            }
            None => {
                self.diagnostics.report(
                    DiagnosticLevel::Error,
                    &format!("cannot add additional cid {new_cid} to unknown connection id {existing}"),
                );
            }
        }
    }

    /// Remove an id regardless of which connection it points to.
    ///
    /// Used when a single id is retired (e.g. the peer signalled it will
    /// stop using it) without affecting the connection's other ids.
    #[instrument(skip(self), fields(cid = %cid))]
    pub fn retire(&self, cid: &ConnectionId) {
        if self.connections.remove(cid).is_some() {
            debug!("Retired connection id");
        } else {
            debug!("Connection id was not registered");
        }
    }

    /// Remove an id only if it currently maps to `connection`.
    ///
    /// A compare-and-remove: when the mapping is absent or owned by a
    /// different connection the table is left as-is and the discrepancy is
    /// reported. The registry cannot tell a benign race from stale caller
    /// bookkeeping, so it logs rather than aborts either way.
    #[instrument(skip(self, connection), fields(cid = %cid, conn = %connection))]
    pub fn deregister(&self, connection: &dyn ServerConnection, cid: &ConnectionId) {
        let removed = self
            .connections
            .remove_if(cid, |_, owner| owner.stable_id() == connection.stable_id());
        if removed.is_some() {
            debug!("Deregistered connection id");
            return;
        }
        match self.connections.get(cid) {
            Some(owner) => {
                let owner = owner.value();
                self.diagnostics.report(
                    DiagnosticLevel::Error,
                    &format!(
                        "connection {connection} not removed, because {owner} is registered for {cid}"
                    ),
                );
            }
            None => {
                self.diagnostics.report(
                    DiagnosticLevel::Warning,
                    &format!("connection {connection} not removed, no registration for {cid}"),
                );
            }
        }
    }

    /// Find the connection registered under an id.
    ///
    /// Non-mutating; the hottest path, invoked once per inbound datagram.
    /// Safe under arbitrary concurrent registration and teardown, but a
    /// returned handle may already be mid-teardown: callers must tolerate
    /// the handle rejecting further work.
    pub fn lookup(&self, cid: &ConnectionId) -> Option<Arc<dyn ServerConnection>> {
        self.connections.get(cid).map(|e| Arc::clone(e.value()))
    }

    /// Remove every id belonging to a connection and terminate it.
    ///
    /// Each removal is an independent linearizable point operation; the
    /// pass as a whole is best-effort, not transactional. All prior values
    /// are checked against the first id's owner, and a mismatch is
    /// reported as a correctness-violation signal (it means the
    /// connection's active-id set overlapped another connection's ids).
    /// The original destination id is removed as well, whether or not it
    /// is still in the active set. `terminate` is invoked exactly once.
    #[instrument(skip(self, connection), fields(conn = %connection))]
    pub fn teardown(&self, connection: &dyn ServerConnection) {
        let mut removed: Option<Arc<dyn ServerConnection>> = None;
        for cid in connection.active_connection_ids() {
            match &removed {
                None => {
                    removed = self.connections.remove(&cid).map(|(_, conn)| conn);
                    if removed.is_none() {
                        self.diagnostics.report(
                            DiagnosticLevel::Error,
                            &format!("cannot remove connection with cid {cid}"),
                        );
                    }
                }
                Some(first) => {
                    let prior = self.connections.remove(&cid).map(|(_, conn)| conn);
                    if prior.map(|conn| conn.stable_id()) != Some(first.stable_id()) {
                        self.diagnostics.report(
                            DiagnosticLevel::Error,
                            "removed connections for set of active cids are not identical",
                        );
                    }
                }
            }
        }
        let odcid = connection.original_destination_connection_id();
        self.connections.remove(&odcid);

        // Fall back to the caller's handle if the first removal failed, so
        // the connection is still terminated.
        let observed: &dyn ServerConnection = removed.as_deref().unwrap_or(connection);
        if !observed.is_closed() {
            self.diagnostics.report(
                DiagnosticLevel::Error,
                &format!("removed connection with dcid {odcid} that is not closed"),
            );
        }
        observed.terminate();
        debug!("Connection torn down");
    }

    /// Check if an id is currently registered.
    pub fn is_registered(&self, cid: &ConnectionId) -> bool {
        self.connections.contains_key(cid)
    }

    /// Number of registered ids (not connections; one connection may own
    /// several).
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Render the whole table for operational inspection.
    ///
    /// One `cid -> connection` line per entry, ordered by the connection's
    /// display identity and then by id. Best-effort snapshot: entries may
    /// be stale relative to concurrent mutation. Never on a correctness
    /// path.
    pub fn dump(&self) -> String {
        let mut entries: Vec<(String, String)> = self
            .connections
            .iter()
            .map(|e| (e.value().to_string(), e.key().to_string()))
            .collect();
        entries.sort();
        entries
            .into_iter()
            .map(|(conn, cid)| format!("{cid} -> {conn}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(Arc::new(crate::diagnostics::TracingSink))
    }
}

impl fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connection_count", &self.connections.len())
            .finish()
    }
}
