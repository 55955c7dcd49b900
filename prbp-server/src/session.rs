//! Session management.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use uuid::Uuid;

/// Session state.
///
/// A session has exactly two states. It starts awaiting commands and
/// moves to `Terminated` once, either by a QUIT exchange or by the
/// connection ending; there is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Ready for the next command.
    AwaitingCommand,
    /// Session is over; remaining input is ignored.
    Terminated,
}

/// A client session.
pub struct Session {
    /// Unique session ID.
    pub id: String,

    /// Remote address.
    pub remote_addr: SocketAddr,

    /// Session state.
    state: SessionState,

    /// Request counter.
    request_count: AtomicU64,

    /// Session creation time.
    created_at: Instant,
}

impl Session {
    /// Creates a new session.
    pub fn new(remote_addr: SocketAddr) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            remote_addr,
            state: SessionState::AwaitingCommand,
            request_count: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    /// Returns the session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Moves the session to its terminal state.
    pub fn terminate(&mut self) {
        self.state = SessionState::Terminated;
    }

    /// Returns whether the session has ended.
    pub fn is_terminated(&self) -> bool {
        self.state == SessionState::Terminated
    }

    /// Records a request.
    pub fn record_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the request count.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Returns the session age.
    pub fn age(&self) -> std::time::Duration {
        self.created_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn test_addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 12345)
    }

    #[test]
    fn test_session_creation() {
        let session = Session::new(test_addr());
        assert_eq!(session.state(), SessionState::AwaitingCommand);
        assert!(!session.is_terminated());
        assert_eq!(session.request_count(), 0);
    }

    #[test]
    fn test_session_terminate() {
        let mut session = Session::new(test_addr());
        session.terminate();
        assert_eq!(session.state(), SessionState::Terminated);
        assert!(session.is_terminated());

        // Terminated is absorbing
        session.terminate();
        assert!(session.is_terminated());
    }

    #[test]
    fn test_request_counting() {
        let session = Session::new(test_addr());
        session.record_request();
        session.record_request();
        assert_eq!(session.request_count(), 2);
    }

    #[test]
    fn test_session_ids_unique() {
        let a = Session::new(test_addr());
        let b = Session::new(test_addr());
        assert_ne!(a.id, b.id);
    }
}
