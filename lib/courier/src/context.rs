//! Execution context guards for blocking calls.
//!
//! A blocking call parks the calling thread until the response arrives. On a
//! thread that drives an event loop (a runtime's `block_on`, a UI thread) that
//! would stall everything else scheduled there, so
//! [`RemoteService::execute_blocking`] asks a [`ContextGuard`] first and
//! refuses with
//! [`ProgrammingError::WrongContext`](courier_core::ProgrammingError::WrongContext).
//!
//! Threads of tokio's blocking pool (`spawn_blocking`) may block.
//!
//! [`RemoteService::execute_blocking`]: crate::RemoteService::execute_blocking

use std::thread::{self, ThreadId};

/// Decides whether the current thread may block.
pub trait ContextGuard: Send + Sync + 'static {
    /// Returns `true` if the current thread must not block.
    fn is_reserved(&self) -> bool;
}

/// Reserves the thread driving a tokio runtime's root future.
///
/// That is the thread inside `Runtime::block_on`, `#[tokio::main]` or
/// `#[tokio::test]`. Code running as a tokio task, including closures passed
/// to `spawn_blocking`, carries a task id and is not reserved. Tokio does not
/// tell a worker running an async task apart from a blocking-pool thread, so
/// applications that must also keep blocking calls out of async tasks reserve
/// those threads explicitly with [`ReservedThread`] or their own guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncRuntimeGuard;

impl ContextGuard for AsyncRuntimeGuard {
    fn is_reserved(&self) -> bool {
        tokio::runtime::Handle::try_current().is_ok() && tokio::task::try_id().is_none()
    }
}

/// Reserves one specific thread, typically a UI or event loop thread.
///
/// Threads reserved by [`AsyncRuntimeGuard`] stay reserved as well.
#[derive(Debug, Clone, Copy)]
pub struct ReservedThread {
    id: ThreadId,
}

impl ReservedThread {
    /// Reserve the calling thread.
    #[must_use]
    pub fn current() -> Self {
        Self {
            id: thread::current().id(),
        }
    }

    /// Reserve the thread with this id.
    #[must_use]
    pub const fn new(id: ThreadId) -> Self {
        Self { id }
    }
}

impl ContextGuard for ReservedThread {
    fn is_reserved(&self) -> bool {
        thread::current().id() == self.id || AsyncRuntimeGuard.is_reserved()
    }
}

/// Never reserves a thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrestricted;

impl ContextGuard for Unrestricted {
    fn is_reserved(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_thread_is_free() {
        assert!(!AsyncRuntimeGuard.is_reserved());
    }

    #[tokio::test]
    async fn runtime_thread_is_reserved() {
        assert!(AsyncRuntimeGuard.is_reserved());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn blocking_pool_thread_is_free() {
        let reserved = tokio::task::spawn_blocking(|| AsyncRuntimeGuard.is_reserved())
            .await
            .expect("blocking task panicked");
        assert!(!reserved);
    }

    #[test]
    fn reserved_thread_only_matches_itself() {
        let guard = ReservedThread::current();
        assert!(guard.is_reserved());

        let elsewhere = thread::spawn(move || guard.is_reserved())
            .join()
            .expect("thread panicked");
        assert!(!elsewhere);
    }

    #[test]
    fn unrestricted_never_reserves() {
        assert!(!Unrestricted.is_reserved());
    }
}
