//! Shared half of a control and weak handles to it
//!
//! The desired action is the only piece of control state written from
//! outside the tick loop, so it lives behind a lock in [`ControlShared`].
//! Everything else belongs to [`Control`](super::Control).

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use super::state::{Action, ControlMode, Request};

/// Desired action plus a counter bumped on every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Desired {
    pub request: Request,
    pub generation: u64,
}

/// Name and desired action of one control
#[derive(Debug)]
pub struct ControlShared {
    name: String,
    desired: Mutex<Desired>,
}

impl ControlShared {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            desired: Mutex::new(Desired::default()),
        }
    }

    /// Control name (lowercase)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request an action
    ///
    /// The control picks the request up on its next tick. Requests that
    /// arrive during cool-down are dropped.
    pub fn set_desired_action(&self, action: Action, mode: ControlMode, percent: u8) {
        let mut desired = self.lock();
        desired.request = Request::new(action, mode, percent);
        desired.generation = desired.generation.wrapping_add(1);
    }

    /// Request a stop
    pub fn stop(&self) {
        self.set_desired_action(Action::Stopped, ControlMode::Manual, 100);
    }

    /// Current desired request
    pub fn desired(&self) -> Request {
        self.lock().request
    }

    pub(crate) fn snapshot(&self) -> Desired {
        *self.lock()
    }

    /// Force the desired action to stopped without counting it as a request
    pub(crate) fn clear(&self) {
        self.lock().request = Request::stopped();
    }

    fn lock(&self) -> MutexGuard<'_, Desired> {
        // A poisoned lock still holds a plain Copy value
        self.desired.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Non-owning handle to a registered control
///
/// A handle outlives nothing: once the registry that owns the control is
/// dropped, [`upgrade`](ControlHandle::upgrade) returns `None`.
#[derive(Debug, Clone, Default)]
pub struct ControlHandle {
    shared: Weak<ControlShared>,
}

impl ControlHandle {
    pub(crate) fn new(shared: &Arc<ControlShared>) -> Self {
        Self {
            shared: Arc::downgrade(shared),
        }
    }

    /// Check if the control is still alive
    pub fn is_valid(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// Access the control, if it is still alive
    pub fn upgrade(&self) -> Option<Arc<ControlShared>> {
        self.shared.upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_bump_generation() {
        let shared = ControlShared::new("back".to_string());
        assert_eq!(shared.snapshot().generation, 0);

        shared.set_desired_action(Action::MovingUp, ControlMode::Timed, 40);
        let desired = shared.snapshot();
        assert_eq!(desired.generation, 1);
        assert_eq!(desired.request.action, Action::MovingUp);
        assert_eq!(desired.request.percent, 40);

        shared.stop();
        assert_eq!(shared.snapshot().generation, 2);
        assert_eq!(shared.desired().action, Action::Stopped);
    }

    #[test]
    fn test_clear_keeps_generation() {
        let shared = ControlShared::new("legs".to_string());
        shared.set_desired_action(Action::MovingDown, ControlMode::Manual, 100);
        shared.clear();

        assert_eq!(shared.desired(), Request::stopped());
        assert_eq!(shared.snapshot().generation, 1);
    }

    #[test]
    fn test_handle_goes_stale() {
        let shared = Arc::new(ControlShared::new("elev".to_string()));
        let handle = ControlHandle::new(&shared);
        assert!(handle.is_valid());
        assert_eq!(handle.upgrade().map(|c| c.name().to_string()), Some("elev".to_string()));

        drop(shared);
        assert!(!handle.is_valid());
        assert!(handle.upgrade().is_none());
    }

    #[test]
    fn test_default_handle_is_stale() {
        assert!(!ControlHandle::default().is_valid());
    }
}
