//! Surface-wide pointer listener registrations.
//!
//! A drag gesture listens to move/release on the whole timeline surface, not
//! just the event box. Registrations are owned handles: dropping or detaching
//! the handle unregisters it, so a torn-down session can never leave a live
//! listener behind.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    active: Vec<u64>,
}

/// The set of listeners currently attached to the timeline surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceListeners {
    registry: Rc<RefCell<Registry>>,
}

impl SurfaceListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a move/release listener pair and return its owning handle.
    pub fn attach(&self) -> ListenerHandle {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.active.push(id);
        log::debug!("Attached surface listeners #{}", id);

        ListenerHandle {
            id,
            registry: Rc::clone(&self.registry),
        }
    }

    /// Number of live listener registrations.
    pub fn attached_count(&self) -> usize {
        self.registry.borrow().active.len()
    }
}

/// Owned registration; unregisters on drop.
#[derive(Debug)]
pub struct ListenerHandle {
    id: u64,
    registry: Rc<RefCell<Registry>>,
}

impl ListenerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_attached(&self) -> bool {
        self.registry.borrow().active.contains(&self.id)
    }

    /// Unregister now instead of waiting for drop.
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let mut registry = self.registry.borrow_mut();
        let before = registry.active.len();
        registry.active.retain(|active| *active != self.id);
        if registry.active.len() != before {
            log::debug!("Detached surface listeners #{}", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_and_detach() {
        let listeners = SurfaceListeners::new();
        let handle = listeners.attach();
        assert!(handle.is_attached());
        assert_eq!(listeners.attached_count(), 1);

        handle.detach();
        assert_eq!(listeners.attached_count(), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let listeners = SurfaceListeners::new();
        {
            let _first = listeners.attach();
            let _second = listeners.attach();
            assert_eq!(listeners.attached_count(), 2);
        }
        assert_eq!(listeners.attached_count(), 0);
    }

    #[test]
    fn test_handles_have_distinct_ids() {
        let listeners = SurfaceListeners::new();
        let first = listeners.attach();
        let second = listeners.attach();
        assert_ne!(first.id(), second.id());

        drop(first);
        assert!(second.is_attached());
        assert_eq!(listeners.attached_count(), 1);
    }
}
