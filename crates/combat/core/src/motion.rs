//! Ground-contact capability.
//!
//! The motion collaborator owns landing detection; the core only depends on
//! this interface. Contacts are latched and consumed on the next frame step so
//! they land in the same deterministic per-frame order as everything else.

use std::cell::Cell;
use std::rc::Rc;

pub type GroundContactListener = Box<dyn FnMut()>;

/// Implemented by whatever integrates movement for the controlled entity.
pub trait GroundContact {
    /// Registers `listener` to be invoked every time the body touches ground.
    fn on_ground_contact(&mut self, listener: GroundContactListener);
}

/// Single-slot landing flag shared between a listener and the state machine.
#[derive(Clone, Debug, Default)]
pub struct LandingLatch(Rc<Cell<bool>>);

impl LandingLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) {
        self.0.set(true);
    }

    /// Returns whether a contact was signaled since the last call, clearing it.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Listener that signals this latch.
    pub fn listener(&self) -> GroundContactListener {
        let latch = self.clone();
        Box::new(move || latch.signal())
    }
}
