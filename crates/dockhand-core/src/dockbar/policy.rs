//! Per-bar behaviour, injected at construction instead of subclassing.

use std::sync::Arc;

use super::{DockBar, Edge};

/// Decides the size actually requested from the OS.
pub trait SizePolicy: Send {
    /// Returns the `(width, height)` to negotiate, in logical pixels.
    fn desired_size(&self, edge: Edge, width: i32, height: i32) -> (i32, i32);
}

/// Runs after a bar's window has been moved to a new rectangle.
///
/// Called with the coordinator lock held; it must not call back into the
/// coordinator.
pub trait PlacementEffect: Send {
    fn after_placement(&self, bar: &DockBar);
}

/// Handles window messages the coordinator does not understand.
///
/// Called after the coordinator lock is released, so a policy may call
/// back into the coordinator (e.g. to renegotiate its position).
pub trait MessagePolicy: Send + Sync {
    /// Returns `true` if the message was consumed.
    fn handle_message(&self, bar: &DockBar, msg: u32, wparam: usize, lparam: isize) -> bool;
}

/// Negotiates exactly the requested size.
pub struct RequestedSize;

impl SizePolicy for RequestedSize {
    fn desired_size(&self, _edge: Edge, width: i32, height: i32) -> (i32, i32) {
        (width, height)
    }
}

/// Does nothing after placement.
pub struct NoEffect;

impl PlacementEffect for NoEffect {
    fn after_placement(&self, _bar: &DockBar) {}
}

impl<F: Fn(&DockBar) + Send> PlacementEffect for F {
    fn after_placement(&self, bar: &DockBar) {
        self(bar)
    }
}

/// Consumes no messages.
pub struct IgnoreMessages;

impl MessagePolicy for IgnoreMessages {
    fn handle_message(&self, _bar: &DockBar, _msg: u32, _wparam: usize, _lparam: isize) -> bool {
        false
    }
}

/// The policy bundle that customises one dock bar.
pub struct DockBarPolicies {
    pub size: Box<dyn SizePolicy>,
    pub after_placement: Box<dyn PlacementEffect>,
    pub messages: Arc<dyn MessagePolicy>,
}

impl Default for DockBarPolicies {
    fn default() -> Self {
        Self {
            size: Box::new(RequestedSize),
            after_placement: Box::new(NoEffect),
            messages: Arc::new(IgnoreMessages),
        }
    }
}
