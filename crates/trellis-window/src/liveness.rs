#![forbid(unsafe_code)]

//! Destruction tracking across re-entrant callbacks.

use std::cell::Cell;
use std::rc::Rc;

/// Shared flag that goes false once the window is destroyed.
///
/// Clones observe the same flag, so a dispatcher can hold one across a
/// callback and check afterwards whether the window is still usable.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    /// Returns `false` if already dead.
    pub(crate) fn kill(&self) -> bool {
        self.0.replace(false)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped increment of the processing depth.
///
/// A dead window's depth is never touched: not on entry, and not on drop
/// if the window died while the guard was held.
#[derive(Debug)]
pub(crate) struct ProcessingGuard<'a> {
    depth: &'a Cell<u32>,
    liveness: Liveness,
    entered: bool,
}

impl<'a> ProcessingGuard<'a> {
    pub(crate) fn enter(depth: &'a Cell<u32>, liveness: &Liveness) -> Self {
        let entered = liveness.is_alive();
        if entered {
            depth.set(depth.get().saturating_add(1));
        }
        Self {
            depth,
            liveness: liveness.clone(),
            entered,
        }
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if self.entered && self.liveness.is_alive() {
            self.depth.set(self.depth.get().saturating_sub(1));
        }
    }
}
