// Copyright (c) 2025 Steven Rosenthal smr@dt3.org
// See LICENSE file in root directory for license terms.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond tick counter supplied by the host. The count is
/// allowed to wrap; consumers take differences with `wrapping_sub()`.
pub trait TickSource {
    fn millis(&self) -> u32;
}

impl<T: TickSource + ?Sized> TickSource for &T {
    fn millis(&self) -> u32 {
        (**self).millis()
    }
}

/// Milliseconds since construction, from the host's monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTicks {
    start: Instant,
}

impl SystemTicks {
    pub fn new() -> Self {
        SystemTicks { start: Instant::now() }
    }
}

impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemTicks {
    fn millis(&self) -> u32 {
        // Truncation is the intended wraparound.
        self.start.elapsed().as_millis() as u32
    }
}

/// Tick counter advanced explicitly by its owner, e.g. a control loop that
/// already keeps its own device time.
#[derive(Debug, Default)]
pub struct ManualTicks {
    now: Cell<u32>,
}

impl ManualTicks {
    pub fn new(start: u32) -> Self {
        ManualTicks { now: Cell::new(start) }
    }

    pub fn set(&self, millis: u32) {
        self.now.set(millis);
    }

    pub fn advance(&self, millis: u32) {
        self.now.set(self.now.get().wrapping_add(millis));
    }
}

impl TickSource for ManualTicks {
    fn millis(&self) -> u32 {
        self.now.get()
    }
}

// mod tests.
