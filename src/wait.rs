// Licensed under the Apache-2.0 license

//! Busy-wait primitive.
//!
//! Drivers synchronise with hardware exclusively by polling a status
//! predicate. The polling strategy is injected so that firmware can block
//! forever (as real hardware requires) while test harnesses bound the wait.

use core::convert::Infallible;

/// The predicate did not become true within the allowed number of polls.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timeout;

/// Strategy for waiting on a hardware condition.
pub trait Wait {
    /// Poll `condition` until it returns `true`.
    ///
    /// # Errors
    ///
    /// Returns [`Timeout`] if the strategy gives up. [`Spin`] never does.
    fn wait_for<F: FnMut() -> bool>(&mut self, condition: F) -> Result<(), Timeout>;
}

impl<W: Wait + ?Sized> Wait for &mut W {
    fn wait_for<F: FnMut() -> bool>(&mut self, condition: F) -> Result<(), Timeout> {
        (**self).wait_for(condition)
    }
}

/// Spin until the condition holds, forever if need be.
///
/// A disconnected bus, a wrong address or a dead peripheral hangs the
/// caller. There is no cancellation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Spin;

impl Wait for Spin {
    fn wait_for<F: FnMut() -> bool>(&mut self, mut condition: F) -> Result<(), Timeout> {
        let mut poll = || -> nb::Result<(), Infallible> {
            if condition() {
                Ok(())
            } else {
                core::hint::spin_loop();
                Err(nb::Error::WouldBlock)
            }
        };

        nb::block!(poll()).map_err(|never| match never {})
    }
}

/// Give up after a fixed number of polls.
#[derive(Copy, Clone, Debug)]
pub struct Bounded {
    attempts: u32,
}

impl Bounded {
    /// The condition is evaluated at most `attempts` times, and at least once.
    #[must_use]
    pub const fn new(attempts: u32) -> Self {
        Self { attempts }
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Default for Bounded {
    fn default() -> Self {
        Self::new(1_000)
    }
}

impl Wait for Bounded {
    fn wait_for<F: FnMut() -> bool>(&mut self, mut condition: F) -> Result<(), Timeout> {
        for _ in 0..self.attempts.max(1) {
            if condition() {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(Timeout)
    }
}
