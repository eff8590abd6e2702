// Licensed under the Apache-2.0 license

// Enforce Copilot coding guidelines - prevent panic-prone patterns in production code only
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]
pub mod common;
pub mod gpio;
pub mod i2c;
pub mod pinctrl;
pub mod regs;
#[cfg(any(test, feature = "sim"))]
pub mod sim;
pub mod syscon;
pub mod tests;
pub mod wait;
