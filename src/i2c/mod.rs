// Licensed under the Apache-2.0 license

//! RP2350 I2C driver module.
//!
//! Byte-level controller and target roles for the two DesignWare I2C units,
//! built on the crate's register access layer so that they run unchanged on
//! MMIO and on the simulated bus.

pub mod common;
pub mod hardware_instantiation;
pub mod i2c_controller;
#[cfg(feature = "i2c_target")]
pub mod i2c_target;
pub mod registers;
#[cfg(feature = "i2c_target")]
pub mod round_trip;
pub mod system_setup;
pub mod traits;

pub use common::{Error, I2cConfig, I2cConfigBuilder, I2cSpeed};
pub use i2c_controller::I2cController;
#[cfg(feature = "i2c_target")]
pub use i2c_target::I2cTarget;
#[cfg(feature = "i2c_target")]
pub use traits::target::ByteTarget;
pub use traits::{ByteController, I2cHardwareCore};
