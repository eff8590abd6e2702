// Licensed under the Apache-2.0 license

//! # I2C byte-level role traits
//!
//! The DesignWare unit can act as controller or as target, never both at
//! once. Each role is a trait on top of a common core so that code driving a
//! round trip does not care whether it talks to MMIO or to a simulated bus.
//!
//! ```text
//! I2cHardwareCore (enable / disable)
//!     ├── ByteController (one byte out, one byte back)
//!     └── target::ByteTarget (feature: i2c_target)
//! ```
//!
//! Every operation that polls hardware returns a `Result` so that a bounded
//! wait strategy can surface [`Error::Timeout`]. With the default spinning
//! strategy those calls block until the hardware answers.

use crate::i2c::common::Error;
use embedded_hal::i2c::SevenBitAddress;

/// Enable control shared by both roles.
///
/// Role and address registers only accept writes while the unit is
/// disabled. Implementations reconfigure through `disable`, then `enable`.
pub trait I2cHardwareCore {
    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool;
}

/// Bus initiator exchanging single bytes with one peripheral.
pub trait ByteController: I2cHardwareCore {
    /// Become controller for `address` at the configured speed, leaving the
    /// unit enabled whatever its previous state.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for addresses above 0x7F, before any
    /// register is touched.
    fn configure_as_controller(&mut self, address: SevenBitAddress) -> Result<(), Error>;

    /// Send `byte` followed by STOP.
    ///
    /// # Errors
    ///
    /// [`Error::TransmitAbort`] if the unit flagged an abort after queuing
    /// the byte. There is no retry.
    fn write_byte(&mut self, byte: u8) -> Result<(), Error>;

    /// Queue a one-byte read. The reply is collected later with
    /// [`Self::receive_requested_byte_from_memory`].
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if the transmit FIFO never drains.
    fn request_byte_from_memory(&mut self) -> Result<(), Error>;

    /// The requested reply, or `None` when no read was ever requested.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if the reply never arrives.
    fn receive_requested_byte_from_memory(&mut self) -> Result<Option<u8>, Error>;
}

/// Target (responder) side of the byte protocol.
#[cfg(feature = "i2c_target")]
pub mod target {
    use super::{Error, I2cHardwareCore, SevenBitAddress};

    pub trait ByteTarget: I2cHardwareCore {
        /// Answer to `address` at the configured speed, leaving the unit
        /// enabled whatever its previous state.
        ///
        /// # Errors
        ///
        /// [`Error::InvalidAddress`] for addresses above 0x7F.
        fn configure_as_target(&mut self, address: SevenBitAddress) -> Result<(), Error>;

        /// Take one byte written by the controller and remember it plus one,
        /// wrapping at 256.
        ///
        /// # Errors
        ///
        /// [`Error::Timeout`] if nothing arrives.
        fn receive_byte_to_memory(&mut self) -> Result<(), Error>;

        /// Wait for a read request and answer it with the remembered byte,
        /// or zero if nothing has been received yet.
        ///
        /// # Errors
        ///
        /// [`Error::Timeout`] if no read request shows up.
        fn serve_byte_from_memory(&mut self) -> Result<(), Error>;

        /// The byte the next read request will be answered with.
        fn memory_value(&self) -> Option<u8>;

        /// Address this target answers to, once configured.
        fn address(&self) -> Option<SevenBitAddress>;
    }
}
