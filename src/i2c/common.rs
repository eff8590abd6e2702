// Licensed under the Apache-2.0 license

//! Common types for the I2C driver modules.
//!
//! This module provides shared definitions for error handling, bus speed and
//! bus configuration used by both the controller and the target role.

use crate::i2c::registers::{SPEED_FAST, SPEED_STANDARD};
use crate::wait::Timeout;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource, SevenBitAddress};
use fugit::HertzU32;

/// Address the demo controller and target agree on.
pub const DEFAULT_ADDRESS: SevenBitAddress = 0x42;

/// Largest 7-bit bus address.
pub const MAX_ADDRESS: SevenBitAddress = 0x7f;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The unit aborted the transfer (typically no ACK). The abort source
    /// is logged and cleared, not reported.
    TransmitAbort,
    /// A bounded wait strategy gave up.
    Timeout,
    /// Address does not fit in 7 bits.
    InvalidAddress(SevenBitAddress),
    /// A reply was expected but no read had been requested.
    NothingRequested,
    /// A round trip completed with a reply other than the one expected.
    UnexpectedReply { expected: u8, received: u8 },
}

impl From<Timeout> for Error {
    fn from(_: Timeout) -> Self {
        Self::Timeout
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::TransmitAbort => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            _ => ErrorKind::Other,
        }
    }
}

/// Reject anything that is not a 7-bit address.
///
/// # Errors
///
/// [`Error::InvalidAddress`] above [`MAX_ADDRESS`].
pub fn check_address(address: SevenBitAddress) -> Result<SevenBitAddress, Error> {
    if address > MAX_ADDRESS {
        Err(Error::InvalidAddress(address))
    } else {
        Ok(address)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum I2cSpeed {
    Standard,
    Fast,
    FastPlus,
}

impl I2cSpeed {
    #[must_use]
    pub const fn rate(self) -> HertzU32 {
        match self {
            Self::Standard => HertzU32::kHz(100),
            Self::Fast => HertzU32::kHz(400),
            Self::FastPlus => HertzU32::MHz(1),
        }
    }

    /// IC_CON.SPEED encoding. Fast-mode plus shares the fast-mode setting
    /// and differs only in SCL counts.
    #[must_use]
    pub(crate) const fn con_speed(self) -> u32 {
        match self {
            Self::Standard => SPEED_STANDARD,
            Self::Fast | Self::FastPlus => SPEED_FAST,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct I2cConfig {
    pub address: SevenBitAddress,
    pub speed: I2cSpeed,
    /// Enable the pad pull-ups on SDA and SCL. Leave off when the board
    /// carries external pull-ups.
    pub internal_pull_up: bool,
}

impl Default for I2cConfig {
    fn default() -> Self {
        I2cConfigBuilder::new().build()
    }
}

pub struct I2cConfigBuilder {
    address: SevenBitAddress,
    speed: I2cSpeed,
    internal_pull_up: bool,
}

impl Default for I2cConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl I2cConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            speed: I2cSpeed::Fast,
            internal_pull_up: false,
        }
    }
    #[must_use]
    pub fn address(mut self, address: SevenBitAddress) -> Self {
        self.address = address;
        self
    }
    #[must_use]
    pub fn speed(mut self, speed: I2cSpeed) -> Self {
        self.speed = speed;
        self
    }
    #[must_use]
    pub fn internal_pull_up(mut self, enabled: bool) -> Self {
        self.internal_pull_up = enabled;
        self
    }
    #[must_use]
    pub fn build(self) -> I2cConfig {
        I2cConfig {
            address: self.address,
            speed: self.speed,
            internal_pull_up: self.internal_pull_up,
        }
    }
}
