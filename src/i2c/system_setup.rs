// Licensed under the Apache-2.0 license

//! I2C System Setup Helper
//!
//! Brings the blocks an I2C bus depends on out of reset: the pad and pin-mux
//! banks and both I2C units. Kept apart from the drivers so that they never
//! touch the RESETS block themselves.

use crate::i2c::common::Error;
use crate::i2c::hardware_instantiation::I2cInstance;
use crate::regs::RegisterBlock;
use crate::syscon::{mask_of, ResetId, SysCon};
use crate::wait::Wait;

/// Everything the I2C pins and units need released, in one mask.
pub const I2C_SYSTEM_RESETS: [ResetId; 4] = [
    ResetId::PadsBank0,
    ResetId::IoBank0,
    ResetId::I2c0,
    ResetId::I2c1,
];

pub struct I2cSystemSetup;

impl I2cSystemSetup {
    /// Release pads, pin mux and both I2C units, then wait until every one
    /// of them reports done.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if `wait` gives up first.
    pub fn initialize_i2c_system<R, W>(syscon: &mut SysCon<R>, wait: W) -> Result<(), Error>
    where
        R: RegisterBlock,
        W: Wait,
    {
        syscon.unreset_wait(mask_of(&I2C_SYSTEM_RESETS), wait)?;
        Ok(())
    }

    /// Pulse the reset of a single unit, for recovery after a wedged bus.
    /// The unit comes back disabled with its reset configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] if `wait` gives up first.
    pub fn reset_i2c_peripheral<R, W>(
        syscon: &mut SysCon<R>,
        instance: I2cInstance,
        wait: W,
    ) -> Result<(), Error>
    where
        R: RegisterBlock,
        W: Wait,
    {
        let id = instance.reset_id();
        syscon.reset_assert(id);
        syscon.unreset_wait(id.mask(), wait)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::Register;
    use crate::sim::SimMemory;
    use crate::syscon::{Reset, ResetDone};
    use crate::wait::Bounded;

    const ALL: u32 = 0x1fff_ffff;

    fn held_in_reset(done: u32) -> SysCon<SimMemory<4>> {
        let mut resets = SimMemory::new();
        resets.poke(Reset::OFFSET, ALL);
        resets.poke(ResetDone::OFFSET, done);
        SysCon::new(resets)
    }

    #[test]
    fn test_initialize_i2c_system() {
        let mut syscon = held_in_reset(ALL);

        let result = I2cSystemSetup::initialize_i2c_system(&mut syscon, Bounded::new(4));

        assert!(result.is_ok());
        let released = mask_of(&I2C_SYSTEM_RESETS);
        assert_eq!(syscon.release().peek(Reset::OFFSET), ALL & !released);
    }

    #[test]
    fn test_initialize_i2c_system_times_out() {
        // I2C1 never reports done.
        let mut syscon = held_in_reset(ALL & !ResetId::I2c1.mask());

        let result = I2cSystemSetup::initialize_i2c_system(&mut syscon, Bounded::new(4));

        assert_eq!(result, Err(Error::Timeout));
    }

    #[test]
    fn test_reset_i2c_peripheral() {
        let mut syscon = held_in_reset(ALL);
        syscon.deassert_mask(ALL);

        let result =
            I2cSystemSetup::reset_i2c_peripheral(&mut syscon, I2cInstance::I2c0, Bounded::new(4));

        assert!(result.is_ok());
        assert_eq!(syscon.release().peek(Reset::OFFSET), 0);
    }
}
