// Licensed under the Apache-2.0 license

//! I2C controller (bus initiator) role for one DesignWare unit.
//!
//! The controller talks to a single peripheral address and moves one byte
//! per call. Reads are split in two: [`ByteController::request_byte_from_memory`]
//! only queues the read command, so that the caller can let the target
//! answer before the reply is collected.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{check_address, Error, I2cConfig};
use crate::i2c::registers::{
    IcClrTxAbrt, IcCon, IcDataCmd, IcEnable, IcRawIntrStat, IcStatus, IcTar, IcTxAbrtSource,
};
use crate::i2c::traits::{ByteController, I2cHardwareCore};
use crate::regs::{Register, RegisterBlock};
use crate::wait::{Spin, Wait};
use embedded_hal::i2c::SevenBitAddress;

pub struct I2cController<R: RegisterBlock, W: Wait = Spin, L: Logger = NoOpLogger> {
    pub hardware: R,
    pub config: I2cConfig,
    pub wait: W,
    pub logger: L,
    /// Set once a read has been queued. Nothing clears it.
    requested: bool,
}

impl<R: RegisterBlock> I2cController<R> {
    pub fn new(hardware: R, config: I2cConfig) -> Self {
        Self::with_parts(hardware, config, Spin, NoOpLogger)
    }
}

impl<R: RegisterBlock, W: Wait, L: Logger> I2cController<R, W, L> {
    pub fn with_parts(hardware: R, config: I2cConfig, wait: W, logger: L) -> Self {
        Self {
            hardware,
            config,
            wait,
            logger,
            requested: false,
        }
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    #[must_use]
    pub fn target_address(&self) -> SevenBitAddress {
        // IC_TAR is 10 bits wide but only 7-bit addresses are ever written.
        (self.hardware.read::<IcTar>().ic_tar() & 0x7f) as SevenBitAddress
    }

    fn wait_tx_not_full(&mut self) -> Result<(), Error> {
        let hardware = &self.hardware;
        self.wait
            .wait_for(|| hardware.read::<IcStatus>().tfnf())?;
        Ok(())
    }

    /// Read and drop the abort cause, then clear the abort.
    fn clear_abort(&mut self) {
        let source = self.hardware.read::<IcTxAbrtSource>();
        self.logger.error(format_args!(
            "i2c controller: transmit abort, source {:#010x}",
            source.bits()
        ));
        let _ = self.hardware.read::<IcClrTxAbrt>();
    }
}

impl<R: RegisterBlock, W: Wait, L: Logger> I2cHardwareCore for I2cController<R, W, L> {
    fn enable(&mut self) {
        self.hardware.modify::<IcEnable, _>(|w| {
            w.set_enable(true);
            w.set_abort(false);
            w.set_tx_cmd_block(false);
        });
    }

    fn disable(&mut self) {
        self.hardware.modify::<IcEnable, _>(|w| w.set_enable(false));
    }

    fn is_enabled(&self) -> bool {
        self.hardware.read::<IcEnable>().enable()
    }
}

impl<R: RegisterBlock, W: Wait, L: Logger> ByteController for I2cController<R, W, L> {
    fn configure_as_controller(&mut self, address: SevenBitAddress) -> Result<(), Error> {
        let address = check_address(address)?;

        self.disable();

        // Whole-register writes: no stale 10-bit or general-call bits survive.
        let speed = self.config.speed;
        let mut con = IcCon::default();
        con.set_master_mode(true);
        con.set_speed(speed.con_speed());
        con.set_ic_restart_en(true);
        con.set_ic_slave_disable(true);
        self.hardware.write(con);

        let mut tar = IcTar::default();
        tar.set_ic_tar(u32::from(address));
        self.hardware.write(tar);

        self.enable();

        self.logger.debug(format_args!(
            "i2c controller: target {address:#04x} at {} kHz",
            speed.rate().to_kHz()
        ));
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Error> {
        self.wait_tx_not_full()?;

        let mut cmd = IcDataCmd::default();
        cmd.set_dat(u32::from(byte));
        cmd.set_cmd(false);
        cmd.set_stop(true);
        cmd.set_restart(false);
        self.hardware.write(cmd);

        if self.hardware.read::<IcRawIntrStat>().tx_abrt() {
            self.clear_abort();
            return Err(Error::TransmitAbort);
        }
        Ok(())
    }

    fn request_byte_from_memory(&mut self) -> Result<(), Error> {
        self.wait_tx_not_full()?;

        let mut cmd = IcDataCmd::default();
        cmd.set_cmd(true);
        cmd.set_stop(true);
        self.hardware.write(cmd);

        self.requested = true;
        Ok(())
    }

    fn receive_requested_byte_from_memory(&mut self) -> Result<Option<u8>, Error> {
        if !self.requested {
            return Ok(None);
        }

        let hardware = &self.hardware;
        self.wait
            .wait_for(|| hardware.read::<IcStatus>().rfne())?;

        // Truncation keeps the DAT field.
        #[allow(clippy::cast_possible_truncation)]
        let byte = self.hardware.read::<IcDataCmd>().dat() as u8;
        Ok(Some(byte))
    }
}
