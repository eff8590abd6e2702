// Licensed under the Apache-2.0 license

//! I2C target (responder) role for one DesignWare unit.
//!
//! The target keeps a single byte of memory. Each byte written to it is
//! stored incremented by one, and the stored byte is what a controller read
//! gets back. Serving does not consume the memory.

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{check_address, Error, I2cConfig};
use crate::i2c::registers::{IcClrRdReq, IcCon, IcDataCmd, IcEnable, IcRawIntrStat, IcSar, IcStatus};
use crate::i2c::traits::target::ByteTarget;
use crate::i2c::traits::I2cHardwareCore;
use crate::regs::RegisterBlock;
use crate::wait::{Spin, Wait};
use embedded_hal::i2c::SevenBitAddress;

pub struct I2cTarget<R: RegisterBlock, W: Wait = Spin, L: Logger = NoOpLogger> {
    pub hardware: R,
    pub config: I2cConfig,
    pub wait: W,
    pub logger: L,
    address: Option<SevenBitAddress>,
    memory: Option<u8>,
}

impl<R: RegisterBlock> I2cTarget<R> {
    pub fn new(hardware: R, config: I2cConfig) -> Self {
        Self::with_parts(hardware, config, Spin, NoOpLogger)
    }
}

impl<R: RegisterBlock, W: Wait, L: Logger> I2cTarget<R, W, L> {
    pub fn with_parts(hardware: R, config: I2cConfig, wait: W, logger: L) -> Self {
        Self {
            hardware,
            config,
            wait,
            logger,
            address: None,
            memory: None,
        }
    }
}

impl<R: RegisterBlock, W: Wait, L: Logger> I2cHardwareCore for I2cTarget<R, W, L> {
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

impl<R: RegisterBlock, W: Wait, L: Logger> ByteTarget for I2cTarget<R, W, L> {
    fn configure_as_target(&mut self, address: SevenBitAddress) -> Result<(), Error> {
        let address = check_address(address)?;

        self.disable();

        let speed = self.config.speed;
        let mut con = IcCon::default();
        con.set_speed(speed.con_speed());
        con.set_ic_restart_en(true);
        self.hardware.write(con);

        let mut sar = IcSar::default();
        sar.set_ic_sar(u32::from(address));
        self.hardware.write(sar);

        self.enable();
        self.address = Some(address);

        self.logger
            .debug(format_args!("i2c target: listening at {address:#04x}"));
        Ok(())
    }

    fn receive_byte_to_memory(&mut self) -> Result<(), Error> {
        let hardware = &self.hardware;
        self.wait
            .wait_for(|| hardware.read::<IcStatus>().rfne())?;

        #[allow(clippy::cast_possible_truncation)]
        let received = self.hardware.read::<IcDataCmd>().dat() as u8;
        let stored = received.wrapping_add(1);
        self.memory = Some(stored);

        self.logger.debug(format_args!(
            "i2c target: received {received:#04x}, stored {stored:#04x}"
        ));
        Ok(())
    }

    fn serve_byte_from_memory(&mut self) -> Result<(), Error> {
        let hardware = &self.hardware;
        self.wait
            .wait_for(|| hardware.read::<IcRawIntrStat>().rd_req())?;
        let _ = self.hardware.read::<IcClrRdReq>();

        let reply = self.memory.unwrap_or(0);
        let mut cmd = IcDataCmd::default();
        cmd.set_dat(u32::from(reply));
        cmd.set_cmd(false);
        cmd.set_stop(false);
        cmd.set_restart(false);
        self.hardware.write(cmd);

        self.logger
            .debug(format_args!("i2c target: served {reply:#04x}"));
        Ok(())
    }

    fn memory_value(&self) -> Option<u8> {
        self.memory
    }

    fn address(&self) -> Option<SevenBitAddress> {
        self.address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::i2c_controller::I2cController;
    use crate::i2c::traits::ByteController;
    use crate::sim::{SimBus, SimI2c};
    use crate::wait::Bounded;
    use crate::regs::Register;

    fn pair(bus: &SimBus) -> (I2cController<SimI2c<'_>, Bounded>, I2cTarget<SimI2c<'_>, Bounded>) {
        let mut controller = I2cController::with_parts(
            bus.port(0),
            I2cConfig::default(),
            Bounded::new(16),
            NoOpLogger,
        );
        let mut target =
            I2cTarget::with_parts(bus.port(1), I2cConfig::default(), Bounded::new(16), NoOpLogger);
        target.configure_as_target(0x42).unwrap();
        controller.configure_as_controller(0x42).unwrap();
        (controller, target)
    }

    #[test]
    fn configure_sets_role_and_own_address() {
        let bus = SimBus::new();
        let mut target = I2cTarget::new(bus.port(1), I2cConfig::default());
        assert_eq!(target.address(), None);

        target.configure_as_target(0x42).unwrap();

        let con = target.hardware.read::<IcCon>();
        assert!(!con.master_mode());
        assert!(!con.ic_slave_disable());
        assert!(con.ic_restart_en());
        assert_eq!(target.hardware.read::<IcSar>().ic_sar(), 0x42);
        assert_eq!(target.address(), Some(0x42));
        assert!(bus.is_enabled(1));
        assert_eq!(bus.config_violations(1), 0);
    }

    #[test]
    fn configure_replaces_stale_register_contents() {
        let bus = SimBus::new();
        let mut target = I2cTarget::new(bus.port(1), I2cConfig::default());
        target.hardware.write(IcSar::from_bits(0x3ff));
        target.hardware.modify::<IcCon, _>(|w| {
            w.set_ic_10bitaddr_slave(true);
            w.set_stop_det_ifaddressed(true);
        });

        target.configure_as_target(0x42).unwrap();

        assert_eq!(target.hardware.read::<IcSar>().bits(), 0x42);
        // SPEED=fast, IC_RESTART_EN; controller role off, target role on.
        assert_eq!(target.hardware.read::<IcCon>().bits(), 0x24);
        assert_eq!(bus.config_violations(1), 0);
    }

    #[test]
    fn reconfigure_while_enabled_is_clean() {
        let bus = SimBus::new();
        let mut target = I2cTarget::new(bus.port(1), I2cConfig::default());
        target.enable();

        target.configure_as_target(0x21).unwrap();
        target.configure_as_target(0x22).unwrap();

        assert!(target.is_enabled());
        assert_eq!(target.hardware.read::<IcSar>().ic_sar(), 0x22);
        assert_eq!(bus.config_violations(1), 0);
    }

    #[test]
    fn invalid_address_is_rejected() {
        let bus = SimBus::new();
        let mut target = I2cTarget::new(bus.port(1), I2cConfig::default());

        assert_eq!(target.configure_as_target(0xff), Err(Error::InvalidAddress(0xff)));
        assert!(!bus.is_enabled(1));
        assert_eq!(target.address(), None);
    }

    #[test]
    fn stores_every_byte_plus_one() {
        let bus = SimBus::new();
        let (mut controller, mut target) = pair(&bus);

        for byte in 0..=u8::MAX {
            controller.write_byte(byte).unwrap();
            target.receive_byte_to_memory().unwrap();
            assert_eq!(target.memory_value(), Some(byte.wrapping_add(1)));
        }
        assert_eq!(target.memory_value(), Some(0));
    }

    #[test]
    fn receive_times_out_on_silent_bus() {
        let bus = SimBus::new();
        let (_controller, mut target) = pair(&bus);

        assert_eq!(target.receive_byte_to_memory(), Err(Error::Timeout));
        assert_eq!(target.memory_value(), None);
    }

    #[test]
    fn serve_waits_for_a_read_request() {
        let bus = SimBus::new();
        let (_controller, mut target) = pair(&bus);

        assert_eq!(target.serve_byte_from_memory(), Err(Error::Timeout));
    }

    #[test]
    fn serve_before_any_write_answers_zero() {
        let bus = SimBus::new();
        let (mut controller, mut target) = pair(&bus);

        controller.request_byte_from_memory().unwrap();
        target.serve_byte_from_memory().unwrap();

        assert_eq!(controller.receive_requested_byte_from_memory(), Ok(Some(0)));
        assert!(!target.hardware.read::<IcRawIntrStat>().rd_req());
    }

    #[test]
    fn serving_does_not_consume_memory() {
        let bus = SimBus::new();
        let (mut controller, mut target) = pair(&bus);
        controller.write_byte(0x10).unwrap();
        target.receive_byte_to_memory().unwrap();

        for _ in 0..2 {
            controller.request_byte_from_memory().unwrap();
            target.serve_byte_from_memory().unwrap();
            assert_eq!(controller.receive_requested_byte_from_memory(), Ok(Some(0x11)));
        }
        assert_eq!(target.memory_value(), Some(0x11));
    }
}
