// Licensed under the Apache-2.0 license

//! On-target I2C checks, run by the firmware over the externally wired
//! I2C0/I2C1 pair. They also run off target against the simulated bus.

use crate::common::Logger;
use crate::i2c::round_trip::RoundTrip;
use crate::i2c::{ByteController, ByteTarget, Error};
use embedded_hal::i2c::SevenBitAddress;

/// Byte the firmware sends; the target must answer with its successor.
pub const PROBE_BYTE: u8 = 0xa5;

/// Configure both roles at `address` and push `byte` through one full round
/// trip using the free-form driver calls.
///
/// # Errors
///
/// Any driver error, or [`Error::UnexpectedReply`] if the target answered
/// something other than `byte + 1`.
pub fn run_round_trip_test<C, T, L>(
    controller: &mut C,
    target: &mut T,
    logger: &mut L,
    address: SevenBitAddress,
    byte: u8,
) -> Result<u8, Error>
where
    C: ByteController,
    T: ByteTarget,
    L: Logger,
{
    logger.debug(format_args!("Testing I2C round trip with {byte:#04x}..."));

    target.configure_as_target(address)?;
    controller.configure_as_controller(address)?;

    controller.write_byte(byte)?;
    target.receive_byte_to_memory()?;
    controller.request_byte_from_memory()?;
    target.serve_byte_from_memory()?;
    let received = controller
        .receive_requested_byte_from_memory()?
        .ok_or(Error::NothingRequested)?;

    check_reply(logger, byte, received)
}

/// Same exchange through the phase-checked [`RoundTrip`]. Both roles must
/// already be configured.
///
/// # Errors
///
/// As [`run_round_trip_test`].
pub fn run_phased_round_trip_test<C, T, L>(
    controller: &mut C,
    target: &mut T,
    logger: &mut L,
    byte: u8,
) -> Result<u8, Error>
where
    C: ByteController,
    T: ByteTarget,
    L: Logger,
{
    logger.debug(format_args!("Testing phased I2C round trip with {byte:#04x}..."));

    let received = RoundTrip::new(controller, target)
        .write(byte)?
        .store()?
        .request()?
        .serve()?
        .receive()?;

    check_reply(logger, byte, received)
}

/// Run the firmware's I2C check: one round trip of [`PROBE_BYTE`] per
/// configuration. The controller's `requested` flag stays set after a
/// receive, so a second request/receive on the same configuration is not
/// part of this suite; [`run_phased_round_trip_test`] runs on fresh roles.
///
/// # Errors
///
/// The first failing check's error.
pub fn run_i2c_tests<C, T, L>(
    controller: &mut C,
    target: &mut T,
    logger: &mut L,
    address: SevenBitAddress,
) -> Result<(), Error>
where
    C: ByteController,
    T: ByteTarget,
    L: Logger,
{
    logger.debug(format_args!("=== I2C Tests ==="));

    run_round_trip_test(controller, target, logger, address, PROBE_BYTE)?;

    logger.debug(format_args!("=== All I2C Tests Passed ==="));
    Ok(())
}

fn check_reply<L: Logger>(logger: &mut L, sent: u8, received: u8) -> Result<u8, Error> {
    let expected = sent.wrapping_add(1);
    if received == expected {
        logger.debug(format_args!("PASSED ({received:#04x})"));
        Ok(received)
    } else {
        logger.error(format_args!(
            "FAILED: expected {expected:#04x}, received {received:#04x}"
        ));
        Err(Error::UnexpectedReply { expected, received })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{NoOpLogger, UartLogger};
    use crate::i2c::common::I2cConfig;
    use crate::i2c::registers::IcDataCmd;
    use crate::i2c::{I2cController, I2cTarget};
    use crate::regs::Register;
    use crate::sim::{SimBus, SimI2c};
    use crate::wait::Bounded;

    type Controller<'a> = I2cController<SimI2c<'a>, Bounded>;
    type Target<'a> = I2cTarget<SimI2c<'a>, Bounded>;

    fn roles(bus: &SimBus) -> (Controller<'_>, Target<'_>) {
        (
            I2cController::with_parts(
                bus.port(0),
                I2cConfig::default(),
                Bounded::new(32),
                NoOpLogger,
            ),
            I2cTarget::with_parts(bus.port(1), I2cConfig::default(), Bounded::new(32), NoOpLogger),
        )
    }

    #[test]
    fn probe_byte_round_trip() {
        let bus = SimBus::new();
        let (mut controller, mut target) = roles(&bus);

        let reply =
            run_round_trip_test(&mut controller, &mut target, &mut NoOpLogger, 0x42, PROBE_BYTE);

        assert_eq!(reply, Ok(0xa6));
        assert_eq!(target.memory_value(), Some(0xa6));
    }

    #[test]
    fn full_suite_passes_and_logs() {
        let bus = SimBus::new();
        let (mut controller, mut target) = roles(&bus);
        let mut buf = [0u8; 512];

        let (result, len) = {
            let mut logger = UartLogger::new(&mut buf[..]);
            let result = run_i2c_tests(&mut controller, &mut target, &mut logger, 0x42);
            (result, 512 - logger.into_inner().len())
        };

        assert_eq!(result, Ok(()));
        let log = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(log.contains("PASSED (0xa6)"));
        assert!(log.ends_with("=== All I2C Tests Passed ===\r\n"));
    }

    #[test]
    fn suite_issues_a_single_read_request() {
        let bus = SimBus::new();
        let (mut controller, mut target) = roles(&bus);

        run_i2c_tests(&mut controller, &mut target, &mut NoOpLogger, 0x42).unwrap();

        let reads = bus
            .journal(0)
            .iter()
            .filter(|(offset, value)| {
                *offset == IcDataCmd::OFFSET && IcDataCmd::from_bits(*value).cmd()
            })
            .count();
        assert_eq!(reads, 1);
    }

    #[test]
    fn phased_round_trip_on_configured_roles() {
        let bus = SimBus::new();
        let (mut controller, mut target) = roles(&bus);
        target.configure_as_target(0x42).unwrap();
        controller.configure_as_controller(0x42).unwrap();

        assert_eq!(
            run_phased_round_trip_test(&mut controller, &mut target, &mut NoOpLogger, 0x7f),
            Ok(0x80)
        );
    }

    #[test]
    fn wraparound_round_trip() {
        let bus = SimBus::new();
        let (mut controller, mut target) = roles(&bus);

        assert_eq!(
            run_round_trip_test(&mut controller, &mut target, &mut NoOpLogger, 0x42, 0xff),
            Ok(0x00)
        );
    }

    #[test]
    fn unconfigured_target_never_completes() {
        let bus = SimBus::new();
        let (mut controller, _target) = roles(&bus);
        controller.configure_as_controller(0x42).unwrap();

        // With no responder the write aborts; the read never gets an answer.
        assert_eq!(controller.write_byte(PROBE_BYTE), Err(Error::TransmitAbort));
        controller.request_byte_from_memory().unwrap();
        assert_eq!(
            controller.receive_requested_byte_from_memory(),
            Err(Error::Timeout)
        );
    }

    #[test]
    fn injected_abort_fails_the_suite() {
        let bus = SimBus::new();
        let (mut controller, mut target) = roles(&bus);
        target.configure_as_target(0x42).unwrap();
        controller.configure_as_controller(0x42).unwrap();
        bus.inject_abort(0);

        assert_eq!(
            run_phased_round_trip_test(&mut controller, &mut target, &mut NoOpLogger, PROBE_BYTE),
            Err(Error::TransmitAbort)
        );
    }

    #[test]
    fn wrong_reply_is_reported() {
        let mut buf = [0u8; 128];
        let result = {
            let mut logger = UartLogger::new(&mut buf[..]);
            check_reply(&mut logger, 0x10, 0x10)
        };
        assert_eq!(
            result,
            Err(Error::UnexpectedReply {
                expected: 0x11,
                received: 0x10
            })
        );
        assert!(buf.starts_with(b"[ERROR] FAILED: expected 0x11, received 0x10"));
    }
}
