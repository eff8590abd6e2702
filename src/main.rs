// Licensed under the Apache-2.0 license

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use panic_halt as _;

use pico2_i2c_ddk::common::NoOpLogger;
use pico2_i2c_ddk::i2c::hardware_instantiation::instantiate_hardware;
use pico2_i2c_ddk::i2c::system_setup::I2cSystemSetup;
use pico2_i2c_ddk::i2c::I2cConfigBuilder;
use pico2_i2c_ddk::pinctrl::{Pin, PinCtrl};
use pico2_i2c_ddk::regs::{self, Mmio, RegisterBlock};
use pico2_i2c_ddk::syscon::SysCon;
use pico2_i2c_ddk::tests::functional::i2c_test::run_i2c_tests;
use pico2_i2c_ddk::wait::Spin;

const LED_PIN: Pin = Pin::bank0(25);

/// Blink count signalling that the pad, IO or I2C blocks stayed in reset.
const FAIL_RESET: u32 = 1;

/// Blink count signalling a failed I2C round trip.
const FAIL_I2C: u32 = 2;

/// RP2350 image definition: secure ARM executable. The boot ROM refuses to
/// start an image without one.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: [u32; 5] = [0xffff_ded3, 0x1021_0142, 0x0000_01ff, 0x0000_0000, 0xab12_3579];

#[derive(Clone, Default)]
struct DummyDelay;

impl DelayNs for DummyDelay {
    fn delay_ns(&mut self, ns: u32) {
        for _ in 0..ns {
            cortex_m::asm::nop();
        }
    }
}

fn led_set<P, I, S>(pins: &mut PinCtrl<P, I, S>, on: bool)
where
    P: RegisterBlock,
    I: RegisterBlock,
    S: RegisterBlock,
{
    let mut led = pins.output(LED_PIN);
    let _ = if on { led.set_high() } else { led.set_low() };
}

fn led_success<P, I, S>(pins: &mut PinCtrl<P, I, S>) -> !
where
    P: RegisterBlock,
    I: RegisterBlock,
    S: RegisterBlock,
{
    led_set(pins, true);
    loop {
        cortex_m::asm::nop();
    }
}

fn blink_fail_forever<P, I, S>(pins: &mut PinCtrl<P, I, S>, code: u32) -> !
where
    P: RegisterBlock,
    I: RegisterBlock,
    S: RegisterBlock,
{
    let mut delay = DummyDelay;
    let blinks = code.clamp(1, 20);
    loop {
        for _ in 0..blinks {
            led_set(pins, true);
            delay.delay_ns(600_000);
            led_set(pins, false);
            delay.delay_ns(600_000);
        }
        delay.delay_ns(4_000_000);
    }
}

#[entry]
fn main() -> ! {
    // SAFETY: fixed RP2350 peripheral addresses, owned by this thread only.
    let mut syscon = SysCon::new(unsafe { Mmio::new(regs::RESETS_BASE) });
    let mut pins = PinCtrl::new(
        unsafe { Mmio::new(regs::PADS_BANK0_BASE) },
        unsafe { Mmio::new(regs::IO_BANK0_BASE) },
        unsafe { Mmio::new(regs::SIO_BASE) },
    );

    let released = I2cSystemSetup::initialize_i2c_system(&mut syscon, Spin);

    pins.configure_digital_output_pin(LED_PIN);
    led_set(&mut pins, false);

    if released.is_err() {
        blink_fail_forever(&mut pins, FAIL_RESET);
    }

    // The board carries external pull-ups.
    let config = I2cConfigBuilder::new().internal_pull_up(false).build();

    // SAFETY: both units were just released from reset and nothing else
    // owns them.
    let (mut controller, mut target) = unsafe { instantiate_hardware(&mut pins, config) };

    match run_i2c_tests(&mut controller, &mut target, &mut NoOpLogger, config.address) {
        Ok(()) => led_success(&mut pins),
        Err(_) => blink_fail_forever(&mut pins, FAIL_I2C),
    }
}
