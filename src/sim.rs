// Licensed under the Apache-2.0 license

//! Software register doubles for running the drivers off target.
//!
//! - [`SimMemory`] behaves like plain RAM. It stands in for the pad, pin-mux,
//!   SIO and reset blocks, whose effects tests inspect directly.
//! - [`SimBus`] models two DesignWare I2C units wired to the same bus. Bytes
//!   written by a controller land in the receive FIFO of the target whose
//!   own address matches; read commands raise RD_REQ on that target and its
//!   reply is routed back into the controller's receive FIFO. Transfers
//!   complete synchronously with the register write that starts them.
//!
//! Hooks exist to inject a transmit abort, to stall the transmit FIFO and to
//! count configuration writes performed while a unit is still enabled.

// Unit indices are checked once in `SimBus::port`.
#![allow(clippy::indexing_slicing, clippy::cast_possible_truncation)]

use crate::i2c::registers::{
    IcClrRdReq, IcClrTxAbrt, IcCon, IcDataCmd, IcEnable, IcRawIntrStat, IcSar, IcStatus, IcTar,
    IcTxAbrtSource,
};
use crate::regs::{Register, RegisterBlock};
use core::cell::RefCell;
use heapless::{Deque, Vec};

/// Depth of each simulated FIFO, matching the RP2350 configuration.
pub const FIFO_DEPTH: usize = 16;
const JOURNAL_DEPTH: usize = 64;
const UNITS: usize = 2;

const RX_UNDER: u32 = 1 << 0;
const RX_OVER: u32 = 1 << 1;
const RD_REQ: u32 = 1 << 5;
const TX_ABRT: u32 = 1 << 6;

const ABRT_7B_ADDR_NOACK: u32 = 1 << 0;
const ABRT_USER_ABRT: u32 = 1 << 16;

const CON: usize = IcCon::OFFSET;
const TAR: usize = IcTar::OFFSET;
const SAR: usize = IcSar::OFFSET;
const DATA_CMD: usize = IcDataCmd::OFFSET;
const RAW_INTR_STAT: usize = IcRawIntrStat::OFFSET;
const CLR_RD_REQ: usize = IcClrRdReq::OFFSET;
const CLR_TX_ABRT: usize = IcClrTxAbrt::OFFSET;
const ENABLE: usize = IcEnable::OFFSET;
const STATUS: usize = IcStatus::OFFSET;
const TX_ABRT_SOURCE: usize = IcTxAbrtSource::OFFSET;

/// RAM-backed register block of `WORDS` 32-bit registers.
///
/// Accesses beyond the block read as zero and are otherwise ignored.
#[derive(Clone, Debug)]
pub struct SimMemory<const WORDS: usize> {
    words: [u32; WORDS],
}

impl<const WORDS: usize> SimMemory<WORDS> {
    #[must_use]
    pub const fn new() -> Self {
        Self::filled(0)
    }

    /// Every register starts out holding `value`.
    #[must_use]
    pub const fn filled(value: u32) -> Self {
        Self {
            words: [value; WORDS],
        }
    }

    #[must_use]
    pub fn peek(&self, offset: usize) -> u32 {
        self.words.get(offset / 4).copied().unwrap_or(0)
    }

    pub fn poke(&mut self, offset: usize, value: u32) {
        if let Some(word) = self.words.get_mut(offset / 4) {
            *word = value;
        }
    }
}

impl<const WORDS: usize> Default for SimMemory<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> RegisterBlock for SimMemory<WORDS> {
    fn read_word(&self, offset: usize) -> u32 {
        self.peek(offset)
    }

    fn write_word(&mut self, offset: usize, value: u32) {
        self.poke(offset, value);
    }
}

struct Unit {
    con: IcCon,
    tar: IcTar,
    sar: IcSar,
    enable: IcEnable,
    /// Target replies not yet claimed by a read command.
    tx: Deque<u8, FIFO_DEPTH>,
    rx: Deque<u8, FIFO_DEPTH>,
    raw_intr: u32,
    abort_source: u32,
    pending_reads: usize,
    inject_abort: bool,
    stall_tx: bool,
    config_violations: u32,
    journal: Vec<(usize, u32), JOURNAL_DEPTH>,
}

impl Unit {
    // Hardware reset values: controller at fast speed, targets disabled,
    // both addresses 0x55.
    fn reset() -> Self {
        Self {
            con: IcCon::from_bits(0x65),
            tar: IcTar::from_bits(0x55),
            sar: IcSar::from_bits(0x55),
            enable: IcEnable::from_bits(0),
            tx: Deque::new(),
            rx: Deque::new(),
            raw_intr: 0,
            abort_source: 0,
            pending_reads: 0,
            inject_abort: false,
            stall_tx: false,
            config_violations: 0,
            journal: Vec::new(),
        }
    }

    fn enabled(&self) -> bool {
        self.enable.enable()
    }

    fn is_controller(&self) -> bool {
        self.enabled() && self.con.master_mode()
    }

    fn answers(&self, address: u32) -> bool {
        self.enabled() && !self.con.ic_slave_disable() && self.sar.ic_sar() == address
    }

    fn abort(&mut self, source: u32) {
        self.raw_intr |= TX_ABRT;
        self.abort_source |= source;
    }
}

struct BusState {
    units: [Unit; UNITS],
}

impl BusState {
    fn responder(&self, from: usize) -> Option<usize> {
        let address = self.units[from].tar.ic_tar();
        (0..UNITS).find(|&i| i != from && self.units[i].answers(address))
    }

    fn controller_for(&self, target: usize) -> Option<usize> {
        let address = self.units[target].sar.ic_sar();
        (0..UNITS).find(|&i| {
            i != target
                && self.units[i].is_controller()
                && self.units[i].pending_reads > 0
                && self.units[i].tar.ic_tar() == address
        })
    }

    fn data_cmd(&mut self, unit: usize, cmd: IcDataCmd) {
        if !self.units[unit].enabled() {
            return;
        }
        if self.units[unit].is_controller() {
            self.controller_command(unit, cmd);
        } else {
            // Target reply: queue it, hand it over if a read is waiting.
            if self.units[unit].tx.push_back(cmd.dat() as u8).is_err() {
                return;
            }
            self.deliver(unit);
        }
    }

    fn controller_command(&mut self, from: usize, cmd: IcDataCmd) {
        if core::mem::take(&mut self.units[from].inject_abort) {
            self.units[from].abort(ABRT_USER_ABRT);
            return;
        }
        let Some(peer) = self.responder(from) else {
            self.units[from].abort(ABRT_7B_ADDR_NOACK);
            return;
        };

        if cmd.cmd() {
            self.units[from].pending_reads += 1;
            self.units[peer].raw_intr |= RD_REQ;
            self.deliver(peer);
        } else if self.units[peer].rx.push_back(cmd.dat() as u8).is_err() {
            self.units[peer].raw_intr |= RX_OVER;
        }
    }

    fn deliver(&mut self, target: usize) {
        while let Some(controller) = self.controller_for(target) {
            let Some(byte) = self.units[target].tx.pop_front() else {
                return;
            };
            self.units[controller].pending_reads -= 1;
            if self.units[controller].rx.push_back(byte).is_err() {
                self.units[controller].raw_intr |= RX_OVER;
            }
        }
    }

    fn read(&mut self, unit: usize, offset: usize) -> u32 {
        let u = &mut self.units[unit];
        match offset {
            CON => u.con.bits(),
            TAR => u.tar.bits(),
            SAR => u.sar.bits(),
            ENABLE => u.enable.bits(),
            DATA_CMD => match u.rx.pop_front() {
                Some(byte) => u32::from(byte),
                None => {
                    u.raw_intr |= RX_UNDER;
                    0
                }
            },
            RAW_INTR_STAT => u.raw_intr,
            CLR_RD_REQ => {
                let was = u.raw_intr & RD_REQ != 0;
                u.raw_intr &= !RD_REQ;
                u32::from(was)
            }
            CLR_TX_ABRT => {
                let was = u.raw_intr & TX_ABRT != 0;
                u.raw_intr &= !TX_ABRT;
                u.abort_source = 0;
                u32::from(was)
            }
            STATUS => {
                let mut status: u32 = 0;
                if !u.stall_tx {
                    status |= 1 << 1 | 1 << 2;
                }
                if !u.rx.is_empty() {
                    status |= 1 << 3;
                }
                if u.rx.is_full() {
                    status |= 1 << 4;
                }
                status
            }
            TX_ABRT_SOURCE => u.abort_source,
            _ => 0,
        }
    }

    fn write(&mut self, unit: usize, offset: usize, value: u32) {
        let u = &mut self.units[unit];
        let _ = u.journal.push((offset, value));

        let locked = u.enabled();
        match offset {
            CON | TAR | SAR if locked => {
                u.config_violations += 1;
            }
            CON => u.con = IcCon::from_bits(value),
            TAR => u.tar = IcTar::from_bits(value),
            SAR => u.sar = IcSar::from_bits(value),
            ENABLE => {
                u.enable = IcEnable::from_bits(value);
                if !u.enable.enable() {
                    u.tx.clear();
                    u.rx.clear();
                    u.pending_reads = 0;
                }
            }
            DATA_CMD => self.data_cmd(unit, IcDataCmd::from_bits(value)),
            _ => {}
        }
    }
}

/// Two DesignWare I2C units sharing one simulated wire.
pub struct SimBus {
    state: RefCell<BusState>,
}

impl SimBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RefCell::new(BusState {
                units: [Unit::reset(), Unit::reset()],
            }),
        }
    }

    /// Register block of unit `unit` (0 for I2C0, 1 for I2C1).
    ///
    /// # Panics
    ///
    /// If `unit` is not 0 or 1.
    #[must_use]
    pub fn port(&self, unit: usize) -> SimI2c<'_> {
        assert!(unit < UNITS, "the simulated bus has two units");
        SimI2c { bus: self, unit }
    }

    /// Make the next controller command issued by `unit` abort.
    pub fn inject_abort(&self, unit: usize) {
        self.state.borrow_mut().units[unit].inject_abort = true;
    }

    /// Hold TFNF low on `unit` so that transmit waits never complete.
    pub fn stall_tx(&self, unit: usize, stalled: bool) {
        self.state.borrow_mut().units[unit].stall_tx = stalled;
    }

    #[must_use]
    pub fn is_enabled(&self, unit: usize) -> bool {
        self.state.borrow().units[unit].enabled()
    }

    /// Number of IC_CON/IC_TAR/IC_SAR writes attempted while enabled.
    #[must_use]
    pub fn config_violations(&self, unit: usize) -> u32 {
        self.state.borrow().units[unit].config_violations
    }

    #[must_use]
    pub fn raw_interrupts(&self, unit: usize) -> u32 {
        self.state.borrow().units[unit].raw_intr
    }

    #[must_use]
    pub fn rx_level(&self, unit: usize) -> usize {
        self.state.borrow().units[unit].rx.len()
    }

    /// Every register write performed on `unit`, oldest first.
    #[must_use]
    pub fn journal(&self, unit: usize) -> Vec<(usize, u32), JOURNAL_DEPTH> {
        self.state.borrow().units[unit].journal.clone()
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

/// One unit of a [`SimBus`], usable wherever a [`RegisterBlock`] is expected.
pub struct SimI2c<'a> {
    bus: &'a SimBus,
    unit: usize,
}

impl RegisterBlock for SimI2c<'_> {
    fn read_word(&self, offset: usize) -> u32 {
        self.bus.state.borrow_mut().read(self.unit, offset)
    }

    fn write_word(&mut self, offset: usize, value: u32) {
        self.bus.state.borrow_mut().write(self.unit, offset, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enable(port: &mut SimI2c<'_>) {
        port.write(IcEnable::from_bits(1));
    }

    #[test]
    fn config_writes_while_enabled_are_ignored_and_counted() {
        let bus = SimBus::new();
        let mut port = bus.port(0);
        enable(&mut port);

        port.write(IcTar::from_bits(0x42));

        assert_eq!(port.read::<IcTar>().ic_tar(), 0x55);
        assert_eq!(bus.config_violations(0), 1);
    }

    #[test]
    fn unanswered_write_aborts() {
        let bus = SimBus::new();
        let mut controller = bus.port(0);
        enable(&mut controller);

        let mut cmd = IcDataCmd::from_bits(0);
        cmd.set_dat(0x10);
        controller.write(cmd);

        assert!(controller.read::<IcRawIntrStat>().tx_abrt());
        assert!(controller.read::<IcTxAbrtSource>().abrt_7b_addr_noack());
        assert!(controller.read::<IcClrTxAbrt>().clr_tx_abrt());
        assert!(!controller.read::<IcRawIntrStat>().tx_abrt());
    }

    #[test]
    fn reply_written_before_request_is_delivered_on_request() {
        let bus = SimBus::new();
        let mut controller = bus.port(0);
        let mut target = bus.port(1);

        let mut con = IcCon::from_bits(0);
        con.set_ic_restart_en(true);
        target.write(con);
        target.write(IcSar::from_bits(0x55));
        enable(&mut target);
        enable(&mut controller);

        let mut reply = IcDataCmd::from_bits(0);
        reply.set_dat(0x7e);
        target.write(reply);
        assert_eq!(bus.rx_level(0), 0);

        let mut read = IcDataCmd::from_bits(0);
        read.set_cmd(true);
        controller.write(read);

        assert!(controller.read::<IcStatus>().rfne());
        assert_eq!(controller.read::<IcDataCmd>().dat(), 0x7e);
        assert!(target.read::<IcRawIntrStat>().rd_req());
    }

    #[test]
    fn empty_fifo_read_flags_underflow() {
        let bus = SimBus::new();
        let port = bus.port(1);
        assert_eq!(port.read::<IcDataCmd>().dat(), 0);
        assert!(port.read::<IcRawIntrStat>().rx_under());
    }

    #[test]
    fn memory_ignores_out_of_range_access() {
        let mut mem = SimMemory::<2>::filled(3);
        mem.poke(0x40, 9);
        assert_eq!(mem.peek(0x40), 0);
        assert_eq!(mem.peek(0x04), 3);
    }
}
