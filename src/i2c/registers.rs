// Licensed under the Apache-2.0 license

//! DesignWare APB I2C register layout, as instantiated twice on the RP2350.
//!
//! Only the registers the byte-level drivers touch are described.

use crate::regs::register;

register! {
    /// IC_CON: role and speed selection. Writable only while disabled.
    IcCon @ 0x00;
    pub master_mode, set_master_mode: 0;
    pub speed, set_speed: 2, 1;
    pub ic_10bitaddr_slave, set_ic_10bitaddr_slave: 3;
    pub ic_10bitaddr_master, set_ic_10bitaddr_master: 4;
    pub ic_restart_en, set_ic_restart_en: 5;
    pub ic_slave_disable, set_ic_slave_disable: 6;
    pub stop_det_ifaddressed, set_stop_det_ifaddressed: 7;
    pub tx_empty_ctrl, set_tx_empty_ctrl: 8;
    pub rx_fifo_full_hld_ctrl, set_rx_fifo_full_hld_ctrl: 9;
}

register! {
    /// IC_TAR: address the controller talks to.
    IcTar @ 0x04;
    pub ic_tar, set_ic_tar: 9, 0;
    pub gc_or_start, set_gc_or_start: 10;
    pub special, set_special: 11;
}

register! {
    /// IC_SAR: address the target answers to.
    IcSar @ 0x08;
    pub ic_sar, set_ic_sar: 9, 0;
}

register! {
    /// IC_DATA_CMD: FIFO data port and command word.
    IcDataCmd @ 0x10;
    pub dat, set_dat: 7, 0;
    /// 1 = read, 0 = write.
    pub cmd, set_cmd: 8;
    pub stop, set_stop: 9;
    pub restart, set_restart: 10;
    pub first_data_byte, _: 11;
}

register! {
    /// IC_RAW_INTR_STAT: interrupt causes, unmasked.
    IcRawIntrStat @ 0x34;
    pub rx_under, _: 0;
    pub rx_over, _: 1;
    pub rx_full, _: 2;
    pub tx_over, _: 3;
    pub tx_empty, _: 4;
    pub rd_req, _: 5;
    pub tx_abrt, _: 6;
    pub rx_done, _: 7;
    pub activity, _: 8;
    pub stop_det, _: 9;
    pub start_det, _: 10;
    pub gen_call, _: 11;
    pub restart_det, _: 12;
}

register! {
    /// IC_CLR_RD_REQ: reading clears RD_REQ.
    IcClrRdReq @ 0x50;
    pub clr_rd_req, _: 0;
}

register! {
    /// IC_CLR_TX_ABRT: reading clears TX_ABRT and IC_TX_ABRT_SOURCE.
    IcClrTxAbrt @ 0x54;
    pub clr_tx_abrt, _: 0;
}

register! {
    IcEnable @ 0x6c;
    pub enable, set_enable: 0;
    pub abort, set_abort: 1;
    pub tx_cmd_block, set_tx_cmd_block: 2;
}

register! {
    IcStatus @ 0x70;
    pub activity, _: 0;
    /// Transmit FIFO not full.
    pub tfnf, _: 1;
    /// Transmit FIFO empty.
    pub tfe, _: 2;
    /// Receive FIFO not empty.
    pub rfne, _: 3;
    /// Receive FIFO full.
    pub rff, _: 4;
    pub mst_activity, _: 5;
    pub slv_activity, _: 6;
}

register! {
    /// IC_TX_ABRT_SOURCE: why the last transmission aborted.
    IcTxAbrtSource @ 0x80;
    pub abrt_7b_addr_noack, _: 0;
    pub abrt_10addr1_noack, _: 1;
    pub abrt_10addr2_noack, _: 2;
    pub abrt_txdata_noack, _: 3;
    pub abrt_gcall_noack, _: 4;
    pub abrt_gcall_read, _: 5;
    pub arb_lost, _: 12;
    pub abrt_user_abrt, _: 16;
    pub tx_flush_cnt, _: 31, 23;
}

/// IC_CON.SPEED encodings.
pub(crate) const SPEED_STANDARD: u32 = 0x1;
pub(crate) const SPEED_FAST: u32 = 0x2;
