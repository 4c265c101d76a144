//! ## Responder
//!
//! Turns the driver's TX-info reports into RX-info replies. The medium model is the simplest one
//! that keeps the driver happy: every frame reaches one other radio with a fixed signal and a
//! fixed propagation delay.

use attrs_hwsim::{
    decode_message, encode_message, structs::MacAddress, structs::ReceiverInfo, HwsimCmd,
    YawmdRxInfo, YawmdTxInfo,
};
use tracing::{debug, info};

use crate::{config::BridgeConfig, error::BridgeResult};

/// Radios assumed present when the config lists none.
pub const DEFAULT_RADIOS: [MacAddress; 2] = [
    MacAddress::new([0x42, 0x00, 0x00, 0x00, 0x00, 0x00]),
    MacAddress::new([0x42, 0x00, 0x00, 0x00, 0x01, 0x00]),
];

const NANOS_PER_MICRO: i64 = 1000;

#[derive(Debug, Clone)]
pub struct Responder {
    signal_dbm: i32,
    rx_delay_us: u64,
    capacity: usize,
    radios: Vec<MacAddress>,
}

impl Responder {
    pub fn new(
        signal_dbm: i32,
        rx_delay_us: u64,
        capacity: usize,
        radios: Vec<MacAddress>,
    ) -> Self {
        Self {
            signal_dbm,
            rx_delay_us,
            capacity,
            radios,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> BridgeResult<Self> {
        let radios = config
            .radios()
            .iter()
            .map(|r| r.perm_addr())
            .collect::<BridgeResult<Vec<_>>>()?;
        Ok(Self::new(
            config.signal_dbm(),
            config.rx_delay_us(),
            config.window_capacity(),
            radios,
        ))
    }

    /// Answers one window. Returns `None` for messages that need no reply.
    pub fn handle(&self, window: &[u8]) -> BridgeResult<Option<Vec<u8>>> {
        let message = decode_message(window)?;
        if message.cmd != HwsimCmd::YawmdTxInfo {
            debug!("no reply for {:?}", message.cmd);
            return Ok(None);
        }
        let tx = YawmdTxInfo::from_message(&message)?;
        let rx = self.reply_to(&tx);
        info!(
            "frame {:#x} from {} delivered to {}",
            tx.cookie, tx.addr_transmitter, rx.receiver_info.addr
        );
        let reply = encode_message(HwsimCmd::YawmdRxInfo, &rx.to_attrs(), self.capacity)?;
        Ok(Some(reply))
    }

    pub fn reply_to(&self, tx: &YawmdTxInfo) -> YawmdRxInfo {
        // The driver reads the signal back as s32.
        let signal = self.signal_dbm as u32;
        let delay_ns = i64::try_from(self.rx_delay_us)
            .unwrap_or(i64::MAX)
            .saturating_mul(NANOS_PER_MICRO);
        YawmdRxInfo {
            addr_transmitter: tx.addr_transmitter,
            flags: tx.flags,
            rx_rate: tx.tx_info[0].idx.max(0) as u32,
            signal,
            tx_info: tx.tx_info,
            cookie: tx.cookie,
            freq: tx.freq,
            timestamp: tx.timestamp.saturating_add(delay_ns),
            receiver_info: ReceiverInfo {
                addr: self.receiver_for(tx.addr_transmitter),
                signal,
            },
        }
    }

    /// First known radio other than the transmitter. A lone radio hears itself.
    pub fn receiver_for(&self, transmitter: MacAddress) -> MacAddress {
        let radios: &[MacAddress] = if self.radios.is_empty() {
            &DEFAULT_RADIOS
        } else {
            &self.radios
        };
        radios
            .iter()
            .copied()
            .find(|addr| *addr != transmitter)
            .unwrap_or(transmitter)
    }
}
