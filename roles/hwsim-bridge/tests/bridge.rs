use std::collections::VecDeque;

use attrs_hwsim::{
    attrs::*,
    decode_self_encoded, encode_message,
    structs::{MacAddress, TxRate},
    HwsimCmd, MessageHeader, YawmdRxInfo, YawmdTxInfo,
};
use hwsim_bridge::{
    config::{BridgeConfig, RadioConfig},
    error::{BridgeResult, Error},
    transport::{FileTransport, WindowGuard, WindowTransport},
    HwsimBridge, MAX_WINDOWS_PER_TICK,
};

#[derive(Default)]
struct MemoryTransport {
    pending: VecDeque<Vec<u8>>,
    published: Vec<Vec<u8>>,
    released: usize,
}

impl WindowTransport for MemoryTransport {
    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn acquire_window(&mut self, capacity: usize) -> BridgeResult<WindowGuard<'_>> {
        let mut window = self.pending.pop_front().unwrap_or_default();
        window.resize(capacity, 0);
        let released = &mut self.released;
        Ok(WindowGuard::new(window, move || {
            *released += 1;
            Ok(())
        }))
    }

    fn publish(&mut self, message: &[u8]) -> BridgeResult<()> {
        self.published.push(message.to_vec());
        Ok(())
    }
}

/// Keeps offering the same window because handing it back always fails.
struct StuckTransport {
    window: Vec<u8>,
    acquired: usize,
    published: usize,
}

impl WindowTransport for StuckTransport {
    fn has_pending(&self) -> bool {
        true
    }

    fn acquire_window(&mut self, _capacity: usize) -> BridgeResult<WindowGuard<'_>> {
        self.acquired += 1;
        Ok(WindowGuard::new(self.window.clone(), || {
            Err(Error::ReleaseFailed(std::io::Error::from(
                std::io::ErrorKind::PermissionDenied,
            )))
        }))
    }

    fn publish(&mut self, _message: &[u8]) -> BridgeResult<()> {
        self.published += 1;
        Ok(())
    }
}

fn sta(last: u8) -> MacAddress {
    MacAddress::new([0x42, 0, 0, 0, last, 0])
}

fn config() -> BridgeConfig {
    BridgeConfig::new("unused-window".into(), "unused-reply".into()).with_radios(vec![
        RadioConfig::new("42:00:00:00:00:00"),
        RadioConfig::new("42:00:00:00:01:00"),
    ])
}

fn tx_window(from: MacAddress, cookie: u64) -> Vec<u8> {
    let tx = YawmdTxInfo {
        addr_transmitter: from,
        flags: 2,
        tx_info: [
            TxRate { idx: 1, count: 4 },
            TxRate { idx: -1, count: 0 },
            TxRate { idx: -1, count: 0 },
            TxRate { idx: -1, count: 0 },
        ],
        cookie,
        freq: 2412,
        timestamp: 10_000,
        ..Default::default()
    };
    encode_message(HwsimCmd::YawmdTxInfo, &tx.to_attrs(), 4096).unwrap()
}

#[test]
fn register_announces_radios() {
    let bridge = HwsimBridge::new(config()).unwrap();
    let mut transport = MemoryTransport::default();
    bridge.register(&mut transport).unwrap();

    assert_eq!(transport.published.len(), 3);
    let register = decode_self_encoded(&transport.published[0]).unwrap();
    assert_eq!(register.cmd, HwsimCmd::Register);
    assert!(register.attrs.is_empty());

    let radio = decode_self_encoded(&transport.published[2]).unwrap();
    assert_eq!(radio.cmd, HwsimCmd::NewRadio);
    assert_eq!(
        radio.attrs.get_bytes(HWSIM_ATTR_PERM_ADDR),
        Some(&sta(1).0[..])
    );
    assert_eq!(radio.attrs.get_u32(HWSIM_ATTR_CHANNELS), Some(1));
}

#[test]
fn tx_info_is_answered_in_order() {
    let bridge = HwsimBridge::new(config()).unwrap();
    let mut transport = MemoryTransport::default();
    transport.pending.push_back(tx_window(sta(0), 1));
    transport.pending.push_back(tx_window(sta(1), 2));

    assert!(bridge.process_pending(&mut transport).unwrap());
    assert!(bridge.process_pending(&mut transport).unwrap());
    assert!(!bridge.process_pending(&mut transport).unwrap());
    assert_eq!(transport.released, 2);

    let replies: Vec<YawmdRxInfo> = transport
        .published
        .iter()
        .map(|w| YawmdRxInfo::from_message(&decode_self_encoded(w).unwrap()).unwrap())
        .collect();
    assert_eq!(replies[0].cookie, 1);
    assert_eq!(replies[0].receiver_info.addr, sta(1));
    assert_eq!(replies[1].cookie, 2);
    assert_eq!(replies[1].receiver_info.addr, sta(0));
    assert_eq!(replies[1].timestamp, 10_000 + 1_000_000);
    assert_eq!(replies[1].rx_rate, 1);
}

#[test]
fn malformed_window_is_released_and_dropped() {
    let bridge = HwsimBridge::new(config()).unwrap();
    let mut transport = MemoryTransport::default();
    let mut bad = tx_window(sta(0), 3);
    // Unknown attribute 27 appended inside the announced block.
    bad.extend_from_slice(&[27, 0, 0, 0]);
    let attrs_len = (bad.len() - MessageHeader::SIZE) as u16;
    bad[2..4].copy_from_slice(&attrs_len.to_le_bytes());
    transport.pending.push_back(bad);
    transport.pending.push_back(tx_window(sta(0), 4));

    assert!(bridge.process_pending(&mut transport).unwrap());
    assert!(transport.published.is_empty());
    assert_eq!(transport.released, 1);

    assert!(bridge.process_pending(&mut transport).unwrap());
    let reply = decode_self_encoded(&transport.published[0]).unwrap();
    assert_eq!(reply.attrs.get_u64(HWSIM_ATTR_COOKIE), Some(4));
}

#[test]
fn file_transport_end_to_end() {
    let dir = std::env::temp_dir().join(format!("hwsim-bridge-e2e-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let mut transport = FileTransport::new(dir.join("window"), dir.join("reply"));
    let bridge = HwsimBridge::new(config()).unwrap();

    let mut window = tx_window(sta(1), 9);
    window.resize(4096, 0);
    std::fs::write(transport.window_path(), &window).unwrap();
    assert!(bridge.process_pending(&mut transport).unwrap());
    assert!(!transport.has_pending());

    let replies = std::fs::read(transport.reply_path()).unwrap();
    let header = MessageHeader::from_bytes(&replies).unwrap();
    assert_eq!(header.message_len(), replies.len());
    let rx = YawmdRxInfo::from_message(&decode_self_encoded(&replies).unwrap()).unwrap();
    assert_eq!(rx.cookie, 9);
    assert_eq!(rx.signal as i32, -61);

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn sample_config_parses() {
    let config =
        BridgeConfig::from_toml_str(include_str!("../config-examples/bridge-config.toml")).unwrap();
    assert_eq!(config.radios().len(), 2);
    assert!(HwsimBridge::new(config).is_ok());
}

#[test]
fn unreleasable_window_stops_the_drain() {
    let bridge = HwsimBridge::new(config()).unwrap();
    let mut transport = StuckTransport {
        window: tx_window(sta(0), 5),
        acquired: 0,
        published: 0,
    };

    assert!(matches!(
        bridge.drain_pending(&mut transport),
        Err(Error::ReleaseFailed(_))
    ));
    assert_eq!(transport.acquired, 1);
    assert_eq!(transport.published, 0);
}

#[cfg(target_os = "linux")]
#[test]
fn undeletable_file_window_is_handled_once() {
    let dir = std::env::temp_dir().join(format!("hwsim-bridge-stuck-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let mut transport = FileTransport::new("/proc/self/status".into(), dir.join("reply"));
    let bridge = HwsimBridge::new(config()).unwrap();

    assert!(matches!(
        bridge.drain_pending(&mut transport),
        Err(Error::ReleaseFailed(_))
    ));
    assert!(!transport.reply_path().exists());
    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn drain_is_bounded_per_tick() {
    let bridge = HwsimBridge::new(config()).unwrap();
    let mut transport = MemoryTransport::default();
    for cookie in 0..(MAX_WINDOWS_PER_TICK as u64 + 3) {
        transport.pending.push_back(tx_window(sta(0), cookie));
    }

    assert_eq!(bridge.drain_pending(&mut transport).unwrap(), MAX_WINDOWS_PER_TICK);
    assert_eq!(transport.pending.len(), 3);
    assert_eq!(bridge.drain_pending(&mut transport).unwrap(), 3);
    assert_eq!(bridge.drain_pending(&mut transport).unwrap(), 0);
    assert_eq!(transport.published.len(), MAX_WINDOWS_PER_TICK + 3);
}
