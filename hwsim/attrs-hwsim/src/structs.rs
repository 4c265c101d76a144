//! Fixed-layout payloads carried inside binary attributes.
//!
//! These mirror packed C structs of the driver, so they are read and written field by field
//! through the window cursors rather than by transmuting bytes.

use alloc::vec::Vec;
use core::fmt;

use window_hwsim::{WindowError, WindowReader, WindowWriter};

use crate::Error;

pub const ETH_ALEN: usize = 6;
pub const IEEE80211_TX_MAX_RATES: usize = 4;
/// Largest 802.11 frame body the driver forwards.
pub const IEEE80211_MAX_DATA_LEN: usize = 2304;
/// Size of a three-address 802.11 header, the shortest frame the driver accepts.
pub const IEEE80211_MIN_FRAME_LEN: usize = 24;
/// Payload size of `HWSIM_ATTR_TX_INFO`.
pub const TX_INFO_LEN: usize = IEEE80211_TX_MAX_RATES * TxRate::SIZE;
/// Payload size of `HWSIM_ATTR_TX_INFO_FLAGS`.
pub const TX_INFO_FLAGS_LEN: usize = IEEE80211_TX_MAX_RATES * TxRateFlag::SIZE;

/// A struct with a fixed little-endian wire layout.
pub trait FixedLayout: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn read(reader: &mut WindowReader<'_>) -> Result<Self, WindowError>;

    fn write(&self, writer: &mut WindowWriter<'_>) -> Result<(), WindowError>;

    /// Parses exactly [`Self::SIZE`] bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::SIZE {
            return Err(Error::PayloadSize {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }
        Ok(Self::read(&mut WindowReader::new(bytes))?)
    }

    fn to_vec(&self) -> Vec<u8> {
        let mut buf = alloc::vec![0u8; Self::SIZE];
        // `buf` is exactly `SIZE` bytes, so the writer cannot run out of room.
        let _ = self.write(&mut WindowWriter::new(&mut buf));
        buf
    }
}

/// Reads `N` consecutive records of `T`.
pub fn read_array<T: FixedLayout + Default + Copy, const N: usize>(
    bytes: &[u8],
) -> Result<[T; N], Error> {
    let expected = T::SIZE * N;
    if bytes.len() != expected {
        return Err(Error::PayloadSize {
            expected,
            actual: bytes.len(),
        });
    }
    let mut reader = WindowReader::new(bytes);
    let mut out = [T::default(); N];
    for slot in out.iter_mut() {
        *slot = T::read(&mut reader)?;
    }
    Ok(out)
}

/// Writes `items` back to back.
pub fn write_array<T: FixedLayout>(items: &[T]) -> Vec<u8> {
    let mut buf = alloc::vec![0u8; T::SIZE * items.len()];
    let mut writer = WindowWriter::new(&mut buf);
    for item in items {
        let _ = item.write(&mut writer);
    }
    buf
}

/// 48-bit IEEE 802 MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddress(pub [u8; ETH_ALEN]);

impl MacAddress {
    pub const fn new(octets: [u8; ETH_ALEN]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; ETH_ALEN] {
        self.0
    }
}

impl From<[u8; ETH_ALEN]> for MacAddress {
    fn from(octets: [u8; ETH_ALEN]) -> Self {
        Self(octets)
    }
}

impl FixedLayout for MacAddress {
    const SIZE: usize = ETH_ALEN;

    fn read(reader: &mut WindowReader<'_>) -> Result<Self, WindowError> {
        let mut octets = [0u8; ETH_ALEN];
        octets.copy_from_slice(reader.read_bytes(ETH_ALEN)?);
        Ok(Self(octets))
    }

    fn write(&self, writer: &mut WindowWriter<'_>) -> Result<(), WindowError> {
        writer.write_all(&self.0)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// One entry of the rate table a frame was sent with (`struct hwsim_tx_rate`).
///
/// `idx < 0` marks the end of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxRate {
    pub idx: i8,
    pub count: u8,
}

impl FixedLayout for TxRate {
    const SIZE: usize = 2;

    fn read(reader: &mut WindowReader<'_>) -> Result<Self, WindowError> {
        Ok(Self {
            idx: reader.read_u8()? as i8,
            count: reader.read_u8()?,
        })
    }

    fn write(&self, writer: &mut WindowWriter<'_>) -> Result<(), WindowError> {
        writer.write_u8(self.idx as u8)?;
        writer.write_u8(self.count)
    }
}

/// Per-rate flags (`struct hwsim_tx_rate_flag`, packed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxRateFlag {
    pub idx: i8,
    pub flags: u16,
}

impl FixedLayout for TxRateFlag {
    const SIZE: usize = 3;

    fn read(reader: &mut WindowReader<'_>) -> Result<Self, WindowError> {
        Ok(Self {
            idx: reader.read_u8()? as i8,
            flags: reader.read_u16_le()?,
        })
    }

    fn write(&self, writer: &mut WindowWriter<'_>) -> Result<(), WindowError> {
        writer.write_u8(self.idx as u8)?;
        writer.write_u16_le(self.flags)
    }
}

/// Who received a frame and how strong it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReceiverInfo {
    pub addr: MacAddress,
    /// Signal in dBm, stored as the two's complement bit pattern the driver expects.
    pub signal: u32,
}

impl FixedLayout for ReceiverInfo {
    const SIZE: usize = ETH_ALEN + 4;

    fn read(reader: &mut WindowReader<'_>) -> Result<Self, WindowError> {
        Ok(Self {
            addr: MacAddress::read(reader)?,
            signal: reader.read_u32_le()?,
        })
    }

    fn write(&self, writer: &mut WindowWriter<'_>) -> Result<(), WindowError> {
        self.addr.write(writer)?;
        writer.write_u32_le(self.signal)
    }
}

/// 802.11 MAC header with the fourth address and QoS control present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ieee80211Header {
    pub frame_control: [u8; 2],
    pub duration_id: [u8; 2],
    pub addr1: MacAddress,
    pub addr2: MacAddress,
    pub addr3: MacAddress,
    pub seq_ctrl: [u8; 2],
    pub addr4: MacAddress,
    pub qos: [u8; 2],
}

fn read_pair(reader: &mut WindowReader<'_>) -> Result<[u8; 2], WindowError> {
    let bytes = reader.read_bytes(2)?;
    Ok([bytes[0], bytes[1]])
}

impl FixedLayout for Ieee80211Header {
    const SIZE: usize = 2 + 2 + 3 * ETH_ALEN + 2 + ETH_ALEN + 2;

    fn read(reader: &mut WindowReader<'_>) -> Result<Self, WindowError> {
        Ok(Self {
            frame_control: read_pair(reader)?,
            duration_id: read_pair(reader)?,
            addr1: MacAddress::read(reader)?,
            addr2: MacAddress::read(reader)?,
            addr3: MacAddress::read(reader)?,
            seq_ctrl: read_pair(reader)?,
            addr4: MacAddress::read(reader)?,
            qos: read_pair(reader)?,
        })
    }

    fn write(&self, writer: &mut WindowWriter<'_>) -> Result<(), WindowError> {
        writer.write_all(&self.frame_control)?;
        writer.write_all(&self.duration_id)?;
        self.addr1.write(writer)?;
        self.addr2.write(writer)?;
        self.addr3.write(writer)?;
        writer.write_all(&self.seq_ctrl)?;
        self.addr4.write(writer)?;
        writer.write_all(&self.qos)
    }
}

/// Contents of `HWSIM_ATTR_FRAME`: the MAC header followed by the frame body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub header: Ieee80211Header,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Splits a frame into header and body. Frames shorter than [`Ieee80211Header::SIZE`] are
    /// rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < Ieee80211Header::SIZE {
            return Err(Error::PayloadSize {
                expected: Ieee80211Header::SIZE,
                actual: bytes.len(),
            });
        }
        let mut reader = WindowReader::new(bytes);
        let header = Ieee80211Header::read(&mut reader)?;
        let body = reader.remaining();
        Ok(Self {
            header,
            payload: reader.read_bytes(body)?.to_vec(),
        })
    }

    pub fn to_vec(&self) -> Vec<u8> {
        let mut buf = self.header.to_vec();
        buf.extend_from_slice(&self.payload);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_sizes() {
        assert_eq!(TX_INFO_LEN, 8);
        assert_eq!(TX_INFO_FLAGS_LEN, 12);
        assert_eq!(ReceiverInfo::SIZE, 10);
        assert_eq!(Ieee80211Header::SIZE, 32);
    }

    #[test]
    fn test_receiver_info_layout() {
        let info = ReceiverInfo {
            addr: MacAddress::new([0x42, 0, 0, 0, 1, 0]),
            signal: (-61i32) as u32,
        };
        let bytes = info.to_vec();
        assert_eq!(bytes, [0x42, 0, 0, 0, 1, 0, 0xc3, 0xff, 0xff, 0xff]);
        assert_eq!(ReceiverInfo::from_bytes(&bytes).unwrap(), info);
    }

    #[test]
    fn test_wrong_size_rejected() {
        assert_eq!(
            MacAddress::from_bytes(&[1, 2, 3]),
            Err(Error::PayloadSize {
                expected: 6,
                actual: 3
            })
        );
        assert!(read_array::<TxRate, 4>(&[0; 7]).is_err());
    }

    #[test]
    fn test_rate_tables() {
        let bytes = [5, 1, 3, 2, 0xff, 0, 0xff, 0];
        let rates: [TxRate; 4] = read_array(&bytes).unwrap();
        assert_eq!(rates[0], TxRate { idx: 5, count: 1 });
        assert_eq!(rates[2].idx, -1);
        assert_eq!(write_array(&rates), bytes);

        let bytes = [1, 0x10, 0x00, 0xff, 0, 0, 0xff, 0, 0, 0xff, 0, 0];
        let flags: [TxRateFlag; 4] = read_array(&bytes).unwrap();
        assert_eq!(flags[0], TxRateFlag { idx: 1, flags: 0x10 });
        assert_eq!(write_array(&flags), bytes);
    }

    #[test]
    fn test_mac_display() {
        let mac = MacAddress::new([0x42, 0, 0, 0, 0x1a, 0xff]);
        assert_eq!(mac.to_string(), "42:00:00:00:1a:ff");
    }

    #[test]
    fn test_frame_split() {
        let mut bytes = alloc::vec![0u8; Ieee80211Header::SIZE];
        bytes[0] = 0x88;
        bytes[4..10].copy_from_slice(&[0xff; 6]);
        bytes[10..16].copy_from_slice(&[0x42, 0, 0, 0, 1, 0]);
        bytes.extend_from_slice(b"\xaa\xaa\x03body");

        let frame = Frame::from_bytes(&bytes).unwrap();
        assert_eq!(frame.header.frame_control, [0x88, 0]);
        assert_eq!(frame.header.addr1, MacAddress::new([0xff; 6]));
        assert_eq!(frame.header.addr2, MacAddress::new([0x42, 0, 0, 0, 1, 0]));
        assert_eq!(frame.payload, b"\xaa\xaa\x03body");
        assert_eq!(frame.to_vec(), bytes);

        let bare = Frame::from_bytes(&bytes[..Ieee80211Header::SIZE]).unwrap();
        assert!(bare.payload.is_empty());
    }

    #[test]
    fn test_short_frame_rejected() {
        assert_eq!(
            Frame::from_bytes(&[0u8; IEEE80211_MIN_FRAME_LEN]),
            Err(Error::PayloadSize {
                expected: Ieee80211Header::SIZE,
                actual: IEEE80211_MIN_FRAME_LEN
            })
        );
        assert!(Frame::from_bytes(&[]).is_err());
    }

    #[quickcheck]
    fn prop_header_roundtrip(bytes: alloc::vec::Vec<u8>) -> bool {
        if bytes.len() < Ieee80211Header::SIZE {
            return true;
        }
        let bytes = &bytes[..Ieee80211Header::SIZE];
        let header = Ieee80211Header::from_bytes(bytes).unwrap();
        header.to_vec() == bytes
    }
}
