//! Whole messages and typed views of the ones a medium simulator handles.

use alloc::{string::String, vec, vec::Vec};

use tlv_hwsim::{
    decode, encode_into, encoded_len, select_mode, AttrValue, AttributeTable, AttributeType,
    EncodeError, OperationContext,
};
#[cfg(feature = "tracing")]
use tracing::debug;
use window_hwsim::WindowWriter;

use crate::{
    attrs::*,
    structs::{
        read_array, write_array, FixedLayout, Frame, Ieee80211Header, MacAddress,
        ReceiverInfo, TxRate, TxRateFlag, IEEE80211_TX_MAX_RATES,
    },
    Error, HwsimCmd, MessageHeader, Result, POLICY,
};

/// A decoded message. Attribute values borrow from the window.
#[derive(Debug, Clone, PartialEq)]
pub struct Message<'w> {
    pub header: MessageHeader,
    pub cmd: HwsimCmd,
    pub attrs: AttributeTable<'w>,
}

/// Decodes a message received from the peer, validating strictly or liberally according to the
/// command.
pub fn decode_message(window: &[u8]) -> Result<Message<'_>> {
    decode_with(window, HwsimCmd::peer_context)
}

/// Decodes a message this side encoded. Always liberal.
pub fn decode_self_encoded(window: &[u8]) -> Result<Message<'_>> {
    decode_with(window, |_| OperationContext::self_encoded())
}

fn decode_with(
    window: &[u8],
    context: impl FnOnce(HwsimCmd) -> OperationContext,
) -> Result<Message<'_>> {
    let header = MessageHeader::from_bytes(window)?;
    let cmd = HwsimCmd::try_from(header.cmd)?;
    let body = window
        .get(MessageHeader::SIZE..header.message_len())
        .ok_or(Error::AttrsLenOverflow {
            attrs_len: header.attrs_len as usize,
            available: window.len() - MessageHeader::SIZE,
        })?;

    let mode = select_mode(&context(cmd));
    #[cfg(feature = "tracing")]
    debug!("decoding {:?} ({} attribute bytes, {:?})", cmd, body.len(), mode);
    let attrs = decode(body, &POLICY, mode)?;

    Ok(Message { header, cmd, attrs })
}

/// Encodes `attrs` as a `cmd` message of at most `capacity` bytes.
pub fn encode_message(
    cmd: HwsimCmd,
    attrs: &AttributeTable<'_>,
    capacity: usize,
) -> Result<Vec<u8>> {
    let attrs_len = encoded_len(attrs, &POLICY)?;
    let required = MessageHeader::SIZE + attrs_len;
    let attrs_len_field = u16::try_from(attrs_len).map_err(|_| EncodeError::CapacityExceeded {
        required,
        capacity: MessageHeader::SIZE + u16::MAX as usize,
    })?;
    if required > capacity {
        return Err(EncodeError::CapacityExceeded { required, capacity }.into());
    }

    let mut buf = vec![0u8; required];
    MessageHeader::new(cmd.into(), attrs_len_field).write(&mut WindowWriter::new(&mut buf))?;
    let body = buf
        .get_mut(MessageHeader::SIZE..)
        .ok_or(EncodeError::CapacityExceeded { required, capacity })?;
    encode_into(attrs, &POLICY, body)?;
    Ok(buf)
}

fn expect_cmd(message: &Message<'_>, expected: HwsimCmd) -> Result<()> {
    if message.cmd != expected {
        return Err(Error::UnexpectedCommand {
            expected: expected.into(),
            actual: message.cmd.into(),
        });
    }
    Ok(())
}

fn bytes<'a>(attrs: &'a AttributeTable<'_>, t: AttributeType) -> Result<&'a [u8]> {
    attrs.get_bytes(t).ok_or(Error::MissingAttribute(t))
}

fn fixed<T: FixedLayout>(attrs: &AttributeTable<'_>, t: AttributeType) -> Result<T> {
    T::from_bytes(bytes(attrs, t)?)
}

fn optional_fixed<T: FixedLayout + Default>(
    attrs: &AttributeTable<'_>,
    t: AttributeType,
) -> Result<T> {
    match attrs.get_bytes(t) {
        Some(b) => T::from_bytes(b),
        None => Ok(T::default()),
    }
}

fn required_u64(attrs: &AttributeTable<'_>, t: AttributeType) -> Result<u64> {
    attrs.get_u64(t).ok_or(Error::MissingAttribute(t))
}

/// Frame transmission report the driver sends to the medium (`HWSIM_YAWMD_TX_INFO`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YawmdTxInfo {
    pub addr_transmitter: MacAddress,
    pub flags: u32,
    /// The transmitted frame, when the driver forwards it whole.
    pub frame: Option<Frame>,
    pub tx_info: [TxRate; IEEE80211_TX_MAX_RATES],
    pub cookie: u64,
    pub freq: u32,
    pub tx_info_flags: [TxRateFlag; IEEE80211_TX_MAX_RATES],
    pub frame_header: Ieee80211Header,
    pub frame_length: u32,
    /// Transmission time in nanoseconds.
    pub timestamp: i64,
}

impl YawmdTxInfo {
    pub fn from_message(message: &Message<'_>) -> Result<Self> {
        expect_cmd(message, HwsimCmd::YawmdTxInfo)?;
        Self::from_attrs(&message.attrs)
    }

    /// The transmitter address, the rate table and the cookie are mandatory. Everything else
    /// defaults to zero when absent.
    pub fn from_attrs(attrs: &AttributeTable<'_>) -> Result<Self> {
        Ok(Self {
            addr_transmitter: fixed(attrs, HWSIM_ATTR_ADDR_TRANSMITTER)?,
            flags: attrs.get_u32(HWSIM_ATTR_FLAGS).unwrap_or_default(),
            frame: attrs
                .get_bytes(HWSIM_ATTR_FRAME)
                .map(Frame::from_bytes)
                .transpose()?,
            tx_info: read_array(bytes(attrs, HWSIM_ATTR_TX_INFO)?)?,
            cookie: required_u64(attrs, HWSIM_ATTR_COOKIE)?,
            freq: attrs.get_u32(HWSIM_ATTR_FREQ).unwrap_or_default(),
            tx_info_flags: match attrs.get_bytes(HWSIM_ATTR_TX_INFO_FLAGS) {
                Some(b) => read_array(b)?,
                None => Default::default(),
            },
            frame_header: optional_fixed(attrs, HWSIM_ATTR_FRAME_HEADER)?,
            frame_length: attrs.get_u32(HWSIM_ATTR_FRAME_LENGTH).unwrap_or_default(),
            timestamp: attrs.get_i64(HWSIM_ATTR_FRAME_TIMESTAMP).unwrap_or_default(),
        })
    }

    pub fn to_attrs(&self) -> AttributeTable<'static> {
        let attrs = AttributeTable::new()
            .with(HWSIM_ATTR_ADDR_TRANSMITTER, self.addr_transmitter.to_vec())
            .with(HWSIM_ATTR_FLAGS, self.flags)
            .with(HWSIM_ATTR_TX_INFO, write_array(&self.tx_info))
            .with(HWSIM_ATTR_COOKIE, self.cookie)
            .with(HWSIM_ATTR_FREQ, self.freq)
            .with(HWSIM_ATTR_TX_INFO_FLAGS, write_array(&self.tx_info_flags))
            .with(HWSIM_ATTR_FRAME_HEADER, self.frame_header.to_vec())
            .with(HWSIM_ATTR_FRAME_LENGTH, self.frame_length)
            .with(HWSIM_ATTR_FRAME_TIMESTAMP, self.timestamp);
        match &self.frame {
            Some(frame) => attrs.with(HWSIM_ATTR_FRAME, frame.to_vec()),
            None => attrs,
        }
    }
}

/// Reception report the medium sends back to the driver (`HWSIM_YAWMD_RX_INFO`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YawmdRxInfo {
    pub addr_transmitter: MacAddress,
    pub flags: u32,
    pub rx_rate: u32,
    /// Signal in dBm as a two's complement bit pattern.
    pub signal: u32,
    pub tx_info: [TxRate; IEEE80211_TX_MAX_RATES],
    pub cookie: u64,
    pub freq: u32,
    /// Reception time in nanoseconds.
    pub timestamp: i64,
    pub receiver_info: ReceiverInfo,
}

impl YawmdRxInfo {
    pub fn from_message(message: &Message<'_>) -> Result<Self> {
        expect_cmd(message, HwsimCmd::YawmdRxInfo)?;
        Self::from_attrs(&message.attrs)
    }

    pub fn from_attrs(attrs: &AttributeTable<'_>) -> Result<Self> {
        Ok(Self {
            addr_transmitter: fixed(attrs, HWSIM_ATTR_ADDR_TRANSMITTER)?,
            flags: attrs.get_u32(HWSIM_ATTR_FLAGS).unwrap_or_default(),
            rx_rate: attrs.get_u32(HWSIM_ATTR_RX_RATE).unwrap_or_default(),
            signal: attrs.get_u32(HWSIM_ATTR_SIGNAL).unwrap_or_default(),
            tx_info: read_array(bytes(attrs, HWSIM_ATTR_TX_INFO)?)?,
            cookie: required_u64(attrs, HWSIM_ATTR_COOKIE)?,
            freq: attrs.get_u32(HWSIM_ATTR_FREQ).unwrap_or_default(),
            timestamp: attrs.get_i64(HWSIM_ATTR_FRAME_TIMESTAMP).unwrap_or_default(),
            receiver_info: fixed(attrs, HWSIM_ATTR_RECEIVER_INFO)?,
        })
    }

    pub fn to_attrs(&self) -> AttributeTable<'static> {
        AttributeTable::new()
            .with(HWSIM_ATTR_ADDR_TRANSMITTER, self.addr_transmitter.to_vec())
            .with(HWSIM_ATTR_FLAGS, self.flags)
            .with(HWSIM_ATTR_RX_RATE, self.rx_rate)
            .with(HWSIM_ATTR_SIGNAL, self.signal)
            .with(HWSIM_ATTR_TX_INFO, write_array(&self.tx_info))
            .with(HWSIM_ATTR_COOKIE, self.cookie)
            .with(HWSIM_ATTR_FREQ, self.freq)
            .with(HWSIM_ATTR_FRAME_TIMESTAMP, self.timestamp)
            .with(HWSIM_ATTR_RECEIVER_INFO, self.receiver_info.to_vec())
    }
}

/// Request to create a radio (`HWSIM_CMD_NEW_RADIO`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewRadio {
    pub channels: u32,
    pub reg_hint_alpha2: Option<String>,
    pub reg_custom_reg: Option<u32>,
    pub reg_strict_reg: bool,
    pub support_p2p_device: bool,
    pub use_chanctx: bool,
    pub destroy_radio_on_close: bool,
    pub radio_name: Option<String>,
    pub no_vif: bool,
    pub perm_addr: MacAddress,
    pub iftype_support: Option<u32>,
    pub cipher_support: Vec<u32>,
}

impl NewRadio {
    /// Boolean options are emitted as flags only when set.
    pub fn to_attrs(&self) -> AttributeTable<'static> {
        let mut attrs = AttributeTable::new().with(HWSIM_ATTR_CHANNELS, self.channels);
        if let Some(alpha2) = &self.reg_hint_alpha2 {
            attrs.insert(HWSIM_ATTR_REG_HINT_ALPHA2, alpha2.clone());
        }
        if let Some(reg) = self.reg_custom_reg {
            attrs.insert(HWSIM_ATTR_REG_CUSTOM_REG, reg);
        }
        for (set, t) in [
            (self.reg_strict_reg, HWSIM_ATTR_REG_STRICT_REG),
            (self.support_p2p_device, HWSIM_ATTR_SUPPORT_P2P_DEVICE),
            (self.use_chanctx, HWSIM_ATTR_USE_CHANCTX),
            (self.destroy_radio_on_close, HWSIM_ATTR_DESTROY_RADIO_ON_CLOSE),
            (self.no_vif, HWSIM_ATTR_NO_VIF),
        ] {
            if set {
                attrs.insert(t, AttrValue::Flag);
            }
        }
        if let Some(name) = &self.radio_name {
            attrs.insert(HWSIM_ATTR_RADIO_NAME, name.clone());
        }
        attrs.insert(HWSIM_ATTR_PERM_ADDR, self.perm_addr.to_vec());
        if let Some(iftypes) = self.iftype_support {
            attrs.insert(HWSIM_ATTR_IFTYPE_SUPPORT, iftypes);
        }
        if !self.cipher_support.is_empty() {
            let suites: Vec<u8> = self
                .cipher_support
                .iter()
                .flat_map(|s| s.to_le_bytes())
                .collect();
            attrs.insert(HWSIM_ATTR_CIPHER_SUPPORT, suites);
        }
        attrs
    }
}
