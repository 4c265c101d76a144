//! Attribute type ids and the policy table of the hwsim family.
//!
//! Ids follow `enum mac80211_hwsim_attributes` of the driver. Id 27 is not assigned.

use tlv_hwsim::{AttributeKind, AttributePolicy, AttributeType, PolicyTable};

use crate::structs::{
    FixedLayout, Ieee80211Header, ReceiverInfo, ETH_ALEN, IEEE80211_MAX_DATA_LEN,
    IEEE80211_MIN_FRAME_LEN, TX_INFO_FLAGS_LEN, TX_INFO_LEN,
};

pub const HWSIM_ATTR_UNSPEC: AttributeType = 0;
pub const HWSIM_ATTR_ADDR_RECEIVER: AttributeType = 1;
pub const HWSIM_ATTR_ADDR_TRANSMITTER: AttributeType = 2;
pub const HWSIM_ATTR_FRAME: AttributeType = 3;
pub const HWSIM_ATTR_FLAGS: AttributeType = 4;
pub const HWSIM_ATTR_RX_RATE: AttributeType = 5;
pub const HWSIM_ATTR_SIGNAL: AttributeType = 6;
pub const HWSIM_ATTR_TX_INFO: AttributeType = 7;
pub const HWSIM_ATTR_COOKIE: AttributeType = 8;
pub const HWSIM_ATTR_CHANNELS: AttributeType = 9;
pub const HWSIM_ATTR_RADIO_ID: AttributeType = 10;
pub const HWSIM_ATTR_REG_HINT_ALPHA2: AttributeType = 11;
pub const HWSIM_ATTR_REG_CUSTOM_REG: AttributeType = 12;
pub const HWSIM_ATTR_REG_STRICT_REG: AttributeType = 13;
pub const HWSIM_ATTR_SUPPORT_P2P_DEVICE: AttributeType = 14;
pub const HWSIM_ATTR_USE_CHANCTX: AttributeType = 15;
pub const HWSIM_ATTR_DESTROY_RADIO_ON_CLOSE: AttributeType = 16;
pub const HWSIM_ATTR_RADIO_NAME: AttributeType = 17;
pub const HWSIM_ATTR_NO_VIF: AttributeType = 18;
pub const HWSIM_ATTR_FREQ: AttributeType = 19;
pub const HWSIM_ATTR_PAD: AttributeType = 20;
pub const HWSIM_ATTR_TX_INFO_FLAGS: AttributeType = 21;
pub const HWSIM_ATTR_PERM_ADDR: AttributeType = 22;
pub const HWSIM_ATTR_IFTYPE_SUPPORT: AttributeType = 23;
pub const HWSIM_ATTR_CIPHER_SUPPORT: AttributeType = 24;
pub const HWSIM_ATTR_FRAME_HEADER: AttributeType = 25;
pub const HWSIM_ATTR_FRAME_LENGTH: AttributeType = 26;
pub const HWSIM_ATTR_RECEIVER_INFO: AttributeType = 28;
pub const HWSIM_ATTR_FRAME_TIMESTAMP: AttributeType = 29;
pub const HWSIM_ATTR_SM_POINTER: AttributeType = 30;
pub const HWSIM_ATTR_SM_PAGE_NUM: AttributeType = 31;

/// Highest attribute id of the family.
pub const HWSIM_ATTR_MAX: AttributeType = HWSIM_ATTR_SM_PAGE_NUM;

const fn u32_attr() -> Option<AttributePolicy<'static>> {
    Some(AttributePolicy::new(AttributeKind::U32))
}

const fn flag_attr() -> Option<AttributePolicy<'static>> {
    Some(AttributePolicy::new(AttributeKind::Flag))
}

const fn binary_attr(len: usize) -> Option<AttributePolicy<'static>> {
    Some(AttributePolicy::new(AttributeKind::Binary).exact_len(len as u16))
}

static ENTRIES: [Option<AttributePolicy<'static>>; HWSIM_ATTR_MAX as usize + 1] = [
    // UNSPEC
    None,
    // ADDR_RECEIVER
    binary_attr(ETH_ALEN),
    // ADDR_TRANSMITTER
    binary_attr(ETH_ALEN),
    // FRAME
    Some(
        AttributePolicy::new(AttributeKind::Binary)
            .len_range(IEEE80211_MIN_FRAME_LEN as u16, IEEE80211_MAX_DATA_LEN as u16),
    ),
    // FLAGS
    u32_attr(),
    // RX_RATE
    u32_attr(),
    // SIGNAL
    u32_attr(),
    // TX_INFO
    binary_attr(TX_INFO_LEN),
    // COOKIE
    Some(AttributePolicy::new(AttributeKind::U64)),
    // CHANNELS
    u32_attr(),
    // RADIO_ID
    u32_attr(),
    // REG_HINT_ALPHA2
    Some(AttributePolicy::new(AttributeKind::String).exact_len(2)),
    // REG_CUSTOM_REG
    u32_attr(),
    // REG_STRICT_REG
    flag_attr(),
    // SUPPORT_P2P_DEVICE
    flag_attr(),
    // USE_CHANCTX
    flag_attr(),
    // DESTROY_RADIO_ON_CLOSE
    flag_attr(),
    // RADIO_NAME
    Some(AttributePolicy::new(AttributeKind::String)),
    // NO_VIF
    flag_attr(),
    // FREQ
    u32_attr(),
    // PAD
    None,
    // TX_INFO_FLAGS
    binary_attr(TX_INFO_FLAGS_LEN),
    // PERM_ADDR
    binary_attr(ETH_ALEN),
    // IFTYPE_SUPPORT
    u32_attr(),
    // CIPHER_SUPPORT
    Some(AttributePolicy::new(AttributeKind::Binary)),
    // FRAME_HEADER
    binary_attr(Ieee80211Header::SIZE),
    // FRAME_LENGTH
    u32_attr(),
    // unassigned
    None,
    // RECEIVER_INFO
    binary_attr(ReceiverInfo::SIZE),
    // FRAME_TIMESTAMP
    Some(AttributePolicy::new(AttributeKind::S64)),
    // SM_POINTER
    Some(AttributePolicy::new(AttributeKind::U64)),
    // SM_PAGE_NUM
    u32_attr(),
];

/// Policy table of the hwsim family, shared by every command.
pub static POLICY: PolicyTable<'static> = PolicyTable::new(&ENTRIES);
