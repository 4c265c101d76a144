//! ## Configuration
//!
//! The bridge reads a TOML file through `ext-config` and deserializes it into [`BridgeConfig`].
//! A minimal file only names the two window paths:
//!
//! ```toml
//! window_path = "/dev/shm/hwsim-window"
//! reply_path = "/dev/shm/hwsim-reply"
//! ```

use std::{path::PathBuf, time::Duration};

use attrs_hwsim::{structs::MacAddress, NewRadio};
use ext_config::{Config, File, FileFormat};
use serde::Deserialize;
use window_hwsim::DEFAULT_WINDOW_CAPACITY;

use crate::error::{BridgeResult, Error};

/// Signal reported for every delivered frame when the config leaves it out.
pub const DEFAULT_SIGNAL_DBM: i32 = -61;
/// Propagation delay added to the transmit timestamp when the config leaves it out.
pub const DEFAULT_RX_DELAY_US: u64 = 1000;

#[derive(Debug, Deserialize, Clone)]
pub struct BridgeConfig {
    window_path: PathBuf,
    reply_path: PathBuf,
    #[serde(default = "default_window_capacity")]
    window_capacity: usize,
    #[serde(default = "default_signal_dbm")]
    signal_dbm: i32,
    #[serde(default = "default_rx_delay_us")]
    rx_delay_us: u64,
    #[serde(
        default = "default_poll_interval",
        deserialize_with = "duration_from_toml"
    )]
    poll_interval: Duration,
    #[serde(default)]
    radios: Vec<RadioConfig>,
    log_file: Option<PathBuf>,
    log_level: Option<String>,
}

fn default_window_capacity() -> usize {
    DEFAULT_WINDOW_CAPACITY
}

fn default_signal_dbm() -> i32 {
    DEFAULT_SIGNAL_DBM
}

fn default_rx_delay_us() -> u64 {
    DEFAULT_RX_DELAY_US
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(10)
}

impl BridgeConfig {
    pub fn new(window_path: PathBuf, reply_path: PathBuf) -> Self {
        Self {
            window_path,
            reply_path,
            window_capacity: default_window_capacity(),
            signal_dbm: default_signal_dbm(),
            rx_delay_us: default_rx_delay_us(),
            poll_interval: default_poll_interval(),
            radios: Vec::new(),
            log_file: None,
            log_level: None,
        }
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(toml: &str) -> BridgeResult<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize::<BridgeConfig>()?)
    }

    pub fn window_path(&self) -> &PathBuf {
        &self.window_path
    }

    pub fn reply_path(&self) -> &PathBuf {
        &self.reply_path
    }

    pub fn window_capacity(&self) -> usize {
        self.window_capacity
    }

    pub fn signal_dbm(&self) -> i32 {
        self.signal_dbm
    }

    pub fn rx_delay_us(&self) -> u64 {
        self.rx_delay_us
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn radios(&self) -> &[RadioConfig] {
        &self.radios
    }

    pub fn with_radios(mut self, radios: Vec<RadioConfig>) -> Self {
        self.radios = radios;
        self
    }

    pub fn log_file(&self) -> Option<&std::path::Path> {
        self.log_file.as_deref()
    }

    pub fn set_log_file(&mut self, log_file: Option<PathBuf>) {
        if let Some(log_file) = log_file {
            self.log_file = Some(log_file);
        }
    }

    /// Level for the bridge crates, `None` leaves the default of `info`.
    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_deref()
    }

    pub fn set_log_level(&mut self, log_level: Option<String>) {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }
    }

    pub fn set_window_path(&mut self, window_path: Option<PathBuf>) {
        if let Some(window_path) = window_path {
            self.window_path = window_path;
        }
    }

    pub fn set_reply_path(&mut self, reply_path: Option<PathBuf>) {
        if let Some(reply_path) = reply_path {
            self.reply_path = reply_path;
        }
    }
}

/// A radio the bridge asks the driver to create on startup.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RadioConfig {
    perm_addr: String,
    #[serde(default = "default_channels")]
    channels: u32,
    radio_name: Option<String>,
    #[serde(default)]
    support_p2p_device: bool,
    #[serde(default)]
    use_chanctx: bool,
    #[serde(default)]
    destroy_radio_on_close: bool,
    #[serde(default)]
    no_vif: bool,
}

fn default_channels() -> u32 {
    1
}

impl RadioConfig {
    pub fn new(perm_addr: impl Into<String>) -> Self {
        Self {
            perm_addr: perm_addr.into(),
            channels: default_channels(),
            radio_name: None,
            support_p2p_device: false,
            use_chanctx: false,
            destroy_radio_on_close: false,
            no_vif: false,
        }
    }

    pub fn perm_addr(&self) -> BridgeResult<MacAddress> {
        parse_mac(&self.perm_addr)
    }
}

impl TryFrom<&RadioConfig> for NewRadio {
    type Error = Error;

    fn try_from(radio: &RadioConfig) -> Result<Self, Self::Error> {
        Ok(NewRadio {
            channels: radio.channels,
            support_p2p_device: radio.support_p2p_device,
            use_chanctx: radio.use_chanctx,
            destroy_radio_on_close: radio.destroy_radio_on_close,
            radio_name: radio.radio_name.clone(),
            no_vif: radio.no_vif,
            perm_addr: radio.perm_addr()?,
            ..Default::default()
        })
    }
}

/// Parses `aa:bb:cc:dd:ee:ff`.
pub fn parse_mac(s: &str) -> BridgeResult<MacAddress> {
    let mut octets = [0u8; 6];
    let mut parts = s.split(':');
    for octet in octets.iter_mut() {
        let part = parts
            .next()
            .filter(|p| p.len() == 2)
            .ok_or_else(|| Error::BadMacAddress(s.to_string()))?;
        *octet = u8::from_str_radix(part, 16).map_err(|_| Error::BadMacAddress(s.to_string()))?;
    }
    if parts.next().is_some() {
        return Err(Error::BadMacAddress(s.to_string()));
    }
    Ok(MacAddress::new(octets))
}

fn duration_from_toml<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Helper {
        unit: String,
        value: u64,
    }

    let helper = Helper::deserialize(deserializer)?;
    match helper.unit.as_str() {
        "seconds" | "secs" | "s" => Ok(Duration::from_secs(helper.value)),
        "milliseconds" | "millis" | "ms" => Ok(Duration::from_millis(helper.value)),
        "microseconds" | "micros" | "us" => Ok(Duration::from_micros(helper.value)),
        unit => Err(serde::de::Error::custom(format!(
            "Unsupported duration unit: {unit}"
        ))),
    }
}
