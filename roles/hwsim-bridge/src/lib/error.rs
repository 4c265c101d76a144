use ext_config::ConfigError;
use std::fmt;

pub type BridgeResult<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Errors on bad CLI argument input.
    BadCliArgs,
    /// Errors on bad `config` TOML deserialize.
    BadConfigDeserialize(ConfigError),
    /// A MAC address in the config does not parse.
    BadMacAddress(String),
    /// Errors from the `attrs_hwsim` crate.
    Hwsim(attrs_hwsim::Error),
    /// Errors reading or publishing a window.
    Io(std::io::Error),
    /// A consumed window could not be handed back and would be read again.
    ReleaseFailed(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Error::*;
        match self {
            BadCliArgs => write!(f, "Bad CLI arg input"),
            BadConfigDeserialize(ref e) => write!(f, "Bad `config` TOML deserialize: `{:?}`", e),
            BadMacAddress(ref s) => write!(f, "Bad MAC address in config: `{s}`"),
            Hwsim(ref e) => write!(f, "Hwsim message error: `{e}`"),
            Io(ref e) => write!(f, "I/O error: `{:?}`", e),
            ReleaseFailed(ref e) => write!(f, "Window release failed: `{:?}`", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::BadConfigDeserialize(e)
    }
}

impl From<attrs_hwsim::Error> for Error {
    fn from(e: attrs_hwsim::Error) -> Self {
        Error::Hwsim(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl Error {
    /// Whether the error concerns a single message and the bridge can carry on with the next one.
    pub fn is_per_message(&self) -> bool {
        matches!(self, Error::Hwsim(_))
    }
}
