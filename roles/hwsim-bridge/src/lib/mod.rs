//! # `hwsim_bridge`
//!
//! A minimal medium simulator for mac80211_hwsim. On startup the bridge registers with the driver
//! and asks it to create the configured radios. It then polls the transport for windows, answers
//! every TX-info report with an RX-info reply and drops everything else.

use std::time::Duration;

use attrs_hwsim::{encode_message, HwsimCmd, NewRadio};
use tlv_hwsim::AttributeTable;
use tracing::{debug, error, info, warn};

use crate::{
    config::BridgeConfig,
    error::BridgeResult,
    responder::Responder,
    transport::WindowTransport,
};

pub mod config;
pub mod error;
pub mod logging;
pub mod responder;
pub mod transport;

/// Upper bound on windows handled per poll tick, so shutdown is noticed under load.
pub const MAX_WINDOWS_PER_TICK: usize = 64;

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct HwsimBridge {
    config: BridgeConfig,
    responder: Responder,
}

impl HwsimBridge {
    pub fn new(config: BridgeConfig) -> BridgeResult<Self> {
        let responder = Responder::from_config(&config)?;
        Ok(Self { config, responder })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Registers as the medium and requests one radio per configured entry.
    pub fn register<T: WindowTransport>(&self, transport: &mut T) -> BridgeResult<()> {
        let capacity = self.config.window_capacity();
        let register = encode_message(HwsimCmd::Register, &AttributeTable::new(), capacity)?;
        transport.publish(&register)?;

        for radio in self.config.radios() {
            let radio = NewRadio::try_from(radio)?;
            info!("requesting radio {}", radio.perm_addr);
            let message = encode_message(HwsimCmd::NewRadio, &radio.to_attrs(), capacity)?;
            transport.publish(&message)?;
        }
        Ok(())
    }

    /// Handles at most one pending window. Returns whether a window was consumed.
    ///
    /// The window is released before the reply is published. A window that fails to decode is
    /// dropped. Transport failures, including a window that cannot be released, are returned as
    /// errors.
    pub fn process_pending<T: WindowTransport>(&self, transport: &mut T) -> BridgeResult<bool> {
        if !transport.has_pending() {
            return Ok(false);
        }
        let window = transport.acquire_window(self.config.window_capacity())?;
        let reply = self.responder.handle(&window);
        window.release()?;

        match reply {
            Ok(Some(reply)) => transport.publish(&reply)?,
            Ok(None) => {}
            Err(e) if e.is_per_message() => warn!("dropping window: {e}"),
            Err(e) => return Err(e),
        }
        Ok(true)
    }

    /// Handles pending windows until none is left or [`MAX_WINDOWS_PER_TICK`] were handled.
    pub fn drain_pending<T: WindowTransport>(&self, transport: &mut T) -> BridgeResult<usize> {
        let mut handled = 0;
        while handled < MAX_WINDOWS_PER_TICK && self.process_pending(transport)? {
            handled += 1;
        }
        Ok(handled)
    }

    /// Registers, then serves windows until Ctrl+C or a transport failure.
    pub async fn start<T: WindowTransport>(self, mut transport: T) -> BridgeResult<()> {
        info!(
            "hwsim bridge starting, window {}",
            self.config.window_path().display()
        );
        self.register(&mut transport)?;

        let period = self.config.poll_interval().max(MIN_POLL_INTERVAL);
        let mut ticker = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Ctrl+C received, shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let handled = self.drain_pending(&mut transport).inspect_err(|e| {
                        error!("transport failure: {e}");
                    })?;
                    if handled > 0 {
                        debug!("handled {handled} windows");
                    }
                }
            }
        }
        Ok(())
    }
}
