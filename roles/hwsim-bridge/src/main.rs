use hwsim_bridge::{logging::init_logging, transport::FileTransport, HwsimBridge};
use tracing::error;

use crate::args::process_cli_args;

mod args;

#[tokio::main]
async fn main() {
    let config = process_cli_args().unwrap_or_else(|e| {
        eprintln!("hwsim bridge config error: {e}");
        std::process::exit(1);
    });

    init_logging(config.log_level(), config.log_file());
    let transport = FileTransport::new(config.window_path().clone(), config.reply_path().clone());
    let bridge = HwsimBridge::new(config).unwrap_or_else(|e| {
        error!("hwsim bridge config error: {e}");
        std::process::exit(1);
    });

    if let Err(e) = bridge.start(transport).await {
        error!("hwsim bridge stopped: {e}");
        std::process::exit(1);
    }
}
