use std::{fs::OpenOptions, io, path::Path, str::FromStr};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Crates logging at the configured level. Everything else stays at `warn`.
const BRIDGE_TARGETS: [&str; 4] = ["hwsim_bridge", "attrs_hwsim", "tlv_hwsim", "window_hwsim"];

/// Filter directives for `level`, falling back to `info` when it does not parse.
pub fn bridge_directives(level: Option<&str>) -> String {
    let level = level
        .and_then(|l| LevelFilter::from_str(l).ok())
        .unwrap_or(LevelFilter::INFO)
        .to_string()
        .to_lowercase();
    let mut directives = String::from("warn");
    for target in BRIDGE_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

/// Initialize logging to stdout and optionally to a file.
///
/// A non-empty `RUST_LOG` replaces the directives built from `level`.
pub fn init_logging(level: Option<&str>, log_file: Option<&Path>) {
    let directives = std::env::var("RUST_LOG")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| bridge_directives(level));
    let env_filter = EnvFilter::new(directives);

    let stdout_layer = fmt::layer().with_target(true).with_writer(io::stdout);
    let file_layer = log_file.map(|path| {
        let path = path.to_owned();
        fmt::layer().with_ansi(false).with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .expect("Failed to open log file")
        })
    });

    let subscriber = Registry::default()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global subscriber");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_scope_level_to_bridge_crates() {
        assert_eq!(
            bridge_directives(Some("DEBUG")),
            "warn,hwsim_bridge=debug,attrs_hwsim=debug,tlv_hwsim=debug,window_hwsim=debug"
        );
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(bridge_directives(None), bridge_directives(Some("info")));
        assert_eq!(bridge_directives(Some("chatty")), bridge_directives(Some("info")));
        assert!(bridge_directives(Some("chatty")).ends_with("window_hwsim=info"));
    }
}
