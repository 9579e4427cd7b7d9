use gazeclick_config::defaults::LOG_LEVEL;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Filter directive for a `-v` count, falling back to the configured level.
pub fn directive(verbose: u8, configured: &str) -> &str {
    match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}

/// Level to switch to once the config is loaded. `RUST_LOG` and `-v` were
/// already applied at startup and keep precedence.
fn configured_directive(from_env: bool, verbose: u8, configured: &str) -> Option<&str> {
    (!from_env && verbose == 0).then_some(configured)
}

/// Handle for retuning the global filter after startup
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
    verbose: u8,
}

impl LogHandle {
    /// Apply the level from the loaded configuration.
    pub fn apply_config(&self, configured: &str) {
        let Some(level) = configured_directive(self.from_env, self.verbose, configured) else {
            return;
        };
        if let Err(e) = self.filter.reload(EnvFilter::new(level)) {
            warn!("Failed to apply log level '{}': {}", level, e);
        }
    }
}

/// Install the global subscriber before anything else runs, so config
/// loading is logged too. `RUST_LOG` wins over everything else.
///
/// Logs go to stderr so stdout stays free for action lines.
pub fn init(verbose: u8) -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(directive(verbose, LOG_LEVEL)), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    LogHandle {
        filter: handle,
        from_env,
        verbose,
    }
}
