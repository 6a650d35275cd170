use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger.
///
/// `verbose` lowers the default filter to debug; `RUST_LOG` still wins when set.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // Fails only when a logger is already installed, e.g. across tests.
    let _ = builder.try_init();
}
