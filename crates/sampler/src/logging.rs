use env_logger::{Builder, Env};

/// Returns the default log filter for the given verbosity flags.
fn default_filter(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs the global logger. `RUST_LOG` takes precedence over the
/// verbosity flags.
pub(crate) fn init(verbose: bool, quiet: bool) {
    let env = Env::default()
        .default_filter_or(default_filter(verbose, quiet));

    let _ = Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
