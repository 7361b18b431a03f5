//! Opt-in log output.
//!
//! The library only emits `tracing` events. Nothing is printed unless the
//! embedding program installs a subscriber, e.g. with [`init_logging`].

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG`, `verbose` selects `debug` for this workspace's crates,
/// otherwise `warn`. Returns `false` if a global subscriber was already set.
pub fn init_logging(verbose: bool) -> bool {
    let default_directive = if verbose {
        "warn,cfn_manage=debug,cfn_manage_core=debug,cfn_manage_aws=debug,cfn_manage_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
