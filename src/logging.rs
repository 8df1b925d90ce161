use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Allow RUST_LOG overrides, fall back to the -v flag-controlled level.
/// Default is warn so scheduled runs stay silent on success.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Log to stderr; keep formatting compact
    let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr)
        .with_target(false)
        .compact()
        .init();
}
