use std::io::stderr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[cfg(debug_assertions)]
const FMT_PRETTY: bool = true;

#[cfg(not(debug_assertions))]
const FMT_PRETTY: bool = false;

const QUIET_DIRECTIVES: [&str; 6] = [
    "reqwest=info",
    "reqwest_tracing=warn",
    "rustls=info",
    "tower=info",
    "hyper=info",
    "h2=info",
];

pub fn init() {
    // Extra directives keep RUST_LOG=debug focused on the mirror itself
    let tracing_env_filter = QUIET_DIRECTIVES.iter().fold(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy(),
        |filter, directive| match directive.parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    );

    // Pretty and verbose output during development,
    // concise output for CI logs in release builds.
    if FMT_PRETTY {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_env_filter)
            .with_writer(stderr)
            .pretty()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_env_filter)
            .with_writer(stderr)
            .with_target(false)
            .without_time()
            .init();
    }
}
