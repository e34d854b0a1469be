//! Diagnostic output. The library only emits `tracing` events; installing a subscriber is up to
//! the binary.

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

/// Installs a compact `[LEVEL] message` formatter on stderr.
pub fn init(level: Level) {
  let filter = tracing_subscriber::filter::LevelFilter::from_level(level);

  let layer = tracing_subscriber::fmt::layer()
    .with_writer(std::io::stderr)
    .without_time()
    .with_target(false)
    .with_level(true)
    .with_ansi(false)
    .compact()
    .with_filter(filter);

  Registry::default().with(layer).init();
}
