use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt::time, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` is honoured on top of the defaults: debug builds log this crate at
/// `debug`, release builds at `info`.
///
/// Call once, early. A second call fails because a global subscriber is already set.
pub fn init() -> anyhow::Result<()> {
    let crate_level = if cfg!(debug_assertions) {
        "frame_toolbox=debug"
    } else {
        "frame_toolbox=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_timer(time::uptime()),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env()?
                .add_directive(crate_level.parse()?),
        )
        .try_init()?;
    Ok(())
}
