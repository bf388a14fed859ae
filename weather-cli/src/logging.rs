use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber; `verbosity` is the `-v` count.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::new(format!(
        "weather={level},weather_core={level}",
        level = level_for(verbosity)
    ));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
