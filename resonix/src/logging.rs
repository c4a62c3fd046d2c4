use tracing::Level;

pub fn init_logging(level: &str) {
    let level = parse_level(level);
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn parse_level(value: &str) -> Level {
    let value = value.trim();
    if value.eq_ignore_ascii_case("warning") {
        return Level::WARN;
    }
    value.parse::<Level>().unwrap_or(Level::INFO)
}
