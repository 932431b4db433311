use geocoord::{
    ConfigurationManager, CoordinateConfig, Derived, FormatRules, FormatStyle, Position,
    PositionBuilder,
};
use std::error::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const STYLES: [FormatStyle; 4] = [
    FormatStyle::Decimal,
    FormatStyle::DecimalDegree,
    FormatStyle::DegreeDecimalMinute,
    FormatStyle::DegreeMinuteSecond,
];

fn init_logging() {
    // Defaults to INFO if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn describe<T, F>(slot: &Derived<T>, show: F) -> String
where
    F: FnOnce(&T) -> String,
{
    match slot {
        Derived::Loaded(value) => show(value),
        Derived::Invalid(reason) => format!("unavailable ({})", reason),
        Derived::Unloaded => "not loaded".to_string(),
    }
}

fn report(position: &Position) {
    for style in STYLES {
        let rules = FormatRules::new(style).with_rounding(style.default_rounding().min(6));
        println!("  {:<24} {}", style.to_string(), position.to_string_with(&rules));
    }
    println!("  {:<24} {}", "UTM", describe(position.grid(), |grid| grid.to_string()));
    println!("  {:<24} {}", "MGRS", describe(position.mgrs(), |mgrs| mgrs.clone()));
    println!(
        "  {:<24} {}",
        "ECEF",
        describe(position.earth_centered(), |ecef| format!(
            "x={:.3} m, y={:.3} m, z={:.3} m",
            ecef.x(),
            ecef.y(),
            ecef.z()
        ))
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "coordinate-demo".to_string());

    let config = if args.first().map(String::as_str) == Some("--config") {
        if args.len() < 2 {
            return Err("--config needs a file path".into());
        }
        let path = args.remove(1);
        args.remove(0);
        *ConfigurationManager::from_file(&path)?.config()
    } else {
        CoordinateConfig::default()
    };

    if args.is_empty() {
        eprintln!("Usage: {} [--config <file>] <coordinate text>...", program);
        eprintln!("   e.g. {} \"47.6062, -122.3321\"", program);
        return Err("Invalid arguments".into());
    }

    let mut failures = 0;
    for text in &args {
        let parsed = geocoord::parse(text).and_then(|(latitude, longitude)| {
            PositionBuilder::new(latitude, longitude)
                .config(&config)
                .build()
        });
        match parsed {
            Ok(position) => {
                info!(input = %text, "parsed coordinate");
                println!("{}", position);
                report(&position);
            }
            Err(err) => {
                warn!(input = %text, error = %err, "could not parse coordinate");
                failures += 1;
            }
        }
    }

    if failures == args.len() {
        return Err("no coordinate could be parsed".into());
    }
    Ok(())
}
