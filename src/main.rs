use indoor_navigation::{ConfigurationManager, GeoPoint, NavigationSession, PdrSample};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn parse_start(lat: &str, lng: &str) -> Result<GeoPoint, Box<dyn std::error::Error>> {
    Ok(GeoPoint::new(lat.parse::<f64>()?, lng.parse::<f64>()?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map_or("indoor-navigation", |s| s.as_str());

    if args.len() != 3 && args.len() != 5 {
        eprintln!("Usage: {} <config_json> <samples_json> [start_lat start_lng]", program);
        eprintln!("  samples_json holds an array of {{\"x\", \"y\", \"heading\", \"elevation\"}} readings");
        return Err("Invalid arguments".into());
    }

    let manager = ConfigurationManager::from_file(&args[1])?;
    let start = if args.len() == 5 {
        Some(parse_start(&args[3], &args[4])?)
    } else {
        None
    };

    let samples_data = std::fs::read_to_string(&args[2])?;
    let samples: Vec<PdrSample> = serde_json::from_str(&samples_data)?;

    let mut session = NavigationSession::from_config(&manager, start)?;
    info!(samples = samples.len(), "replaying recording");

    for snapshot in session.replay(&samples) {
        println!("{}", serde_json::to_string(&snapshot)?);
    }

    let last = session.snapshot();
    info!(
        lat = last.position.lat,
        lng = last.position.lng,
        distance_m = last.distance_travelled_m,
        "replay finished"
    );

    Ok(())
}
