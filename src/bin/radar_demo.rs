// src/bin/radar_demo.rs
//
// Usage: radar_demo <candidates.json> <observer_lat> <observer_lng> [swipes]
use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::time::Instant;
use uuid::Uuid;

use nearby_match::config::AppConfig;
use nearby_match::radar::{RadarEngine, Viewport, ZoomScale, haversine_distance_km};
use nearby_match::swipe::{InMemoryCandidateSource, InMemorySwipeStore, SwipeSession};
use nearby_match::{Candidate, GeoPoint, MatchError, ObserverId};

const DEFAULT_SWIPES: usize = 5;

// Phone-sized radar widget
const DEMO_VIEWPORT: Viewport = Viewport {
    center_x: 180.0,
    center_y: 180.0,
    max_radius_px: 170.0,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        let program = args.first().map(String::as_str).unwrap_or("radar_demo");
        bail!(
            "usage: {} <candidates.json> <observer_lat> <observer_lng> [swipes]",
            program
        );
    }

    let start_time = Instant::now();
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let raw = std::fs::read_to_string(&args[1])
        .with_context(|| format!("Failed to read candidates from {}", args[1]))?;
    let candidates: Vec<Candidate> =
        serde_json::from_str(&raw).context("Failed to parse candidates JSON")?;

    let lat: f64 = args[2].parse().context("Observer latitude is not a number")?;
    let lng: f64 = args[3].parse().context("Observer longitude is not a number")?;
    let observer = GeoPoint::new(lat, lng)?;
    let swipes: usize = match args.get(4) {
        Some(s) => s.parse().context("Swipe count is not a number")?,
        None => DEFAULT_SWIPES,
    };

    let observer_id = ObserverId(Uuid::new_v4().to_string());
    info!(
        "Observer {} at {} with {} candidates",
        observer_id,
        observer,
        candidates.len()
    );

    // Radar pass
    let engine = RadarEngine::new(config.radar.clone());
    let ranked = engine.project_all(observer, &candidates, &DEMO_VIEWPORT, ZoomScale::default());
    for entry in &ranked {
        let p = entry.projection;
        // Great-circle distance for comparison with the flat-earth one
        let great_circle = candidates
            .iter()
            .find(|c| c.id == entry.id)
            .map(|c| haversine_distance_km(observer, c.location))
            .unwrap_or(f64::NAN);
        println!(
            "{:<16} {:>8.2} km  hav={:>8.2} km  r={:>6.1}px  x={:>6.1} y={:>6.1}  op={:.2}",
            entry.id, p.distance_km, great_circle, p.radius_px, p.x, p.y, p.opacity
        );
    }
    info!(
        "Radar shows {} of {} candidates",
        ranked.len(),
        candidates.len()
    );

    // Swipe pass: like every other profile until the limit or the deck runs out
    let source = InMemoryCandidateSource::new(observer, candidates);
    let mut session = SwipeSession::new(observer_id, &config, InMemorySwipeStore::new(), source);
    session
        .refresh()
        .await
        .context("Failed to load swipeable candidates")?;

    for i in 0..swipes {
        let Some(target) = session.batch().peek().map(|c| c.id.clone()) else {
            info!("No more candidates to swipe");
            break;
        };
        match session.swipe_decision(&target, i % 2 == 0).await {
            Ok(outcome) => println!("swipe {:>2}: {:<16} {:?}", i + 1, target, outcome),
            Err(MatchError::LimitReached { resets_at }) => {
                warn!("Swipe limit reached, resets at {:?}", resets_at);
                break;
            }
            Err(e) => return Err(e).context("Swipe failed"),
        }
    }

    info!(
        "Done in {:.2?}: {} swipes left today, {} queued",
        start_time.elapsed(),
        session.remaining_swipes(),
        session.batch().len()
    );
    Ok(())
}
