//! The score command: load a cohort of climate CSVs, run the full index
//! pipeline and write the ranked scores.

use crate::{load, scores_io};
use acvi_core::WeightVector;
use acvi_data::crop::Crop;
use acvi_data::season::GrowingSeason;
use acvi_index::{score_cohort, IndexConfig};
use log::info;
use std::fs::File;

pub fn run_score(
    input_dir: &str,
    scores_csv: &str,
    scores_json: Option<&str>,
    crop: &str,
    season_start: u32,
    season_end: u32,
) -> anyhow::Result<()> {
    let crop = Crop::from_name(crop)
        .ok_or_else(|| anyhow::anyhow!("unknown crop '{crop}' (expected wheat or maize)"))?;
    let season = GrowingSeason::new(season_start, season_end)?;
    let config = IndexConfig {
        season,
        crop,
        weights: WeightVector::default(),
    };

    let locations = load::load_locations(input_dir)?;
    let outcome = score_cohort(&locations, &config)?;

    scores_io::write_scores_csv(scores_csv, &outcome)?;
    if let Some(path) = scores_json {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &outcome)?;
    }

    info!("top locations by ACVI:");
    for (position, id) in outcome.ranking.iter().take(10).enumerate() {
        if let Some(card) = outcome.cards.iter().find(|card| &card.location == id) {
            info!("  {}. {} = {:.2}", position + 1, id, card.composite);
        }
    }
    for rejection in &outcome.rejected {
        info!("rejected {}: {}", rejection.location, rejection.reason);
    }
    info!(
        "scored {} locations, output: {scores_csv}",
        outcome.cards.len()
    );
    Ok(())
}
