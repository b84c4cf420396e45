//! Scores CSV round-trip: the ranked per-location output of the score
//! command, which the analyze and validate commands read back.

use acvi_core::{Component, ComponentScores, ScoreCard, WeightVector};
use acvi_index::CohortOutcome;
use anyhow::Context;
use csv::{ReaderBuilder, StringRecord, Writer};

/// Write the cohort outcome as a CSV ranked by descending composite score.
///
/// Columns: location, acvi_score, the four normalized components by name,
/// the four raw components prefixed `raw_`, and a semicolon-joined
/// `degraded` list.
pub fn write_scores_csv(path: &str, outcome: &CohortOutcome) -> anyhow::Result<()> {
    let mut writer =
        Writer::from_path(path).with_context(|| format!("creating scores CSV {path}"))?;
    let mut header = vec!["location".to_string(), "acvi_score".to_string()];
    for component in Component::ALL {
        header.push(component.as_str().to_string());
    }
    for component in Component::ALL {
        header.push(format!("raw_{component}"));
    }
    header.push("degraded".to_string());
    writer.write_record(&header)?;

    for id in &outcome.ranking {
        let Some(card) = outcome.cards.iter().find(|card| &card.location == id) else {
            continue;
        };
        let mut row = vec![card.location.clone(), format!("{:.6}", card.composite)];
        for component in Component::ALL {
            row.push(format!("{:.6}", card.normalized.get(component)));
        }
        for component in Component::ALL {
            row.push(format!("{:.6}", card.raw.get(component)));
        }
        row.push(
            card.degraded
                .iter()
                .map(|component| component.as_str())
                .collect::<Vec<_>>()
                .join(";"),
        );
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read score cards back from a scores CSV.
///
/// Cards carry the canonical default weights; the analyze command owns the
/// weight configuration, not the file.
pub fn read_scores_csv(path: &str) -> anyhow::Result<Vec<ScoreCard>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading scores CSV {path}"))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .with_context(|| format!("scores CSV missing '{name}' column"))
    };

    let location_column = column("location")?;
    let score_column = column("acvi_score")?;
    let mut normalized_columns = [0usize; 4];
    let mut raw_columns = [0usize; 4];
    for component in Component::ALL {
        normalized_columns[component.index()] = column(component.as_str())?;
        raw_columns[component.index()] = column(&format!("raw_{component}"))?;
    }
    let degraded_column = headers.iter().position(|header| header == "degraded");

    let mut cards = Vec::new();
    for record in reader.records() {
        let record = record?;
        let location = field(&record, location_column)?.to_string();
        let composite = parse_number(&record, score_column, &location)?;
        let mut normalized = ComponentScores::default();
        let mut raw = ComponentScores::default();
        for component in Component::ALL {
            normalized.set(
                component,
                parse_number(&record, normalized_columns[component.index()], &location)?,
            );
            raw.set(
                component,
                parse_number(&record, raw_columns[component.index()], &location)?,
            );
        }
        let degraded = degraded_column
            .and_then(|index| record.get(index))
            .map(|value| {
                value
                    .split(';')
                    .filter_map(Component::from_name)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        cards.push(ScoreCard {
            location,
            composite,
            normalized,
            raw,
            degraded,
            weights: WeightVector::default(),
        });
    }
    anyhow::ensure!(!cards.is_empty(), "no score rows in {path}");
    Ok(cards)
}

fn field<'a>(record: &'a StringRecord, index: usize) -> anyhow::Result<&'a str> {
    record
        .get(index)
        .with_context(|| format!("short record in scores CSV (column {index})"))
}

fn parse_number(record: &StringRecord, index: usize, location: &str) -> anyhow::Result<f64> {
    field(record, index)?
        .trim()
        .parse::<f64>()
        .with_context(|| format!("bad number for {location} in scores CSV"))
}
