//! Bonus-roll analysis over a corpus of confirmed games.
//!
//! This module provides:
//! - Corpus loading from the score-sheet CSV export
//! - Bonus sample extraction (roll(s) after each strike and spare)
//! - Distribution statistics and histogram charts
//! - JSON export of the report and samples

pub mod bonus;
pub mod charts;
pub mod config;
pub mod corpus;
pub mod export;
pub mod statistics;

pub use bonus::{extract, BonusKind, BonusSample, CorpusError};
pub use corpus::{Corpus, GameRecord};
pub use statistics::{BonusReport, SeriesStats};

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use config::ChartConfig;
use export::ReportDocument;

/// Runs the full analysis: load CSV, extract samples, compute statistics,
/// draw charts, export JSON.
///
/// Returns (chart_paths, json_path).
pub fn generate_report(
    corpus_csv: &Path,
    output_dir: &Path,
    chart_config: &ChartConfig,
) -> Result<(Vec<PathBuf>, PathBuf)> {
    let corpus = Corpus::from_csv(corpus_csv)?;
    if corpus.is_empty() {
        return Err(anyhow!("No games in {}", corpus_csv.display()));
    }
    crate::log(&format!("Loaded {} games from CSV", corpus.len()));

    let samples = extract(&corpus.game_strings())?;
    let report = BonusReport::from_samples(corpus.len(), &samples);
    crate::log(&format!(
        "Extracted {} bonus samples ({} spares with a following roll)",
        samples.len(),
        report.spare_bonus.count
    ));

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let chart_paths = charts::generate_all_charts(&report, output_dir, chart_config)?;
    crate::log(&format!("Generated {} charts", chart_paths.len()));

    let json_path = output_dir.join("bonus_report.json");
    export::export_to_json(
        &ReportDocument {
            report: &report,
            samples: &samples,
        },
        &json_path,
    )?;
    crate::log(&format!("Bonus report saved: {}", json_path.display()));

    Ok((chart_paths, json_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_corpus_is_rejected() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("games.csv");
        std::fs::write(&csv, "Date,Location,Game,Game String\n").unwrap();

        let err = generate_report(&csv, dir.path(), &ChartConfig::default()).unwrap_err();
        assert!(err.to_string().contains("No games"));
    }

    #[test]
    fn test_illegal_game_fails_before_output() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("games.csv");
        std::fs::write(&csv, "Date,Location,Game,Game String\n01/02/2024,Lane 3,1,78\n").unwrap();

        let out = dir.path().join("out");
        assert!(generate_report(&csv, &out, &ChartConfig::default()).is_err());
        assert!(!out.join("bonus_report.json").exists());
    }
}
