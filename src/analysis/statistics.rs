//! Distribution summaries for bonus rolls.
//!
//! Each series gets mean, median, mode, min, max, standard deviation,
//! quartiles and a per-value histogram.

use serde::Serialize;

use super::bonus::{BonusKind, BonusSample};

/// Summary of one series of pin counts.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesStats {
    pub label: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value, smallest on ties
    pub mode: u32,
    pub min: u32,
    pub max: u32,
    /// Population standard deviation
    pub std_dev: f64,
    pub quartile_1: f64,
    pub quartile_3: f64,
    /// `histogram[v]` is how often `v` pins occurred
    pub histogram: Vec<usize>,
}

impl SeriesStats {
    /// Summarises `values`, which must lie in `0..=max_value`.
    pub fn from_values(label: &str, values: &[u32], max_value: u32) -> Self {
        let mut histogram = vec![0usize; max_value as usize + 1];
        for &v in values {
            if let Some(bin) = histogram.get_mut(v as usize) {
                *bin += 1;
            }
        }

        if values.is_empty() {
            return Self {
                label: label.to_string(),
                count: 0,
                mean: 0.0,
                median: 0.0,
                mode: 0,
                min: 0,
                max: 0,
                std_dev: 0.0,
                quartile_1: 0.0,
                quartile_3: 0.0,
                histogram,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        let count = sorted.len();

        let mean = sorted.iter().map(|&v| f64::from(v)).sum::<f64>() / count as f64;
        let variance = sorted
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        Self {
            label: label.to_string(),
            count,
            mean,
            median: percentile(&sorted, 50.0),
            mode: mode(values),
            min: sorted[0],
            max: sorted[count - 1],
            std_dev: variance.sqrt(),
            quartile_1: percentile(&sorted, 25.0),
            quartile_3: percentile(&sorted, 75.0),
            histogram,
        }
    }
}

/// Linear-interpolated percentile of sorted values.
fn percentile(sorted: &[u32], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => f64::from(sorted[0]),
        n => {
            let rank = p / 100.0 * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let low = f64::from(sorted[lower]);
            low + (f64::from(sorted[upper]) - low) * rank.fract()
        }
    }
}

fn mode(values: &[u32]) -> u32 {
    let mut counts = std::collections::BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0usize) += 1;
    }
    // BTreeMap iterates in ascending order, so the first maximum is the smallest value
    counts
        .iter()
        .fold((0u32, 0usize), |best, (&value, &n)| if n > best.1 { (value, n) } else { best })
        .0
}

/// The four bonus distributions over a corpus.
#[derive(Debug, Clone, Serialize)]
pub struct BonusReport {
    pub games: usize,
    pub samples: usize,
    /// Roll after a spare
    pub spare_bonus: SeriesStats,
    /// First roll after a strike
    pub strike_next: SeriesStats,
    /// Second roll after a strike
    pub strike_second: SeriesStats,
    /// Both rolls after a strike, when both were thrown
    pub strike_combined: SeriesStats,
}

impl BonusReport {
    pub fn from_samples(games: usize, samples: &[BonusSample]) -> Self {
        let mut spare = Vec::new();
        let mut next = Vec::new();
        let mut second = Vec::new();
        let mut combined = Vec::new();

        for sample in samples {
            match sample.kind {
                BonusKind::Spare { bonus, .. } => spare.extend(bonus.map(u32::from)),
                BonusKind::Strike { bonus1, bonus2 } => {
                    next.extend(bonus1.map(u32::from));
                    second.extend(bonus2.map(u32::from));
                    if let (Some(a), Some(b)) = (bonus1, bonus2) {
                        combined.push(u32::from(a) + u32::from(b));
                    }
                }
            }
        }

        Self {
            games,
            samples: samples.len(),
            spare_bonus: SeriesStats::from_values("Spare bonus", &spare, 10),
            strike_next: SeriesStats::from_values("Strike bonus (next roll)", &next, 10),
            strike_second: SeriesStats::from_values("Strike bonus (second roll)", &second, 10),
            strike_combined: SeriesStats::from_values("Strike bonus (combined)", &combined, 20),
        }
    }
}
