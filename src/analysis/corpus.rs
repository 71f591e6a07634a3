//! Confirmed-game corpus loaded from a CSV export of the score sheet.
//!
//! Expected header: `Date,Location,Game,Game String`. Record order is the
//! index space used by [`super::bonus::BonusSample::game`].

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

/// One confirmed game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub location: String,
    /// Game number within the session
    pub game: u32,
    pub game_string: String,
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub records: Vec<GameRecord>,
}

impl Corpus {
    /// Load records from a CSV file.
    ///
    /// Skips the header row, blank lines and malformed rows (with warning log).
    pub fn from_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.context("Failed to read line from CSV")?;

            if line_num == 0 || line.trim().is_empty() {
                continue;
            }

            match Self::parse_line(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    crate::log(&format!(
                        "Warning: Skipping malformed CSV row {}: {}",
                        line_num + 1,
                        e
                    ));
                }
            }
        }

        Ok(Corpus { records })
    }

    fn parse_line(line: &str) -> Result<GameRecord> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 4 {
            return Err(anyhow!("Expected 4 columns, got {}", parts.len()));
        }

        let date = parse_date(parts[0])?;
        let game = parts[2]
            .parse::<u32>()
            .with_context(|| format!("Invalid game number '{}'", parts[2]))?;
        let game_string: String = parts[3].chars().filter(|c| !c.is_whitespace()).collect();
        if game_string.is_empty() {
            return Err(anyhow!("Empty game string"));
        }

        Ok(GameRecord {
            date,
            location: parts[1].to_string(),
            game,
            game_string,
        })
    }

    /// Game strings in record order.
    pub fn game_strings(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.game_string.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parses `dd/mm/yyyy` or ISO `yyyy-mm-dd`.
fn parse_date(text: &str) -> Result<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .ok_or_else(|| anyhow!("Invalid date '{}'", text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_parse_valid_csv() {
        let file = create_test_csv(
            "Date,Location,Game,Game String
14/03/2024,Lane 7,1,X7/9-X-88/-6XXX81
2024-03-21,Lane 7,2,XXXXXXXXXXXX",
        );
        let corpus = Corpus::from_csv(file.path()).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(
            corpus.records[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
        assert_eq!(corpus.records[0].location, "Lane 7");
        assert_eq!(corpus.records[1].game, 2);
        assert_eq!(corpus.game_strings(), vec!["X7/9-X-88/-6XXX81", "XXXXXXXXXXXX"]);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let file = create_test_csv(
            "Date,Location,Game,Game String
not a date,Lane 1,1,XXXXXXXXXXXX
14/03/2024,Lane 1,one,XXXXXXXXXXXX
14/03/2024,Lane 1
14/03/2024,Lane 1,3,

14/03/2024,Lane 1,4,9-9-9-9-9-9-9-9-9-9-",
        );
        let corpus = Corpus::from_csv(file.path()).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.records[0].game, 4);
    }

    #[test]
    fn test_record_serializes_iso_date() {
        let file = create_test_csv("Date,Location,Game,Game String\n14/03/2024,Lane 7,1,X7/9-");
        let corpus = Corpus::from_csv(file.path()).unwrap();

        let json = serde_json::to_value(&corpus.records[0]).unwrap();
        assert_eq!(json["date"], "2024-03-14");
        assert_eq!(json["game_string"], "X7/9-");
    }

    #[test]
    fn test_header_only() {
        let file = create_test_csv("Date,Location,Game,Game String\n");
        assert!(Corpus::from_csv(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(Corpus::from_csv(Path::new("/nonexistent/games.csv")).is_err());
    }
}
