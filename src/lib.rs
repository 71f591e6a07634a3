//! Bowling score reconstruction from photographed scoreboards.
//!
//! Two subsystems do the work:
//! - [`ocr`]: crops, deskews and cleans a photographed score row, then reads
//!   one symbol token per frame with a primary/secondary OCR engine pair.
//! - [`score`]: parses frame notation into validated rolls and scores them.
//!
//! [`analysis`] builds bonus-roll statistics over a corpus of confirmed games.

pub mod analysis;
pub mod config;
pub mod ocr;
pub mod paths;
pub mod score;

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

/// Logs a message to stderr and to the log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    eprint!("{}", line);
    let log_path = paths::get_logs_dir().join("bowling_ocr.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}
