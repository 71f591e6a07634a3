//! Frame-by-frame scoring with strike and spare look-ahead.

use serde::Serialize;

use super::error::NotationError;
use super::notation::{FrameKind, Game, PINS, RackEventKind};

/// Scored game. Frame arrays hold one entry per frame bowled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScoreResult {
    /// Score to date (0-300)
    pub total: u32,
    /// Pins knocked down, every ball counted once
    pub pins: u32,
    pub strikes: u32,
    pub spares: u32,
    pub frame_scores: Vec<u32>,
    pub cumulative: Vec<u32>,
    pub complete: bool,
}

/// Scores a validated game. Bonus balls not yet thrown count as 0.
pub fn score(game: &Game) -> ScoreResult {
    let rolls = game.rolls();
    let look_ahead = |from: usize, count: usize| -> u32 {
        rolls.iter().skip(from).take(count).map(|&r| u32::from(r)).sum()
    };

    let mut cursor = 0;
    let mut frame_scores = Vec::with_capacity(game.frames().len());

    for frame in game.frames() {
        let frame_score = match &frame.kind {
            FrameKind::Strike => {
                cursor += 1;
                u32::from(PINS) + look_ahead(cursor, 2)
            }
            FrameKind::SpareClose { .. } => {
                cursor += 2;
                u32::from(PINS) + look_ahead(cursor, 1)
            }
            FrameKind::Open { first, second } => {
                cursor += 2;
                u32::from(*first) + u32::from(*second)
            }
            FrameKind::Pending { first } => {
                cursor += 1;
                u32::from(*first)
            }
            // Fill balls are part of the frame itself
            FrameKind::Tenth { rolls } => {
                cursor += rolls.len();
                rolls.iter().map(|&r| u32::from(r)).sum()
            }
        };
        frame_scores.push(frame_score);
    }

    let cumulative: Vec<u32> = frame_scores
        .iter()
        .scan(0, |running, &s| {
            *running += s;
            Some(*running)
        })
        .collect();

    let events = game.events();
    let strikes = events
        .iter()
        .filter(|e| e.kind == RackEventKind::Strike)
        .count() as u32;
    let spares = events.len() as u32 - strikes;

    ScoreResult {
        total: cumulative.last().copied().unwrap_or(0),
        pins: rolls.iter().map(|&r| u32::from(r)).sum(),
        strikes,
        spares,
        frame_scores,
        cumulative,
        complete: game.is_complete(),
    }
}

/// Validates a raw roll sequence and scores it.
pub fn score_rolls(rolls: &[u8]) -> Result<ScoreResult, NotationError> {
    Game::from_rolls(rolls).map(|game| score(&game))
}
