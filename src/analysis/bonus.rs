//! Bonus-roll samples: what was thrown right after each strike and spare.

use serde::Serialize;
use thiserror::Error;

use crate::score::{Game, NotationError, RackEventKind};

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("game {game}: {source}")]
    InvalidGame {
        game: usize,
        #[source]
        source: NotationError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BonusKind {
    /// `bonus` is `None` when the game ends on the spare.
    Spare { first_throw: u8, bonus: Option<u8> },
    Strike {
        bonus1: Option<u8>,
        bonus2: Option<u8>,
    },
}

/// One strike or spare and the roll(s) that followed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BonusSample {
    /// Index of the source game in the corpus
    pub game: usize,
    /// 1-based frame the event happened in
    pub frame: usize,
    #[serde(flatten)]
    pub kind: BonusKind,
}

/// Samples for one parsed game, tagged with its corpus index.
pub fn extract_game(game_index: usize, game: &Game) -> Vec<BonusSample> {
    let rolls = game.rolls();
    let after = |roll_index: usize, offset: usize| rolls.get(roll_index + offset).copied();

    game.events()
        .into_iter()
        .map(|event| {
            let kind = match event.kind {
                RackEventKind::Spare { first } => BonusKind::Spare {
                    first_throw: first,
                    bonus: after(event.roll_index, 1),
                },
                RackEventKind::Strike => BonusKind::Strike {
                    bonus1: after(event.roll_index, 1),
                    bonus2: after(event.roll_index, 2),
                },
            };
            BonusSample {
                game: game_index,
                frame: event.frame,
                kind,
            }
        })
        .collect()
}

/// Parses every game string and collects one sample per strike or spare.
///
/// Fails on the first game that is not legal notation.
pub fn extract<S: AsRef<str>>(games: &[S]) -> Result<Vec<BonusSample>, CorpusError> {
    let mut samples = Vec::new();

    for (index, text) in games.iter().enumerate() {
        let game = Game::parse(text.as_ref())
            .map_err(|source| CorpusError::InvalidGame { game: index, source })?;
        samples.extend(extract_game(index, &game));
    }

    Ok(samples)
}
