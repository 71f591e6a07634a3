use thiserror::Error;

/// Reasons a frame notation or roll sequence is not a legal bowling game.
///
/// Frame numbers are 1-based; token indices are 0-based positions in the
/// caller's token list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("frame {frame}: '{symbol}' is not a bowling mark (expected 0-9, X, /, - or F)")]
    InvalidSymbol { frame: usize, symbol: char },
    #[error("frame {frame}: spare marked on the first ball of a rack")]
    SpareOnFirstBall { frame: usize },
    #[error("frame {frame}: strike marked after pins were already knocked down")]
    StrikeOnSecondBall { frame: usize },
    #[error("frame {frame}: {pins} pins knocked down from a single rack of 10")]
    TooManyPins { frame: usize, pins: u8 },
    #[error("roll of {roll} pins is outside 0..=10")]
    RollOutOfRange { roll: u8 },
    #[error("{count} roll(s) left over after the tenth frame")]
    ExtraRolls { count: usize },
    #[error("token {index} is empty")]
    EmptyToken { index: usize },
    #[error("token {index} ('{token}') is longer than 3 marks")]
    TokenTooLong { index: usize, token: String },
    #[error("{count} tokens given, a game has at most 10 frames")]
    TooManyTokens { count: usize },
}
