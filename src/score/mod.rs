//! Frame notation parsing and scoring.

pub mod engine;
pub mod error;
pub mod notation;

pub use engine::{score, score_rolls, ScoreResult};
pub use error::NotationError;
pub use notation::{
    encode_rolls, Frame, FrameKind, Game, Mark, RackEvent, RackEventKind, FRAMES_PER_GAME, PINS,
};
