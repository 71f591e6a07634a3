//! Bowling frame notation.
//!
//! A game string is the concatenation of per-frame marks:
//! `X` strike, `/` spare, `-` miss, `F` foul, `0`-`9` pin counts.
//! Parsing walks the marks once, resolves each ball to a pin count and
//! groups balls into frames, so scoring and statistics never have to look
//! at characters again.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::NotationError;

/// Frames in a game.
pub const FRAMES_PER_GAME: usize = 10;
/// Pins in a full rack.
pub const PINS: u8 = 10;
/// Longest frame token (tenth frame with two bonus balls).
const MAX_TOKEN_LEN: usize = 3;

/// One ball as written on the scoresheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mark {
    Strike,
    Spare,
    Pins(u8),
    Miss,
    Foul,
}

impl Mark {
    /// Reads one symbol. `frame` is only used for error reporting.
    pub fn from_symbol(frame: usize, symbol: char) -> Result<Self, NotationError> {
        match symbol {
            'X' => Ok(Mark::Strike),
            '/' => Ok(Mark::Spare),
            '-' => Ok(Mark::Miss),
            'F' => Ok(Mark::Foul),
            '0'..='9' => Ok(Mark::Pins(symbol as u8 - b'0')),
            _ => Err(NotationError::InvalidSymbol { frame, symbol }),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Mark::Strike => 'X',
            Mark::Spare => '/',
            Mark::Miss => '-',
            Mark::Foul => 'F',
            Mark::Pins(n) => char::from(b'0' + n.min(9)),
        }
    }

    /// Pins knocked down by this ball when `standing` pins are up.
    ///
    /// `opens_rack` is true for the first ball thrown at a fresh rack. A
    /// strike is only legal there and a spare only after it, whatever the
    /// first ball knocked down.
    fn pins(self, frame: usize, standing: u8, opens_rack: bool) -> Result<u8, NotationError> {
        match self {
            Mark::Strike if opens_rack => Ok(PINS),
            Mark::Strike => Err(NotationError::StrikeOnSecondBall { frame }),
            Mark::Spare if opens_rack => Err(NotationError::SpareOnFirstBall { frame }),
            Mark::Spare => Ok(standing),
            Mark::Miss | Mark::Foul => Ok(0),
            Mark::Pins(n) if n <= standing => Ok(n),
            Mark::Pins(n) => Err(NotationError::TooManyPins {
                frame,
                pins: PINS - standing + n,
            }),
        }
    }
}

/// Walks balls thrown at successive racks and reports the ones that clear
/// a rack. The rack resets after a strike, a spare or a second ball.
#[derive(Debug, Clone, Copy)]
struct Rack {
    standing: u8,
    opens: bool,
}

impl Rack {
    fn new() -> Self {
        Self {
            standing: PINS,
            opens: true,
        }
    }

    /// Records a legal ball. Returns the rack-clearing event it makes, if any.
    fn throw(&mut self, pins: u8) -> Option<RackEventKind> {
        let cleared = if pins == self.standing {
            Some(if self.opens {
                RackEventKind::Strike
            } else {
                RackEventKind::Spare {
                    first: PINS - self.standing,
                }
            })
        } else {
            None
        };

        if cleared.is_some() || !self.opens {
            *self = Self::new();
        } else {
            self.standing -= pins;
            self.opens = false;
        }
        cleared
    }
}

/// What a frame amounts to once its balls are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrameKind {
    Strike,
    SpareClose { first: u8 },
    Open { first: u8, second: u8 },
    /// Only the first ball is recorded (game in progress or truncated input).
    Pending { first: u8 },
    /// Tenth frame, bonus balls included.
    Tenth { rolls: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// 1-based frame number
    pub number: usize,
    pub kind: FrameKind,
    /// Marks as written, kept for display
    pub marks: Vec<Mark>,
}

impl Frame {
    /// Pin counts of the balls thrown in this frame.
    pub fn rolls(&self) -> Vec<u8> {
        match &self.kind {
            FrameKind::Strike => vec![PINS],
            FrameKind::SpareClose { first } => vec![*first, PINS - first],
            FrameKind::Open { first, second } => vec![*first, *second],
            FrameKind::Pending { first } => vec![*first],
            FrameKind::Tenth { rolls } => rolls.clone(),
        }
    }

    pub fn is_complete(&self) -> bool {
        match &self.kind {
            FrameKind::Pending { .. } => false,
            FrameKind::Tenth { rolls } => match rolls.as_slice() {
                [_, _, _] => true,
                [a, b] => a + b < PINS,
                _ => false,
            },
            _ => true,
        }
    }

    pub fn notation(&self) -> String {
        self.marks.iter().map(|m| m.symbol()).collect()
    }
}

/// A rack cleared by a strike or a spare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RackEvent {
    pub frame: usize,
    /// Index into [`Game::rolls`] of the ball that cleared the rack
    pub roll_index: usize,
    pub kind: RackEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RackEventKind {
    Strike,
    Spare { first: u8 },
}

/// A validated game: up to ten frames and the flat roll sequence they imply.
///
/// Games with fewer than ten frames (or an unfinished tenth) are legal and
/// represent a game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    frames: Vec<Frame>,
    rolls: Vec<u8>,
}

impl Game {
    /// Parses a game string. Whitespace is ignored.
    pub fn parse(game: &str) -> Result<Self, NotationError> {
        let symbols: Vec<char> = game.chars().filter(|c| !c.is_whitespace()).collect();
        let mut frames = Vec::with_capacity(FRAMES_PER_GAME);
        let mut cursor = 0;

        while cursor < symbols.len() {
            let number = frames.len() + 1;
            let (frame, used) = if number < FRAMES_PER_GAME {
                open_frame(number, &symbols[cursor..])?
            } else {
                (tenth_frame(&symbols[cursor..])?, symbols.len() - cursor)
            };
            cursor += used;
            frames.push(frame);
        }

        let rolls = frames.iter().flat_map(|f| f.rolls()).collect();
        Ok(Self { frames, rolls })
    }

    /// Builds a game from per-frame tokens (recognizer output after review).
    ///
    /// Tokens are concatenated before framing, so a token list whose
    /// boundaries drift from the real frame boundaries still yields the
    /// roll sequence the marks describe. For the same reason every token,
    /// not only the tenth, may hold up to three marks; framing catches a
    /// frame that is really too long.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, NotationError> {
        if tokens.len() > FRAMES_PER_GAME {
            return Err(NotationError::TooManyTokens {
                count: tokens.len(),
            });
        }

        let mut game = String::new();
        for (index, token) in tokens.iter().enumerate() {
            let token: String = token
                .as_ref()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            if token.is_empty() {
                return Err(NotationError::EmptyToken { index });
            }
            if token.chars().count() > MAX_TOKEN_LEN {
                return Err(NotationError::TokenTooLong { index, token });
            }
            game.push_str(&token);
        }

        Self::parse(&game)
    }

    /// Validates a raw roll sequence and writes it back as marks.
    pub fn from_rolls(rolls: &[u8]) -> Result<Self, NotationError> {
        let mut symbols = String::with_capacity(rolls.len());
        let mut frame = 1;
        let mut rack = Rack::new();

        for &roll in rolls {
            if roll > PINS {
                return Err(NotationError::RollOutOfRange { roll });
            }
            if roll > rack.standing {
                return Err(NotationError::TooManyPins {
                    frame,
                    pins: PINS - rack.standing + roll,
                });
            }

            let opened = rack.opens;
            let mark = match rack.throw(roll) {
                Some(RackEventKind::Strike) => Mark::Strike,
                Some(RackEventKind::Spare { .. }) => Mark::Spare,
                None if roll == 0 => Mark::Miss,
                None => Mark::Pins(roll),
            };
            symbols.push(mark.symbol());

            // The tenth frame keeps collecting fill balls on fresh racks
            let frame_over = mark == Mark::Strike || !opened;
            if frame < FRAMES_PER_GAME && frame_over {
                frame += 1;
            }
        }

        Self::parse(&symbols)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn rolls(&self) -> &[u8] {
        &self.rolls
    }

    /// True once all ten frames, bonus balls included, are recorded.
    pub fn is_complete(&self) -> bool {
        self.frames.len() == FRAMES_PER_GAME && self.frames.iter().all(Frame::is_complete)
    }

    /// Per-frame notation, one token per frame bowled.
    pub fn tokens(&self) -> Vec<String> {
        self.frames.iter().map(Frame::notation).collect()
    }

    /// The game string.
    pub fn notation(&self) -> String {
        self.frames.iter().map(Frame::notation).collect()
    }

    /// Every strike and spare in roll order, tenth-frame fill balls included.
    pub fn events(&self) -> Vec<RackEvent> {
        let mut events = Vec::new();
        let mut roll_index = 0;

        for frame in &self.frames {
            let mut rack = Rack::new();
            for pins in frame.rolls() {
                if let Some(kind) = rack.throw(pins) {
                    events.push(RackEvent {
                        frame: frame.number,
                        roll_index,
                        kind,
                    });
                }
                roll_index += 1;
            }
        }

        events
    }
}

impl FromStr for Game {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation())
    }
}

/// Writes a legal roll sequence as a game string.
pub fn encode_rolls(rolls: &[u8]) -> Result<String, NotationError> {
    Game::from_rolls(rolls).map(|game| game.notation())
}

/// Frames 1-9: a strike, or up to two balls from one rack.
fn open_frame(number: usize, symbols: &[char]) -> Result<(Frame, usize), NotationError> {
    let first_mark = Mark::from_symbol(number, symbols[0])?;
    let first = first_mark.pins(number, PINS, true)?;

    if first == PINS {
        let frame = Frame {
            number,
            kind: FrameKind::Strike,
            marks: vec![first_mark],
        };
        return Ok((frame, 1));
    }

    let Some(&symbol) = symbols.get(1) else {
        let frame = Frame {
            number,
            kind: FrameKind::Pending { first },
            marks: vec![first_mark],
        };
        return Ok((frame, 1));
    };

    let second_mark = Mark::from_symbol(number, symbol)?;
    let second = second_mark.pins(number, PINS - first, false)?;
    let kind = if first + second == PINS {
        FrameKind::SpareClose { first }
    } else {
        FrameKind::Open { first, second }
    };

    let frame = Frame {
        number,
        kind,
        marks: vec![first_mark, second_mark],
    };
    Ok((frame, 2))
}

/// Frame 10: everything left. The rack resets after a strike or spare, and
/// a third ball is only thrown when the first two cleared a rack.
fn tenth_frame(symbols: &[char]) -> Result<Frame, NotationError> {
    let number = FRAMES_PER_GAME;
    if symbols.len() > MAX_TOKEN_LEN {
        return Err(NotationError::ExtraRolls {
            count: symbols.len() - MAX_TOKEN_LEN,
        });
    }

    let mut marks = Vec::with_capacity(symbols.len());
    let mut rolls: Vec<u8> = Vec::with_capacity(symbols.len());
    let mut rack = Rack::new();

    for (ball, &symbol) in symbols.iter().enumerate() {
        if ball == 2 && rolls[0] + rolls[1] < PINS {
            return Err(NotationError::ExtraRolls { count: 1 });
        }
        let mark = Mark::from_symbol(number, symbol)?;
        let pins = mark.pins(number, rack.standing, rack.opens)?;

        rack.throw(pins);
        marks.push(mark);
        rolls.push(pins);
    }

    Ok(Frame {
        number,
        kind: FrameKind::Tenth { rolls },
        marks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_game() {
        let game = Game::parse("XXXXXXXXXXXX").unwrap();
        assert_eq!(game.rolls(), &[10; 12]);
        assert_eq!(game.frames().len(), 10);
        assert_eq!(
            game.frames()[9].kind,
            FrameKind::Tenth {
                rolls: vec![10, 10, 10]
            }
        );
        assert!(game.is_complete());
    }

    #[test]
    fn test_gutter_game() {
        let game = Game::parse(&"--".repeat(10)).unwrap();
        assert_eq!(game.rolls(), &[0; 20]);
        assert!(game.is_complete());
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_tokens_need_not_match_frame_boundaries() {
        let tokens = ["5/", "3", "4", "-", "-", "-", "-", "-", "-", "-"];
        let game = Game::from_tokens(&tokens).unwrap();

        assert_eq!(game.rolls(), &[5, 5, 3, 4, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(game.frames()[0].kind, FrameKind::SpareClose { first: 5 });
        assert_eq!(game.frames()[1].kind, FrameKind::Open { first: 3, second: 4 });
        assert_eq!(game.frames()[5].kind, FrameKind::Pending { first: 0 });
        assert!(!game.is_complete());
    }

    #[test]
    fn test_miss_and_foul_are_zero() {
        let game = Game::parse("F/-9F-").unwrap();
        assert_eq!(game.rolls(), &[0, 10, 0, 9, 0, 0]);
        assert_eq!(game.notation(), "F/-9F-");
    }

    #[test]
    fn test_spare_after_zero_first_ball() {
        for first in ["-", "F", "0"] {
            let game = Game::parse(&format!("{}/5", first)).unwrap();
            assert_eq!(game.frames()[0].kind, FrameKind::SpareClose { first: 0 });
            assert_eq!(game.rolls(), &[0, 10, 5]);
            assert_eq!(
                game.events(),
                vec![RackEvent {
                    frame: 1,
                    roll_index: 1,
                    kind: RackEventKind::Spare { first: 0 }
                }]
            );
        }
    }

    #[test]
    fn test_strike_after_zero_first_ball_is_rejected() {
        assert_eq!(
            Game::parse("-X5").unwrap_err(),
            NotationError::StrikeOnSecondBall { frame: 1 }
        );
        assert_eq!(
            Game::parse("FX").unwrap_err(),
            NotationError::StrikeOnSecondBall { frame: 1 }
        );
    }

    #[test]
    fn test_tenth_frame_gutter_spare_after_strike() {
        let game = Game::parse(&format!("{}X-/", "--".repeat(9))).unwrap();
        assert_eq!(
            game.frames()[9].kind,
            FrameKind::Tenth {
                rolls: vec![10, 0, 10]
            }
        );
        assert!(game.is_complete());
        let kinds: Vec<RackEventKind> = game.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![RackEventKind::Strike, RackEventKind::Spare { first: 0 }]
        );

        let game = Game::parse(&format!("{}-/X", "--".repeat(9))).unwrap();
        assert_eq!(
            game.frames()[9].kind,
            FrameKind::Tenth {
                rolls: vec![0, 10, 10]
            }
        );
        let kinds: Vec<RackEventKind> = game.events().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![RackEventKind::Spare { first: 0 }, RackEventKind::Strike]
        );
    }

    #[test]
    fn test_tenth_frame_strike_after_gutter_is_rejected() {
        let err = Game::parse(&format!("{}X-X", "--".repeat(9))).unwrap_err();
        assert_eq!(err, NotationError::StrikeOnSecondBall { frame: 10 });
    }

    #[test]
    fn test_encode_writes_spare_after_zero() {
        assert_eq!(encode_rolls(&[0, 10, 5]).unwrap(), "-/5");

        let mut rolls = vec![0; 18];
        rolls.extend([10, 0, 10]);
        assert_eq!(encode_rolls(&rolls).unwrap(), format!("{}X-/", "--".repeat(9)));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let game = Game::parse(" X 7/ 9- ").unwrap();
        assert_eq!(game.tokens(), vec!["X", "7/", "9-"]);
    }

    #[test]
    fn test_invalid_symbol_names_frame() {
        let err = Game::parse("X5/3A").unwrap_err();
        assert_eq!(err, NotationError::InvalidSymbol { frame: 3, symbol: 'A' });
    }

    #[test]
    fn test_lowercase_strike_is_rejected() {
        let err = Game::parse("x").unwrap_err();
        assert_eq!(err, NotationError::InvalidSymbol { frame: 1, symbol: 'x' });
    }

    #[test]
    fn test_spare_on_first_ball() {
        assert_eq!(
            Game::parse("/5").unwrap_err(),
            NotationError::SpareOnFirstBall { frame: 1 }
        );
    }

    #[test]
    fn test_strike_on_second_ball() {
        assert_eq!(
            Game::parse("X5X").unwrap_err(),
            NotationError::StrikeOnSecondBall { frame: 2 }
        );
    }

    #[test]
    fn test_rack_over_ten_pins() {
        assert_eq!(
            Game::parse("78").unwrap_err(),
            NotationError::TooManyPins { frame: 1, pins: 15 }
        );
    }

    #[test]
    fn test_digits_summing_to_ten_are_a_spare() {
        let game = Game::parse("553").unwrap();
        assert_eq!(game.frames()[0].kind, FrameKind::SpareClose { first: 5 });
        assert_eq!(game.frames()[0].notation(), "55");
        assert_eq!(game.rolls(), &[5, 5, 3]);
    }

    #[test]
    fn test_tenth_frame_strike_then_spare() {
        let game = Game::parse(&format!("{}X7/", "--".repeat(9))).unwrap();
        assert_eq!(
            game.frames()[9].kind,
            FrameKind::Tenth {
                rolls: vec![10, 7, 3]
            }
        );
        assert!(game.is_complete());
    }

    #[test]
    fn test_tenth_frame_open_has_no_bonus() {
        let err = Game::parse(&format!("{}539", "--".repeat(9))).unwrap_err();
        assert_eq!(err, NotationError::ExtraRolls { count: 1 });

        let game = Game::parse(&format!("{}53", "--".repeat(9))).unwrap();
        assert!(game.is_complete());
    }

    #[test]
    fn test_tenth_frame_spare_waiting_for_fill_ball() {
        let game = Game::parse(&format!("{}5/", "--".repeat(9))).unwrap();
        assert_eq!(game.frames().len(), 10);
        assert!(!game.is_complete());
    }

    #[test]
    fn test_rolls_after_tenth_frame() {
        assert_eq!(
            Game::parse("XXXXXXXXXXXXX").unwrap_err(),
            NotationError::ExtraRolls { count: 1 }
        );
    }

    #[test]
    fn test_tenth_frame_strike_after_single_pin_count() {
        let err = Game::parse(&format!("{}X5X", "--".repeat(9))).unwrap_err();
        assert_eq!(err, NotationError::StrikeOnSecondBall { frame: 10 });
    }

    #[test]
    fn test_token_validation() {
        assert_eq!(
            Game::from_tokens(&["X", " "]).unwrap_err(),
            NotationError::EmptyToken { index: 1 }
        );
        assert_eq!(
            Game::from_tokens(&["X", "5/3X"]).unwrap_err(),
            NotationError::TokenTooLong {
                index: 1,
                token: "5/3X".to_string()
            }
        );
        let eleven = vec!["X"; 11];
        assert_eq!(
            Game::from_tokens(&eleven).unwrap_err(),
            NotationError::TooManyTokens { count: 11 }
        );
    }

    #[test]
    fn test_three_mark_token_before_tenth_frame() {
        let game = Game::from_tokens(&["5/3", "4"]).unwrap();
        assert_eq!(game.rolls(), &[5, 5, 3, 4]);
        assert_eq!(game.tokens(), vec!["5/", "34"]);
    }

    #[test]
    fn test_from_tokens_matches_game_string() {
        let tokens = ["X", "7/", "9-", "X", "-8", "8/", "-6", "X", "X", "X81"];
        let from_tokens = Game::from_tokens(&tokens).unwrap();
        let from_string = Game::parse("X7/9-X-88/-6XXX81").unwrap();
        assert_eq!(from_tokens, from_string);
        assert_eq!(from_tokens.tokens(), tokens);
    }

    #[test]
    fn test_from_rolls_rejects_illegal_sequences() {
        assert_eq!(
            Game::from_rolls(&[11]).unwrap_err(),
            NotationError::RollOutOfRange { roll: 11 }
        );
        assert_eq!(
            Game::from_rolls(&[3, 4, 7, 8]).unwrap_err(),
            NotationError::TooManyPins { frame: 2, pins: 15 }
        );
    }

    #[test]
    fn test_encode_then_parse_preserves_rolls() {
        let sequences: [&[u8]; 6] = [
            &[10; 12],
            &[0, 10, 0, 10, 5, 0],
            &[0; 20],
            &[10, 7, 3, 9, 0, 10, 0, 8, 8, 2, 0, 6, 10, 10, 10, 8, 1],
            &[5, 5, 3, 4],
            &[1, 9, 1, 9, 1, 9, 1, 9, 1, 9, 1, 9, 1, 9, 1, 9, 1, 9, 1, 9, 10],
        ];

        for rolls in sequences {
            let encoded = encode_rolls(rolls).unwrap();
            let game = Game::parse(&encoded).unwrap();
            assert_eq!(game.rolls(), rolls, "round trip of {}", encoded);
        }
        assert_eq!(encode_rolls(&[10, 7, 3, 9, 0]).unwrap(), "X7/9-");
    }

    #[test]
    fn test_events_cover_fill_balls() {
        let game = Game::parse(&format!("{}X7/", "--".repeat(9))).unwrap();
        let events = game.events();
        assert_eq!(
            events,
            vec![
                RackEvent {
                    frame: 10,
                    roll_index: 18,
                    kind: RackEventKind::Strike
                },
                RackEvent {
                    frame: 10,
                    roll_index: 20,
                    kind: RackEventKind::Spare { first: 7 }
                },
            ]
        );
    }
}
