//! Transform
//!
//! Transformation tokens and the transposition operator.

use crate::chord::PitchSet;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::num::IntErrorKind;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing or applying a transformation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Token text that cannot name any transformation.
    #[error("invalid token `{token}`")]
    InvalidToken {
        /// The token text as given.
        token: String,
    },

    /// An operator name outside the known operator alphabet.
    #[error("unknown operator `{op}`")]
    InvalidOperator {
        /// The operator name.
        op: String,
    },

    /// A known operator with no meaning for the chord it was given.
    #[error("operator `{op}` is undefined for {chord}")]
    UndefinedForChord {
        /// The operator name.
        op: String,
        /// Description of the chord.
        chord: String,
    },

    /// A transformation changed the number of voices.
    #[error("expected a {expected}-voice chord, got {got}")]
    CardinalityMismatch {
        /// Voices before the transformation.
        expected: usize,
        /// Voices after it.
        got: usize,
    },
}

/// Largest transposition, in semitones either way, a token may carry. Wider
/// shifts leave the pitch number range from any starting chord.
pub const MAX_TRANSPOSITION: i32 = 127;

/// One step of a transformation sequence.
///
/// Parsed once from its text form: `"O"`, `"I"`, `"T"` followed by a
/// signed integer, or anything else as a Neo-Riemannian operator name.
/// Transpositions wider than [`MAX_TRANSPOSITION`] are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransformToken {
    /// Return to the starting chord.
    Origin,
    /// Keep the current chord.
    Identity,
    /// Shift every voice by this many semitones.
    Transpose(i32),
    /// Apply a Neo-Riemannian operator, possibly composite.
    NeoRiemann(String),
}

impl TransformToken {
    /// Neo-Riemannian token from an operator name.
    pub fn neo(name: impl Into<String>) -> Self {
        TransformToken::NeoRiemann(name.into())
    }

    /// Whether this token is a Neo-Riemannian name that is applied letter by
    /// letter: longer than one character and free of digits.
    pub fn is_composite(&self) -> bool {
        match self {
            TransformToken::NeoRiemann(name) => {
                name.chars().count() > 1 && !name.chars().any(|c| c.is_ascii_digit())
            }
            _ => false,
        }
    }
}

impl FromStr for TransformToken {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token {
            "" => Err(TransformError::InvalidToken {
                token: s.to_string(),
            }),
            "O" => Ok(TransformToken::Origin),
            "I" => Ok(TransformToken::Identity),
            _ => match token.strip_prefix('T').map(str::parse::<i32>) {
                Some(Ok(semitones)) if semitones.unsigned_abs() <= MAX_TRANSPOSITION as u32 => {
                    Ok(TransformToken::Transpose(semitones))
                }
                Some(Ok(_)) => Err(TransformError::InvalidToken {
                    token: s.to_string(),
                }),
                Some(Err(e))
                    if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) =>
                {
                    Err(TransformError::InvalidToken {
                        token: s.to_string(),
                    })
                }
                _ => Ok(TransformToken::NeoRiemann(token.to_string())),
            },
        }
    }
}

impl TryFrom<String> for TransformToken {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransformToken> for String {
    fn from(token: TransformToken) -> Self {
        token.to_string()
    }
}

impl Display for TransformToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformToken::Origin => f.write_str("O"),
            TransformToken::Identity => f.write_str("I"),
            TransformToken::Transpose(n) => write!(f, "T{n}"),
            TransformToken::NeoRiemann(name) => f.write_str(name),
        }
    }
}

/// Shifts a voicing by a number of semitones.
pub trait TransposeOp {
    /// Transpose every voice, preserving order and count.
    ///
    /// Must not panic on any shift; out-of-range results are caught when the
    /// voicing is rendered.
    fn transpose(&self, semitones: i32, pitches: &[i32]) -> PitchSet;
}

/// Uniform shift of every pitch number.
#[derive(Debug, Default, Copy, Clone)]
pub struct ShiftTransposer;

impl TransposeOp for ShiftTransposer {
    fn transpose(&self, semitones: i32, pitches: &[i32]) -> PitchSet {
        pitches.iter().map(|p| p.saturating_add(semitones)).collect()
    }
}
