//! Neo-Riemannian operators
//!
//! Parsimonious voice-leading transformations. Triads use the classic
//! `P`, `R` and `L`. Dominant and half-diminished sevenths use the `S` and
//! `C` families: the chord splits into two pairs of voices, one pair is held
//! and the other moves by a semitone per voice, in similar (`S`) or contrary
//! (`C`) motion. `S{a}{b}` holds the pair spanning interval class `a` and
//! moves the pair spanning interval class `b`.
//!
//! Voices are located by pitch class, so any voicing order or spacing works
//! and the order of the input is kept in the output.

use crate::chord::{ChordQuality, PitchSet};
use crate::pitch::SEMITONES;
use crate::transform::TransformError;

/// Single-letter triad operators.
pub const TRIAD_OPERATORS: [&str; 3] = ["P", "R", "L"];

/// Seventh-chord operators.
pub const SEVENTH_OPERATORS: [&str; 9] = [
    "S23", "S32", "S34", "S43", "S56", "S65", "C32", "C34", "C65",
];

/// Whether [`ParsimoniousOps`] defines its operators on chords of this
/// quality: `P`/`R`/`L` on major and minor triads, `S`/`C` on dominant and
/// half-diminished sevenths.
pub fn operates_on(quality: ChordQuality) -> bool {
    matches!(
        quality,
        ChordQuality::Major
            | ChordQuality::Minor
            | ChordQuality::DominantSeventh
            | ChordQuality::HalfDiminishedSeventh
    )
}

/// The three ways to split four voices into two pairs.
const PAIRINGS: [[(usize, usize); 2]; 3] = [
    [(0, 1), (2, 3)],
    [(0, 2), (1, 3)],
    [(0, 3), (1, 2)],
];

/// Neo-Riemannian transformations over an ordered voicing.
pub trait NeoRiemannOp {
    /// Apply a single (non-composite) operator.
    fn transform(&self, op: &str, pitches: &[i32]) -> Result<PitchSet, TransformError>;

    /// Split a composite operator name into its single-letter operators, in
    /// application order.
    fn tokenize(&self, name: &str) -> Vec<String> {
        name.chars().map(String::from).collect()
    }
}

/// Parsimonious `P`/`R`/`L` triad and `S`/`C` seventh-chord operators.
#[derive(Debug, Default, Copy, Clone)]
pub struct ParsimoniousOps;

impl NeoRiemannOp for ParsimoniousOps {
    fn transform(&self, op: &str, pitches: &[i32]) -> Result<PitchSet, TransformError> {
        if TRIAD_OPERATORS.contains(&op) {
            triad(op, pitches)
        } else if SEVENTH_OPERATORS.contains(&op) {
            seventh(op, pitches)
        } else {
            Err(TransformError::InvalidOperator { op: op.to_string() })
        }
    }
}

fn undefined(op: &str, pitches: &[i32]) -> TransformError {
    TransformError::UndefinedForChord {
        op: op.to_string(),
        chord: format!("chord {pitches:?}"),
    }
}

fn triad(op: &str, pitches: &[i32]) -> Result<PitchSet, TransformError> {
    let id = ChordQuality::identify(pitches).ok_or_else(|| undefined(op, pitches))?;

    // (chord tone to move, semitones)
    let (role, delta) = match (op, id.quality) {
        ("P", ChordQuality::Major) => (1, -1),
        ("P", ChordQuality::Minor) => (1, 1),
        ("R", ChordQuality::Major) => (2, 2),
        ("R", ChordQuality::Minor) => (0, -2),
        ("L", ChordQuality::Major) => (0, -1),
        ("L", ChordQuality::Minor) => (2, 1),
        _ => return Err(undefined(op, pitches)),
    };

    let roles = id
        .quality
        .roles(id.root, pitches)
        .ok_or_else(|| undefined(op, pitches))?;
    Ok(pitches
        .iter()
        .zip(roles)
        .map(|(&p, r)| if r == role { p + delta } else { p })
        .collect())
}

fn seventh(op: &str, pitches: &[i32]) -> Result<PitchSet, TransformError> {
    let id = ChordQuality::identify(pitches).ok_or_else(|| undefined(op, pitches))?;
    let target = match (op.starts_with('S'), id.quality) {
        (true, ChordQuality::DominantSeventh) => ChordQuality::HalfDiminishedSeventh,
        (true, ChordQuality::HalfDiminishedSeventh) => ChordQuality::DominantSeventh,
        (false, q @ ChordQuality::DominantSeventh)
        | (false, q @ ChordQuality::HalfDiminishedSeventh) => q,
        _ => return Err(undefined(op, pitches)),
    };

    let digits: Vec<i32> = op
        .chars()
        .skip(1)
        .filter_map(|c| c.to_digit(10))
        .map(|d| d as i32)
        .collect();
    let (held_ic, moving_ic) = match digits.as_slice() {
        [held, moving] => (*held, *moving),
        _ => return Err(TransformError::InvalidOperator { op: op.to_string() }),
    };

    let ic = |(a, b): (usize, usize)| {
        let d = (pitches[b] - pitches[a]).rem_euclid(SEMITONES);
        d.min(SEMITONES - d)
    };
    let moving = PAIRINGS
        .iter()
        .find_map(|&[first, second]| match (ic(first), ic(second)) {
            (h, m) if h == held_ic && m == moving_ic => Some(second),
            (m, h) if h == held_ic && m == moving_ic => Some(first),
            _ => None,
        })
        .ok_or_else(|| undefined(op, pitches))?;

    let motions: [(i32, i32); 2] = if op.starts_with('S') {
        [(1, 1), (-1, -1)]
    } else {
        [(1, -1), (-1, 1)]
    };

    motions
        .iter()
        .map(|&(da, db)| {
            let mut next = pitches.to_vec();
            next[moving.0] += da;
            next[moving.1] += db;
            next
        })
        .find(|next| ChordQuality::identify(next).map(|id| id.quality) == Some(target))
        .ok_or_else(|| undefined(op, pitches))
}
