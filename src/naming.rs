//! Chord naming
//!
//! Human-readable labels for pitch-class sets and the normalization applied
//! to every label before it is reported.

use crate::chord::ChordQuality;
use crate::pitch::PitchClass;

/// Label used when no template matches.
pub const UNIDENTIFIED: &str = "unidentified";

/// Produces a chord label from bare pitch-class names (no octaves).
pub trait ChordNamer {
    /// Name the chord. The first name is the bass. Never fails; unknown
    /// sets degrade to a generic label.
    fn name(&self, pitch_classes: &[String]) -> String;
}

/// Names chords by matching the interval templates of [`ChordQuality`].
///
/// Produces symbols such as `C`, `Cm`, `Co`, `C+`, `Cmaj7` or `Cm7b5`, with
/// `/<n>` appended when chord tone `n` is in the bass.
#[derive(Debug, Default, Copy, Clone)]
pub struct TemplateNamer;

impl ChordNamer for TemplateNamer {
    fn name(&self, pitch_classes: &[String]) -> String {
        let classes: Option<Vec<i32>> = pitch_classes
            .iter()
            .map(|name| PitchClass::parse(name).ok().map(PitchClass::index))
            .collect();

        match classes.as_deref().and_then(ChordQuality::identify) {
            Some(id) if id.inversion > 0 => {
                format!("{}{}/{}", id.root, id.quality.symbol(), id.inversion)
            }
            Some(id) => format!("{}{}", id.root, id.quality.symbol()),
            None => UNIDENTIFIED.to_string(),
        }
    }
}

/// Rewrite rules applied, in order, by [`normalize_chord_name`].
const NORMALIZATION_RULES: [fn(&str) -> String; 4] = [
    remove_whitespace,
    normalize_sixth,
    normalize_diminished,
    collapse_slash_digit,
];

/// Normalize a chord label: whitespace removed, a trailing `-6` becomes `6`,
/// an `o` diminished marker right after the root becomes `dim`, and
/// `<name>/<digit>` becomes `<name><digit>`.
pub fn normalize_chord_name(name: &str) -> String {
    NORMALIZATION_RULES
        .iter()
        .fold(name.to_string(), |acc, rule| rule(&acc))
}

fn remove_whitespace(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn normalize_sixth(name: &str) -> String {
    match name.strip_suffix("-6") {
        Some(head) => format!("{head}6"),
        None => name.to_string(),
    }
}

// The diminished marker is an `o` directly after the root letter and its
// accidentals; any other `o` is left alone.
fn normalize_diminished(name: &str) -> String {
    if !name.starts_with(|c: char| ('A'..='G').contains(&c)) {
        return name.to_string();
    }
    match name[1..].find(|c: char| c != '#' && c != 'b') {
        Some(i) if name[1 + i..].starts_with('o') => {
            format!("{}dim{}", &name[..1 + i], &name[2 + i..])
        }
        _ => name.to_string(),
    }
}

// Only the literal `<name>/<single digit>` shape; other slash forms stay.
fn collapse_slash_digit(name: &str) -> String {
    match name.rsplit_once('/') {
        Some((head, tail))
            if !head.is_empty() && tail.len() == 1 && tail.chars().all(|c| c.is_ascii_digit()) =>
        {
            format!("{head}{tail}")
        }
        _ => name.to_string(),
    }
}
