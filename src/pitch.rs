//! Pitch
//!
//! Conversion between scientific pitch names (`C4`, `F#3`, `Bb2`) and
//! integer pitch numbers, with middle C at 60.

use std::fmt::Display;
use thiserror::Error;

/// Number of pitch classes in an octave.
pub const SEMITONES: i32 = 12;

/// Lowest pitch number the codec will name.
const MIN_PITCH: i32 = 0;

/// Highest pitch number the codec will name.
const MAX_PITCH: i32 = 127;

/// Errors from pitch name conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PitchError {
    /// A note name could not be parsed, or a pitch number has no name.
    #[error("invalid note `{note}`: {msg}")]
    InvalidNote {
        /// The offending note name or pitch number.
        note: String,
        /// Why it was rejected.
        msg: String,
    },
}

impl PitchError {
    fn invalid(note: impl Into<String>, msg: impl Into<String>) -> Self {
        PitchError::InvalidNote {
            note: note.into(),
            msg: msg.into(),
        }
    }
}

/// Twelve chromatic pitch classes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    /// C
    C,
    /// C sharp / D flat
    Cs,
    /// D
    D,
    /// D sharp / E flat
    Ds,
    /// E
    E,
    /// F
    F,
    /// F sharp / G flat
    Fs,
    /// G
    G,
    /// G sharp / A flat
    Gs,
    /// A
    A,
    /// A sharp / B flat
    As,
    /// B
    B,
}

const PITCH_CLASSES: [PitchClass; 12] = [
    PitchClass::C,
    PitchClass::Cs,
    PitchClass::D,
    PitchClass::Ds,
    PitchClass::E,
    PitchClass::F,
    PitchClass::Fs,
    PitchClass::G,
    PitchClass::Gs,
    PitchClass::A,
    PitchClass::As,
    PitchClass::B,
];

impl PitchClass {
    /// Pitch class of any pitch number (negative numbers wrap).
    pub fn of(pitch: i32) -> PitchClass {
        PITCH_CLASSES[pitch.rem_euclid(SEMITONES) as usize]
    }

    /// Semitone index above C, `0..12`.
    pub const fn index(self) -> i32 {
        self as i32
    }

    /// Sharp spelling of the pitch class.
    pub const fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Parse a bare pitch class such as `"C"`, `"f#"` or `"Bb"`.
    ///
    /// Any number of `#` or `b` accidentals is accepted and may wrap across
    /// the octave (`"B#"` is C).
    pub fn parse(name: &str) -> Result<PitchClass, PitchError> {
        let mut chars = name.chars();
        let letter = chars
            .next()
            .ok_or_else(|| PitchError::invalid(name, "empty note name"))?;
        let natural = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            other => {
                return Err(PitchError::invalid(
                    name,
                    format!("`{other}` is not a note letter"),
                ))
            }
        };
        let mut offset = 0;
        for c in chars {
            match c {
                '#' => offset += 1,
                'b' => offset -= 1,
                other => {
                    return Err(PitchError::invalid(
                        name,
                        format!("`{other}` is not an accidental"),
                    ))
                }
            }
        }
        Ok(PitchClass::of(natural + offset))
    }
}

impl Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts between named pitches and integer pitch numbers.
pub trait PitchCodec {
    /// Parse a named pitch (letter, accidentals, octave) into a pitch number.
    fn to_pitch_number(&self, name: &str) -> Result<i32, PitchError>;

    /// Render a pitch number as a named pitch with octave.
    fn to_name(&self, pitch: i32) -> Result<String, PitchError>;
}

/// Scientific pitch notation with `C4 = 60`, defined over pitch numbers 0..=127.
#[derive(Debug, Default, Copy, Clone)]
pub struct IsoPitchCodec;

impl IsoPitchCodec {
    /// Pitch number of `class` in `octave`, without range checks.
    pub fn pitch_number(class: PitchClass, octave: i32) -> i32 {
        (octave + 1) * SEMITONES + class.index()
    }
}

impl PitchCodec for IsoPitchCodec {
    fn to_pitch_number(&self, name: &str) -> Result<i32, PitchError> {
        let split = name
            .find(|c: char| c.is_ascii_digit() || c == '-')
            .ok_or_else(|| PitchError::invalid(name, "missing octave"))?;
        let (class, octave) = name.split_at(split);
        let class = PitchClass::parse(class)?;
        let octave: i32 = octave
            .parse()
            .map_err(|_| PitchError::invalid(name, format!("bad octave `{octave}`")))?;

        let pitch = Self::pitch_number(class, octave);
        if !(MIN_PITCH..=MAX_PITCH).contains(&pitch) {
            return Err(PitchError::invalid(
                name,
                format!("pitch {pitch} outside {MIN_PITCH}..={MAX_PITCH}"),
            ));
        }
        Ok(pitch)
    }

    fn to_name(&self, pitch: i32) -> Result<String, PitchError> {
        if !(MIN_PITCH..=MAX_PITCH).contains(&pitch) {
            return Err(PitchError::invalid(
                pitch.to_string(),
                format!("outside {MIN_PITCH}..={MAX_PITCH}"),
            ));
        }
        let octave = pitch.div_euclid(SEMITONES) - 1;
        Ok(format!("{}{}", PitchClass::of(pitch), octave))
    }
}

/// Strip the octave digits (and sign) from a named pitch: `"C#4"` -> `"C#"`.
pub fn strip_octave(name: &str) -> &str {
    name.trim_end_matches(|c: char| c.is_ascii_digit() || c == '-')
}
