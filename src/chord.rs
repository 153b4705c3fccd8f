//! Chord
//!
//! Chord qualities, their interval templates, and construction of a voicing
//! from a root note, octave and quality.

use crate::pitch::{IsoPitchCodec, PitchClass, PitchError, SEMITONES};
use std::fmt::Display;
use thiserror::Error;

/// An ordered chord voicing as pitch numbers. Order is never re-sorted.
pub type PitchSet = Vec<i32>;

/// Number of supported chord qualities
const NUM_QUALITIES: usize = 11;

/// Supported chord qualities in the same order as `QUALITY_INTERVALS`
const QUALITIES: [ChordQuality; NUM_QUALITIES] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Diminished,
    ChordQuality::Augmented,
    ChordQuality::SuspendedSecond,
    ChordQuality::SuspendedFourth,
    ChordQuality::DominantSeventh,
    ChordQuality::MajorSeventh,
    ChordQuality::MinorSeventh,
    ChordQuality::HalfDiminishedSeventh,
    ChordQuality::DiminishedSeventh,
];

/// Intervals (in semitones above the root) matching `QUALITIES` order
const QUALITY_INTERVALS: [&[i32]; NUM_QUALITIES] = [
    &[0, 4, 7],
    &[0, 3, 7],
    &[0, 3, 6],
    &[0, 4, 8],
    &[0, 2, 7],
    &[0, 5, 7],
    &[0, 4, 7, 10],
    &[0, 4, 7, 11],
    &[0, 3, 7, 10],
    &[0, 3, 6, 10],
    &[0, 3, 6, 9],
];

/// Supported chord qualities
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChordQuality {
    /// Major triad (e.g., C-E-G)
    Major,
    /// Minor triad (e.g., C-Eb-G)
    Minor,
    /// Diminished triad (e.g., C-Eb-Gb)
    Diminished,
    /// Augmented triad (e.g., C-E-G#)
    Augmented,
    /// Suspended second (e.g., C-D-G)
    SuspendedSecond,
    /// Suspended fourth (e.g., C-F-G)
    SuspendedFourth,
    /// Dominant seventh (e.g., C-E-G-Bb)
    DominantSeventh,
    /// Major seventh (e.g., C-E-G-B)
    MajorSeventh,
    /// Minor seventh (e.g., C-Eb-G-Bb)
    MinorSeventh,
    /// Half-diminished seventh (e.g., C-Eb-Gb-Bb)
    HalfDiminishedSeventh,
    /// Diminished seventh (e.g., C-Eb-Gb-A)
    DiminishedSeventh,
}

impl ChordQuality {
    /// Semitone offsets of each chord tone above the root, root first.
    pub fn intervals(self) -> &'static [i32] {
        QUALITY_INTERVALS[self as usize]
    }

    /// Number of voices in the root-position voicing.
    pub fn cardinality(self) -> usize {
        self.intervals().len()
    }

    /// Whether this is a four-voice seventh chord.
    pub fn is_seventh(self) -> bool {
        self.cardinality() == 4
    }

    /// Chord-symbol suffix, e.g. `"m7"` for [`ChordQuality::MinorSeventh`].
    pub const fn symbol(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "o",
            ChordQuality::Augmented => "+",
            ChordQuality::SuspendedSecond => "sus2",
            ChordQuality::SuspendedFourth => "sus4",
            ChordQuality::DominantSeventh => "7",
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::MinorSeventh => "m7",
            ChordQuality::HalfDiminishedSeventh => "m7b5",
            ChordQuality::DiminishedSeventh => "o7",
        }
    }

    /// Parse a quality string. Common aliases are accepted; matching is exact
    /// apart from surrounding whitespace, since `M` and `m` differ.
    pub fn parse(quality: &str) -> Result<ChordQuality, ChordError> {
        let quality = match quality.trim() {
            "" | "M" | "maj" | "major" => ChordQuality::Major,
            "m" | "min" | "minor" | "-" => ChordQuality::Minor,
            "o" | "dim" | "diminished" => ChordQuality::Diminished,
            "+" | "aug" | "augmented" => ChordQuality::Augmented,
            "sus2" => ChordQuality::SuspendedSecond,
            "sus" | "sus4" => ChordQuality::SuspendedFourth,
            "7" | "dom7" | "dominant7" => ChordQuality::DominantSeventh,
            "M7" | "maj7" | "major7" => ChordQuality::MajorSeventh,
            "m7" | "min7" | "minor7" | "-7" => ChordQuality::MinorSeventh,
            "m7b5" | "ø7" | "ø" | "half-diminished" | "halfdim7" => {
                ChordQuality::HalfDiminishedSeventh
            }
            "o7" | "dim7" | "diminished7" => ChordQuality::DiminishedSeventh,
            other => {
                return Err(ChordError::UnknownQuality {
                    quality: other.to_string(),
                })
            }
        };
        Ok(quality)
    }

    /// Identify root, quality and inversion of an ordered voicing.
    ///
    /// The first voice is taken as the bass. Doubled pitch classes are
    /// never matched. Symmetric qualities resolve to the earliest voice
    /// that works as a root.
    pub fn identify(pitches: &[i32]) -> Option<Identified> {
        let mut classes: Vec<i32> = pitches.iter().map(|p| p.rem_euclid(SEMITONES)).collect();
        let bass = *classes.first()?;
        classes.sort_unstable();
        classes.dedup();
        if classes.len() != pitches.len() {
            return None;
        }

        for root in pitches.iter().map(|p| p.rem_euclid(SEMITONES)) {
            for quality in QUALITIES {
                let intervals = quality.intervals();
                if intervals.len() != classes.len() {
                    continue;
                }
                let mut template: Vec<i32> = intervals
                    .iter()
                    .map(|i| (root + i).rem_euclid(SEMITONES))
                    .collect();
                template.sort_unstable();
                if template != classes {
                    continue;
                }
                let inversion = intervals
                    .iter()
                    .position(|i| (root + i).rem_euclid(SEMITONES) == bass)
                    .unwrap_or(0);
                return Some(Identified {
                    root: PitchClass::of(root),
                    quality,
                    inversion,
                });
            }
        }
        None
    }

    /// Role of each voice, as an index into [`ChordQuality::intervals`],
    /// when the voicing is this quality over `root`.
    pub(crate) fn roles(self, root: PitchClass, pitches: &[i32]) -> Option<Vec<usize>> {
        pitches
            .iter()
            .map(|p| {
                self.intervals().iter().position(|i| {
                    (root.index() + i).rem_euclid(SEMITONES) == p.rem_euclid(SEMITONES)
                })
            })
            .collect()
    }
}

impl Display for ChordQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Result of [`ChordQuality::identify`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Identified {
    /// Root pitch class.
    pub root: PitchClass,
    /// Matched quality.
    pub quality: ChordQuality,
    /// Which chord tone is in the bass: 0 root, 1 third, 2 fifth, 3 seventh.
    pub inversion: usize,
}

/// Errors when building chords
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChordError {
    /// The requested quality has no interval template.
    #[error("unknown chord quality `{quality}`")]
    UnknownQuality {
        /// The quality string as given.
        quality: String,
    },

    /// The root note could not be placed.
    #[error(transparent)]
    InvalidNote(#[from] PitchError),
}

/// Builds a voicing from a root note, octave and quality.
pub trait ChordBuilder {
    /// Return the ordered pitch numbers of the chord in root position.
    fn build(&self, note: &str, octave: i32, quality: &str) -> Result<PitchSet, ChordError>;
}

/// Close root-position voicings stacked from the quality's interval template.
#[derive(Debug, Default, Copy, Clone)]
pub struct IntervalChordBuilder;

impl ChordBuilder for IntervalChordBuilder {
    fn build(&self, note: &str, octave: i32, quality: &str) -> Result<PitchSet, ChordError> {
        let quality = ChordQuality::parse(quality)?;
        let root = IsoPitchCodec::pitch_number(PitchClass::parse(note)?, octave);
        Ok(quality.intervals().iter().map(|i| root + i).collect())
    }
}
