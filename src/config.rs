//! Run configuration
//!
//! Immutable inputs for one progression run, built in code through
//! [`RunConfigurationBuilder`] or loaded from JSON. Both paths validate before
//! any traversal starts.

use crate::alphabet::OperatorFamily;
use crate::chord::ChordQuality;
use crate::neo_riemann;
use crate::pitch::PitchClass;
use crate::transform::{TransformToken, MAX_TRANSPOSITION};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Lowest accepted base octave.
const MIN_OCTAVE: i32 = 0;

/// Highest accepted base octave.
const MAX_OCTAVE: i32 = 8;

/// Errors returned while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value is out of range or malformed.
    #[error("invalid configuration `{field}`: {msg}")]
    InvalidConfiguration {
        /// The name of the offending field.
        field: &'static str,
        /// A description of the problem.
        msg: String,
    },

    /// The JSON document could not be decoded.
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("configuration io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    fn invalid(field: &'static str, msg: impl Into<String>) -> Self {
        ConfigError::InvalidConfiguration {
            field,
            msg: msg.into(),
        }
    }
}

/// How pitches are presented in a progression.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchFormat {
    /// Scientific pitch names such as `C4`.
    #[default]
    Named,
    /// Raw pitch numbers such as `60`.
    Numeric,
}

/// Which traversal drives the run.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkMode {
    /// One pass over the sequence.
    #[default]
    Linear,
    /// Random forward/backward walk over the sequence as a cycle.
    Circular,
}

/// Where the transformation sequence comes from.
///
/// In JSON this is either an integer (a count to sample) or an array of
/// token strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformSpec {
    /// Sample this many tokens from the alphabet.
    Count(usize),
    /// Use exactly these tokens.
    Explicit(Vec<TransformToken>),
}

/// Inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    /// Root of the starting chord, e.g. `"C"` or `"F#"`.
    pub note: String,
    /// Octave of the root, `0..=8`.
    pub octave: i32,
    /// Chord quality string, e.g. `"maj"` or `"7"`.
    pub quality: String,
    /// Presentation of pitches in the result.
    pub format: PitchFormat,
    /// Largest transposition generated, in semitones.
    pub semitone_bound: u32,
    /// Operator families a generated sequence may draw from.
    pub families: Vec<OperatorFamily>,
    /// Explicit sequence or number of tokens to sample.
    pub transforms: TransformSpec,
    /// Linear or circular traversal.
    pub mode: WalkMode,
    /// Number of steps taken by a circular walk.
    pub walk_bound: usize,
    /// Seed for sampling and walk direction; random when absent.
    pub seed: Option<u64>,
    /// Report every step through the `log` facade.
    pub verbose: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        RunConfiguration {
            note: "C".to_string(),
            octave: 4,
            quality: "maj".to_string(),
            format: PitchFormat::Named,
            semitone_bound: 2,
            families: vec![OperatorFamily::Transpose, OperatorFamily::NeoRiemann],
            transforms: TransformSpec::Count(4),
            mode: WalkMode::Linear,
            walk_bound: 4,
            seed: None,
            verbose: false,
        }
    }
}

impl RunConfiguration {
    /// Start from the defaults (C major, octave 4, four sampled tokens).
    pub fn builder() -> RunConfigurationBuilder {
        RunConfigurationBuilder::new()
    }

    /// Decode and validate a JSON configuration. Missing fields take their
    /// default values.
    pub fn from_json_str(json: &str) -> Result<RunConfiguration, ConfigError> {
        let config: RunConfiguration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, decode and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<RunConfiguration, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Parsed chord quality.
    pub fn chord_quality(&self) -> Result<ChordQuality, ConfigError> {
        ChordQuality::parse(&self.quality).map_err(|e| ConfigError::invalid("quality", e.to_string()))
    }

    /// Check every value, failing on the first bad one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        PitchClass::parse(&self.note).map_err(|e| ConfigError::invalid("note", e.to_string()))?;

        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&self.octave) {
            return Err(ConfigError::invalid(
                "octave",
                format!("{} outside {MIN_OCTAVE}..={MAX_OCTAVE}", self.octave),
            ));
        }

        let quality = self.chord_quality()?;

        if self.families.is_empty() {
            return Err(ConfigError::invalid("families", "at least one family required"));
        }
        if self.families.contains(&OperatorFamily::Transpose) {
            if self.semitone_bound == 0 {
                return Err(ConfigError::invalid(
                    "semitone_bound",
                    "must be >= 1 when transpositions are allowed",
                ));
            }
            if self.semitone_bound > MAX_TRANSPOSITION as u32 {
                return Err(ConfigError::invalid(
                    "semitone_bound",
                    format!("{} exceeds {MAX_TRANSPOSITION}", self.semitone_bound),
                ));
            }
        }

        match &self.transforms {
            TransformSpec::Count(0) => Err(ConfigError::invalid("transforms", "count must be >= 1")),
            // sampled tokens must all apply to the starting chord
            TransformSpec::Count(_)
                if self.families.contains(&OperatorFamily::NeoRiemann)
                    && !neo_riemann::operates_on(quality) =>
            {
                Err(ConfigError::invalid(
                    "families",
                    format!("no Neo-Riemannian operators are defined on {quality} chords"),
                ))
            }
            TransformSpec::Explicit(tokens) if tokens.is_empty() => {
                Err(ConfigError::invalid("transforms", "sequence must not be empty"))
            }
            TransformSpec::Explicit(tokens) => match tokens.iter().find(|t| {
                matches!(t, TransformToken::Transpose(n) if n.unsigned_abs() > MAX_TRANSPOSITION as u32)
            }) {
                Some(token) => Err(ConfigError::invalid(
                    "transforms",
                    format!("`{token}` shifts more than {MAX_TRANSPOSITION} semitones"),
                )),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

/// Builder for [`RunConfiguration`]
pub struct RunConfigurationBuilder {
    config: RunConfiguration,
}

impl RunConfigurationBuilder {
    /// Create a builder holding the default configuration.
    pub fn new() -> Self {
        RunConfigurationBuilder {
            config: RunConfiguration::default(),
        }
    }

    /// Set the root note of the starting chord.
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.config.note = note.into();
        self
    }

    /// Set the octave of the root.
    pub fn octave(mut self, octave: i32) -> Self {
        self.config.octave = octave;
        self
    }

    /// Set the chord quality.
    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.config.quality = quality.into();
        self
    }

    /// Set the pitch presentation format.
    pub fn format(mut self, format: PitchFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Set the largest generated transposition.
    pub fn semitone_bound(mut self, bound: u32) -> Self {
        self.config.semitone_bound = bound;
        self
    }

    /// Set the operator families for generated sequences.
    pub fn families(mut self, families: Vec<OperatorFamily>) -> Self {
        self.config.families = families;
        self
    }

    /// Use an explicit token sequence.
    pub fn sequence(mut self, tokens: Vec<TransformToken>) -> Self {
        self.config.transforms = TransformSpec::Explicit(tokens);
        self
    }

    /// Sample `count` tokens from the alphabet.
    pub fn count(mut self, count: usize) -> Self {
        self.config.transforms = TransformSpec::Count(count);
        self
    }

    /// Set the traversal mode.
    pub fn mode(mut self, mode: WalkMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Set the number of circular walk steps.
    pub fn walk_bound(mut self, bound: usize) -> Self {
        self.config.walk_bound = bound;
        self
    }

    /// Fix the random seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Report steps through the `log` facade.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Validate and finish.
    pub fn build(self) -> Result<RunConfiguration, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for RunConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
