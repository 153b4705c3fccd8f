//! # chord_walk
//!
//! Generate chord progressions by repeatedly transforming a starting chord
//! with transpositions and Neo-Riemannian operators, either in one linear
//! pass over a token sequence or as a random walk around it.
//!
//! ## Example
//! ```rust
//! use chord_walk::{ProgressionEngine, RunConfiguration, TransformToken};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Describe the run: C major, then P, then up a whole tone
//!     let config = RunConfiguration::builder()
//!         .note("C")
//!         .octave(4)
//!         .quality("maj")
//!         .sequence(vec![
//!             TransformToken::Origin,
//!             TransformToken::neo("P"),
//!             TransformToken::Transpose(2),
//!         ])
//!         .build()?;
//!
//!     // 2) Run it with the default collaborators
//!     let progression = ProgressionEngine::new().run(&config)?;
//!
//!     // 3) Read the chords back
//!     for step in progression.steps() {
//!         println!("{} -> {:?} {}", step.token, step.voicing, step.chord_name);
//!     }
//!
//!     Ok(())
//! }
//! # run().unwrap();
//! ```
//!
//! Generated sequences draw from an [`Alphabet`] built from the chord
//! quality and allowed [`OperatorFamily`] set; pass a seed for reproducible
//! runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Token alphabet and sampling.
pub use alphabet::{Alphabet, OperatorFamily};

/// Chord qualities and construction.
pub use chord::{ChordBuilder, ChordError, ChordQuality, Identified, IntervalChordBuilder, PitchSet};

/// Run configuration.
pub use config::{
    ConfigError, PitchFormat, RunConfiguration, RunConfigurationBuilder, TransformSpec, WalkMode,
};

/// Single-token dispatch.
pub use dispatch::TokenDispatcher;

/// Chord labels.
pub use naming::{normalize_chord_name, ChordNamer, TemplateNamer};

/// Neo-Riemannian operators.
pub use neo_riemann::{
    operates_on, NeoRiemannOp, ParsimoniousOps, SEVENTH_OPERATORS, TRIAD_OPERATORS,
};

/// Pitch names and numbers.
pub use pitch::{IsoPitchCodec, PitchClass, PitchCodec, PitchError};

/// Tokens and transposition.
pub use transform::{
    ShiftTransposer, TransformError, TransformToken, TransposeOp, MAX_TRANSPOSITION,
};

/// Traversals and results.
pub use walk::{
    resolve_sequence, run, LogObserver, Progression, ProgressionEngine, ProgressionEngineBuilder,
    ProgressionError, ProgressionStep, StepObserver, Voicing,
};

/// Token alphabet module.
pub mod alphabet;

/// Chord module.
pub mod chord;

/// Configuration module.
pub mod config;

/// Dispatch module.
pub mod dispatch;

/// Chord naming module.
pub mod naming;

/// Neo-Riemannian module.
pub mod neo_riemann;

/// Pitch module.
pub mod pitch;

/// Transformation token module.
pub mod transform;

/// Progression walk module.
pub mod walk;
