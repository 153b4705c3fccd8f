//! Progression walks
//!
//! Linear and circular traversals over a transformation sequence, and the
//! engine that bundles the collaborators they use.

use crate::alphabet::Alphabet;
use crate::chord::{ChordBuilder, ChordError, IntervalChordBuilder, PitchSet};
use crate::config::{ConfigError, PitchFormat, RunConfiguration, TransformSpec, WalkMode};
use crate::dispatch::TokenDispatcher;
use crate::naming::{normalize_chord_name, ChordNamer, TemplateNamer};
use crate::neo_riemann::{NeoRiemannOp, ParsimoniousOps};
use crate::pitch::{strip_octave, IsoPitchCodec, PitchCodec, PitchError};
use crate::transform::{ShiftTransposer, TransformError, TransformToken, TransposeOp};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;

/// Errors that abort a progression run.
#[derive(Debug, Error)]
pub enum ProgressionError {
    /// The configuration was rejected before traversal.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The starting chord could not be built.
    #[error(transparent)]
    Chord(#[from] ChordError),

    /// A token could not be applied.
    #[error("step {step}: {source}")]
    Transform {
        /// Zero-based index of the failing step.
        step: usize,
        /// The underlying failure.
        source: TransformError,
    },

    /// A pitch could not be rendered.
    #[error(transparent)]
    Pitch(#[from] PitchError),
}

/// A chord voicing in the configured presentation format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Voicing {
    /// Scientific pitch names, e.g. `["C4", "E4", "G4"]`.
    Named(Vec<String>),
    /// Pitch numbers, e.g. `[60, 64, 67]`.
    Numeric(Vec<i32>),
}

/// One applied token and the chord it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressionStep {
    /// The chord after the token, as pitch numbers.
    pub pitches: PitchSet,
    /// The same chord in the configured presentation format.
    pub voicing: Voicing,
    /// The token that produced the chord.
    pub token: TransformToken,
    /// Normalized chord label.
    pub chord_name: String,
}

/// The ordered result of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progression {
    origin: PitchSet,
    steps: Vec<ProgressionStep>,
}

impl Progression {
    /// The starting chord of the run.
    pub fn origin(&self) -> &[i32] {
        &self.origin
    }

    /// Steps in application order.
    pub fn steps(&self) -> &[ProgressionStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step was taken.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Chords in order, for writers that only need pitches.
    pub fn chords(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.steps.iter().map(|s| s.pitches.as_slice())
    }
}

/// Receives every step as soon as it is produced.
pub trait StepObserver {
    /// Called once per step, in order.
    fn on_step(&mut self, index: usize, step: &ProgressionStep);
}

impl<F: FnMut(usize, &ProgressionStep)> StepObserver for F {
    fn on_step(&mut self, index: usize, step: &ProgressionStep) {
        self(index, step)
    }
}

/// Reports each step at `info` level through the `log` facade.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogObserver;

impl StepObserver for LogObserver {
    fn on_step(&mut self, index: usize, step: &ProgressionStep) {
        log::info!(
            "step {index}: {} -> {:?} ({})",
            step.token,
            step.voicing,
            step.chord_name
        );
    }
}

/// Builder for [`ProgressionEngine`] to swap individual collaborators
pub struct ProgressionEngineBuilder {
    engine: ProgressionEngine,
}

impl ProgressionEngineBuilder {
    /// Start from the default collaborators.
    pub fn new() -> Self {
        ProgressionEngineBuilder {
            engine: ProgressionEngine::new(),
        }
    }

    /// Set the pitch codec.
    pub fn codec(mut self, codec: impl PitchCodec + 'static) -> Self {
        self.engine.codec = Box::new(codec);
        self
    }

    /// Set the chord builder.
    pub fn chord_builder(mut self, builder: impl ChordBuilder + 'static) -> Self {
        self.engine.chord_builder = Box::new(builder);
        self
    }

    /// Set the transposition operator.
    pub fn transposer(mut self, transposer: impl TransposeOp + 'static) -> Self {
        self.engine.transposer = Box::new(transposer);
        self
    }

    /// Set the Neo-Riemannian operators.
    pub fn neo_riemann(mut self, ops: impl NeoRiemannOp + 'static) -> Self {
        self.engine.neo_riemann = Box::new(ops);
        self
    }

    /// Set the chord namer.
    pub fn namer(mut self, namer: impl ChordNamer + 'static) -> Self {
        self.engine.namer = Box::new(namer);
        self
    }

    /// Build the `ProgressionEngine`
    pub fn build(self) -> ProgressionEngine {
        self.engine
    }
}

impl Default for ProgressionEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs progressions over a set of collaborators. Holds no per-run state.
pub struct ProgressionEngine {
    codec: Box<dyn PitchCodec>,
    chord_builder: Box<dyn ChordBuilder>,
    transposer: Box<dyn TransposeOp>,
    neo_riemann: Box<dyn NeoRiemannOp>,
    namer: Box<dyn ChordNamer>,
}

impl ProgressionEngine {
    /// Return a builder to replace collaborators
    pub fn builder() -> ProgressionEngineBuilder {
        ProgressionEngineBuilder::new()
    }

    /// Create an engine with the default collaborators.
    pub fn new() -> Self {
        ProgressionEngine {
            codec: Box::new(IsoPitchCodec),
            chord_builder: Box::new(IntervalChordBuilder),
            transposer: Box::new(ShiftTransposer),
            neo_riemann: Box::new(ParsimoniousOps),
            namer: Box::new(TemplateNamer),
        }
    }

    /// Run the walk selected by `config.mode`.
    ///
    /// Randomness comes from a ChaCha8 generator seeded with `config.seed`,
    /// or from the OS when no seed is set. Steps are logged when
    /// `config.verbose` is set.
    pub fn run(&self, config: &RunConfiguration) -> Result<Progression, ProgressionError> {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let mut observer: Box<dyn StepObserver> = if config.verbose {
            Box::new(LogObserver)
        } else {
            Box::new(|_: usize, _: &ProgressionStep| {})
        };

        match config.mode {
            WalkMode::Linear => self.linear(config, &mut rng, &mut *observer),
            WalkMode::Circular => self.circular(config, &mut rng, &mut *observer),
        }
    }

    /// Apply every token of the sequence once, in order.
    ///
    /// The result has exactly as many steps as the sequence has tokens.
    pub fn linear<R, O>(
        &self,
        config: &RunConfiguration,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<Progression, ProgressionError>
    where
        R: Rng + ?Sized,
        O: StepObserver + ?Sized,
    {
        let mut state = self.start(config)?;
        let sequence = resolve_sequence(config, rng)?;
        for token in &sequence {
            self.step(&mut state, token, config.format, observer)?;
        }
        Ok(state.finish())
    }

    /// Walk the sequence as a cycle for `config.walk_bound` steps.
    ///
    /// The token is chosen by a position that moves one place forward or
    /// backward at random after every step, wrapping at either end. The chord
    /// itself still evolves step after step from the previous chord.
    pub fn circular<R, O>(
        &self,
        config: &RunConfiguration,
        rng: &mut R,
        observer: &mut O,
    ) -> Result<Progression, ProgressionError>
    where
        R: Rng + ?Sized,
        O: StepObserver + ?Sized,
    {
        let mut state = self.start(config)?;
        let sequence = resolve_sequence(config, rng)?;
        // validate() in start() guarantees a non-empty cycle
        debug_assert!(!sequence.is_empty());
        let len = sequence.len() as i64;
        let mut position: i64 = 0;
        for _ in 0..config.walk_bound {
            let token = &sequence[position.rem_euclid(len) as usize];
            self.step(&mut state, token, config.format, observer)?;
            position += if rng.random_bool(0.5) { 1 } else { -1 };
        }
        Ok(state.finish())
    }

    fn start(&self, config: &RunConfiguration) -> Result<WalkState, ProgressionError> {
        config.validate()?;
        let origin = self
            .chord_builder
            .build(&config.note, config.octave, &config.quality)?;
        Ok(WalkState {
            current: origin.clone(),
            origin,
            steps: Vec::new(),
        })
    }

    fn step<O: StepObserver + ?Sized>(
        &self,
        state: &mut WalkState,
        token: &TransformToken,
        format: PitchFormat,
        observer: &mut O,
    ) -> Result<(), ProgressionError> {
        let index = state.steps.len();
        let next = TokenDispatcher::new(self.transposer.as_ref(), self.neo_riemann.as_ref())
            .apply(token, &state.origin, &state.current)
            .map_err(|source| ProgressionError::Transform {
                step: index,
                source,
            })?;

        let names = next
            .iter()
            .map(|&p| self.codec.to_name(p))
            .collect::<Result<Vec<_>, _>>()?;
        let bare: Vec<String> = names.iter().map(|n| strip_octave(n).to_string()).collect();
        let chord_name = normalize_chord_name(&self.namer.name(&bare));

        let voicing = match format {
            PitchFormat::Named => Voicing::Named(names),
            PitchFormat::Numeric => Voicing::Numeric(next.clone()),
        };
        let step = ProgressionStep {
            pitches: next.clone(),
            voicing,
            token: token.clone(),
            chord_name,
        };
        observer.on_step(index, &step);
        state.steps.push(step);
        state.current = next;
        Ok(())
    }
}

impl Default for ProgressionEngine {
    fn default() -> Self {
        ProgressionEngine::new()
    }
}

/// Run the walk selected by `config.mode` with the default collaborators.
pub fn run(config: &RunConfiguration) -> Result<Progression, ProgressionError> {
    ProgressionEngine::new().run(config)
}

/// The explicit sequence, or `count` tokens sampled from the alphabet.
pub fn resolve_sequence<R: Rng + ?Sized>(
    config: &RunConfiguration,
    rng: &mut R,
) -> Result<Vec<TransformToken>, ConfigError> {
    match &config.transforms {
        TransformSpec::Explicit(tokens) => Ok(tokens.clone()),
        TransformSpec::Count(count) => {
            let sequence = Alphabet::from_config(config)?.sample(*count, rng);
            log::debug!("sampled sequence: {sequence:?}");
            Ok(sequence)
        }
    }
}

struct WalkState {
    origin: PitchSet,
    current: PitchSet,
    steps: Vec<ProgressionStep>,
}

impl WalkState {
    fn finish(self) -> Progression {
        Progression {
            origin: self.origin,
            steps: self.steps,
        }
    }
}
