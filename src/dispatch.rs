//! Token dispatch
//!
//! Advances chord state by one transformation token.

use crate::chord::PitchSet;
use crate::neo_riemann::NeoRiemannOp;
use crate::transform::{TransformError, TransformToken, TransposeOp};

/// Applies tokens using the transposition and Neo-Riemannian collaborators.
pub struct TokenDispatcher<'a> {
    transposer: &'a dyn TransposeOp,
    neo_riemann: &'a dyn NeoRiemannOp,
}

impl<'a> TokenDispatcher<'a> {
    /// Dispatch through the given collaborators.
    pub fn new(transposer: &'a dyn TransposeOp, neo_riemann: &'a dyn NeoRiemannOp) -> Self {
        TokenDispatcher {
            transposer,
            neo_riemann,
        }
    }

    /// Compute the chord that follows `current` under `token`.
    ///
    /// `origin` is the run's starting chord and is only ever copied.
    /// Composite Neo-Riemannian names are applied one letter at a time, each
    /// letter consuming the previous letter's output.
    ///
    /// Returns `Err(CardinalityMismatch)` if any collaborator changes the
    /// number of voices, and whatever error the Neo-Riemannian collaborator
    /// raises for unknown or inapplicable operators.
    pub fn apply(
        &self,
        token: &TransformToken,
        origin: &[i32],
        current: &[i32],
    ) -> Result<PitchSet, TransformError> {
        log::trace!("applying {token} to {current:?}");
        match token {
            TransformToken::Origin => Ok(origin.to_vec()),
            TransformToken::Identity => Ok(current.to_vec()),
            TransformToken::Transpose(semitones) => {
                checked(current, self.transposer.transpose(*semitones, current))
            }
            TransformToken::NeoRiemann(name) if token.is_composite() => self
                .neo_riemann
                .tokenize(name)
                .iter()
                .try_fold(current.to_vec(), |chord, op| {
                    checked(&chord, self.neo_riemann.transform(op, &chord)?)
                }),
            TransformToken::NeoRiemann(name) => {
                checked(current, self.neo_riemann.transform(name, current)?)
            }
        }
    }
}

fn checked(before: &[i32], after: PitchSet) -> Result<PitchSet, TransformError> {
    if after.len() != before.len() {
        return Err(TransformError::CardinalityMismatch {
            expected: before.len(),
            got: after.len(),
        });
    }
    Ok(after)
}
