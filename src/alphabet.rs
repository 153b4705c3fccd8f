//! Alphabet
//!
//! The finite set of tokens a generated transformation sequence draws from.

use crate::chord::ChordQuality;
use crate::config::{ConfigError, RunConfiguration};
use crate::neo_riemann::{SEVENTH_OPERATORS, TRIAD_OPERATORS};
use crate::transform::{TransformToken, MAX_TRANSPOSITION};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordered arrangements of two distinct triad operators.
const TRIAD_PAIRS: [&str; 6] = ["PR", "PL", "RP", "RL", "LP", "LR"];

/// Ordered arrangements of all three triad operators.
const TRIAD_TRIPLES: [&str; 6] = ["PRL", "PLR", "RPL", "RLP", "LPR", "LRP"];

/// Operator families a generated sequence may use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorFamily {
    /// `T+n` / `T-n` transpositions up to the semitone bound.
    Transpose,
    /// Neo-Riemannian operators suited to the chord quality.
    NeoRiemann,
}

/// Set of tokens available for sampling, in a fixed construction order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    tokens: Vec<TransformToken>,
}

impl Alphabet {
    /// Build the alphabet.
    ///
    /// Always contains `O` and `I`. Transpositions add `T+k` and `T-k` for
    /// `1 <= k <= semitone_bound`. Neo-Riemannian operators add the nine
    /// seventh-chord operators for seventh qualities, otherwise `P`, `R`,
    /// `L` and every ordered arrangement of two or three of them.
    ///
    /// Bounds above [`MAX_TRANSPOSITION`] are clamped to it.
    pub fn build(
        quality: ChordQuality,
        semitone_bound: u32,
        families: &[OperatorFamily],
    ) -> Alphabet {
        let mut tokens = vec![TransformToken::Origin, TransformToken::Identity];

        if families.contains(&OperatorFamily::Transpose) {
            let bound = i32::try_from(semitone_bound)
                .unwrap_or(MAX_TRANSPOSITION)
                .min(MAX_TRANSPOSITION);
            for k in 1..=bound {
                tokens.push(TransformToken::Transpose(k));
                tokens.push(TransformToken::Transpose(-k));
            }
        }

        if families.contains(&OperatorFamily::NeoRiemann) {
            let names: Vec<&str> = if quality.is_seventh() {
                SEVENTH_OPERATORS.to_vec()
            } else {
                TRIAD_OPERATORS
                    .iter()
                    .chain(TRIAD_PAIRS.iter())
                    .chain(TRIAD_TRIPLES.iter())
                    .copied()
                    .collect()
            };
            tokens.extend(names.into_iter().map(TransformToken::neo));
        }

        log::debug!(
            "alphabet for {quality} (bound {semitone_bound}, {families:?}): {} tokens",
            tokens.len()
        );
        Alphabet { tokens }
    }

    /// Build the alphabet a run configuration asks for.
    pub fn from_config(config: &RunConfiguration) -> Result<Alphabet, ConfigError> {
        Ok(Self::build(
            config.chord_quality()?,
            config.semitone_bound,
            &config.families,
        ))
    }

    /// Tokens in construction order.
    pub fn tokens(&self) -> &[TransformToken] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Never true for a built alphabet; `O` and `I` are always present.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Draw `count` tokens uniformly, with replacement, in draw order.
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<TransformToken> {
        if self.tokens.is_empty() {
            return Vec::new();
        }
        (0..count)
            .map(|_| self.tokens[rng.random_range(0..self.tokens.len())].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    const NEO_ONLY: [OperatorFamily; 1] = [OperatorFamily::NeoRiemann];
    const BOTH: [OperatorFamily; 2] = [OperatorFamily::Transpose, OperatorFamily::NeoRiemann];

    fn distinct(alphabet: &Alphabet) -> usize {
        alphabet.tokens().iter().collect::<HashSet<_>>().len()
    }

    #[test]
    fn triad_alphabet_has_seventeen_tokens() {
        let alphabet = Alphabet::build(ChordQuality::Major, 3, &NEO_ONLY);
        assert_eq!(alphabet.len(), 17);
        assert_eq!(distinct(&alphabet), 17);
    }

    #[test]
    fn seventh_alphabet_has_eleven_tokens() {
        let alphabet = Alphabet::build(ChordQuality::DominantSeventh, 3, &NEO_ONLY);
        assert_eq!(alphabet.len(), 11);
        assert_eq!(distinct(&alphabet), 11);
        assert!(alphabet.tokens().iter().all(|t| !t.is_composite()));
    }

    #[test]
    fn transpositions_exclude_zero() {
        let alphabet = Alphabet::build(ChordQuality::Minor, 2, &[OperatorFamily::Transpose]);
        assert_eq!(
            alphabet.tokens(),
            &[
                TransformToken::Origin,
                TransformToken::Identity,
                TransformToken::Transpose(1),
                TransformToken::Transpose(-1),
                TransformToken::Transpose(2),
                TransformToken::Transpose(-2),
            ]
        );
    }

    #[test]
    fn both_families_combine() {
        let alphabet = Alphabet::build(ChordQuality::Major, 4, &BOTH);
        assert_eq!(alphabet.len(), 2 + 8 + 15);
    }

    #[test]
    fn huge_bounds_are_clamped_not_wrapped() {
        let transpose = [OperatorFamily::Transpose];
        let expected = 2 + 2 * MAX_TRANSPOSITION as usize;
        for bound in [128, i32::MAX as u32 + 1, u32::MAX] {
            let alphabet = Alphabet::build(ChordQuality::Major, bound, &transpose);
            assert_eq!(alphabet.len(), expected, "{bound}");
        }
    }

    #[test]
    fn triple_arrangements_never_repeat_a_letter() {
        for name in TRIAD_TRIPLES.iter().chain(TRIAD_PAIRS.iter()) {
            let letters: HashSet<char> = name.chars().collect();
            assert_eq!(letters.len(), name.len(), "{name}");
        }
    }

    #[test]
    fn sampling_is_reproducible_and_drawn_from_alphabet() {
        let alphabet = Alphabet::build(ChordQuality::Major, 2, &BOTH);
        let a = alphabet.sample(32, &mut ChaCha8Rng::seed_from_u64(7));
        let b = alphabet.sample(32, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
        assert!(a.iter().all(|t| alphabet.tokens().contains(t)));
    }
}
