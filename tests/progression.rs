//! Integration tests for linear and circular progression walks.

use chord_walk::{
    ChordNamer, ConfigError, OperatorFamily, ParsimoniousOps, PitchFormat, ProgressionEngine,
    ProgressionError, ProgressionStep, RunConfiguration, ShiftTransposer, TokenDispatcher,
    TransformError, TransformSpec, TransformToken, Voicing, WalkMode,
};
use lazy_static::lazy_static;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

lazy_static! {
    static ref C_MAJOR: Vec<i32> = vec![60, 64, 67];
    static ref C_SEVEN: Vec<i32> = vec![60, 64, 67, 70];
    static ref QUALITIES: Vec<&'static str> =
        vec!["maj", "m", "o", "+", "sus2", "sus4", "7", "maj7", "m7", "m7b5", "o7"];
    static ref FAMILY_SETS: Vec<Vec<OperatorFamily>> = vec![
        vec![OperatorFamily::Transpose],
        vec![OperatorFamily::NeoRiemann],
        vec![OperatorFamily::Transpose, OperatorFamily::NeoRiemann],
    ];
}

fn tokens(list: &[&str]) -> Vec<TransformToken> {
    list.iter().map(|t| t.parse().unwrap()).collect()
}

fn named(step: &ProgressionStep) -> Vec<String> {
    match &step.voicing {
        Voicing::Named(names) => names.clone(),
        other => panic!("expected named voicing, got {other:?}"),
    }
}

fn silent(_: usize, _: &ProgressionStep) {}

#[test]
fn linear_origin_parallel_transpose() {
    let config = RunConfiguration::builder()
        .sequence(tokens(&["O", "P", "T2"]))
        .build()
        .unwrap();
    let progression = ProgressionEngine::new()
        .linear(&config, &mut ChaCha8Rng::seed_from_u64(0), &mut silent)
        .unwrap();

    let voicings: Vec<Vec<String>> = progression.steps().iter().map(named).collect();
    assert_eq!(
        voicings,
        vec![
            vec!["C4", "E4", "G4"],
            vec!["C4", "D#4", "G4"],
            vec!["D4", "F4", "A4"],
        ]
    );
    let names: Vec<&str> = progression.steps().iter().map(|s| s.chord_name.as_str()).collect();
    assert_eq!(names, vec!["C", "Cm", "Dm"]);
    assert_eq!(progression.origin(), C_MAJOR.as_slice());
}

#[test]
fn circular_starts_with_identity_on_the_initial_chord() {
    let config = RunConfiguration::builder()
        .sequence(tokens(&["I", "P", "T2"]))
        .mode(WalkMode::Circular)
        .walk_bound(4)
        .seed(11)
        .build()
        .unwrap();
    let progression = ProgressionEngine::new().run(&config).unwrap();

    assert_eq!(progression.len(), 4);
    assert_eq!(named(&progression.steps()[0]), vec!["C4", "E4", "G4"]);
    assert_eq!(progression.steps()[0].token, TransformToken::Identity);
}

#[test]
fn linear_dominant_seventh_transpositions() {
    let config = RunConfiguration::builder()
        .quality("7")
        .sequence(tokens(&["I", "T1", "T2", "T3"]))
        .build()
        .unwrap();
    let progression = ProgressionEngine::new().run(&config).unwrap();

    assert_eq!(progression.len(), 4);
    assert_eq!(named(&progression.steps()[0]), vec!["C4", "E4", "G4", "A#4"]);
    assert_eq!(progression.steps()[0].chord_name, "C7");
    // T1, T2, T3 accumulate: 1 + 2 + 3 semitones
    assert_eq!(progression.steps()[3].pitches, vec![66, 70, 73, 76]);
}

#[test]
fn numeric_format_reports_pitch_numbers() {
    let config = RunConfiguration::builder()
        .format(PitchFormat::Numeric)
        .sequence(tokens(&["I"]))
        .build()
        .unwrap();
    let progression = ProgressionEngine::new().run(&config).unwrap();
    assert_eq!(progression.steps()[0].voicing, Voicing::Numeric(vec![60, 64, 67]));
}

#[test]
fn origin_and_identity_hold_across_random_sequences() {
    (0..64u64).into_par_iter().for_each(|seed| {
        let config = RunConfiguration::builder().count(10).seed(seed).build().unwrap();
        let progression = ProgressionEngine::new().run(&config).unwrap();

        assert_eq!(progression.len(), 10);
        let mut previous = progression.origin().to_vec();
        for step in progression.steps() {
            match step.token {
                TransformToken::Origin => assert_eq!(step.pitches, *C_MAJOR, "seed {seed}"),
                TransformToken::Identity => assert_eq!(step.pitches, previous, "seed {seed}"),
                _ => {}
            }
            assert_eq!(step.pitches.len(), 3);
            previous = step.pitches.clone();
        }
    });
}

#[test]
fn seventh_chord_walks_stay_dominant_or_half_diminished() {
    (0..32u64).into_par_iter().for_each(|seed| {
        let config = RunConfiguration::builder()
            .quality("7")
            .families(vec![OperatorFamily::NeoRiemann])
            .count(12)
            .seed(seed)
            .build()
            .unwrap();
        let progression = ProgressionEngine::new().run(&config).unwrap();
        for step in progression.steps() {
            assert!(
                step.chord_name.contains("7"),
                "seed {seed}: {} from {}",
                step.chord_name,
                step.token
            );
            if step.token == TransformToken::Origin {
                assert_eq!(step.pitches, *C_SEVEN);
            }
        }
    });
}

#[test]
fn same_seed_same_progression() {
    let config = RunConfiguration::builder()
        .count(6)
        .mode(WalkMode::Circular)
        .walk_bound(9)
        .seed(2024)
        .build()
        .unwrap();
    let engine = ProgressionEngine::new();
    assert_eq!(engine.run(&config).unwrap(), engine.run(&config).unwrap());
}

#[test]
fn circular_length_follows_the_bound_not_the_sequence() {
    (0..48u64).into_par_iter().for_each(|seed| {
        let bound = (seed % 12) as usize;
        let count = 1 + (seed % 5) as usize;
        let config = RunConfiguration::builder()
            .count(count)
            .mode(WalkMode::Circular)
            .walk_bound(bound)
            .seed(seed)
            .build()
            .unwrap();
        let progression = ProgressionEngine::new().run(&config).unwrap();
        assert_eq!(progression.len(), bound, "seed {seed}");
    });
}

#[test]
fn circular_position_moves_one_place_per_step() {
    let sequence = tokens(&["T1", "T2", "T3", "T4", "T5"]);
    let config = RunConfiguration::builder()
        .sequence(sequence.clone())
        .mode(WalkMode::Circular)
        .walk_bound(10)
        .build()
        .unwrap();
    let progression = ProgressionEngine::new()
        .circular(&config, &mut ChaCha8Rng::seed_from_u64(5), &mut silent)
        .unwrap();

    let positions: Vec<usize> = progression
        .steps()
        .iter()
        .map(|s| sequence.iter().position(|t| *t == s.token).unwrap())
        .collect();
    assert_eq!(positions[0], 0);
    for pair in positions.windows(2) {
        let forward = (pair[0] + 1) % 5 == pair[1];
        let backward = (pair[0] + 4) % 5 == pair[1];
        assert!(forward || backward, "{pair:?}");
    }

    // state keeps accumulating whichever way the position moved
    let total: i32 = positions.iter().map(|&p| p as i32 + 1).sum();
    let last = &progression.steps().last().unwrap().pitches;
    assert_eq!(last[0], 60 + total);
}

#[test]
fn single_token_cycle_repeats_it() {
    let config = RunConfiguration::builder()
        .sequence(tokens(&["P"]))
        .mode(WalkMode::Circular)
        .walk_bound(5)
        .seed(3)
        .build()
        .unwrap();
    let progression = ProgressionEngine::new().run(&config).unwrap();
    let names: Vec<&str> = progression.steps().iter().map(|s| s.chord_name.as_str()).collect();
    assert_eq!(names, vec!["Cm", "C", "Cm", "C", "Cm"]);
}

#[test]
fn composite_tokens_chain_single_letters() {
    let config = RunConfiguration::builder()
        .sequence(tokens(&["PL", "O", "P", "L"]))
        .build()
        .unwrap();
    let progression = ProgressionEngine::new().run(&config).unwrap();
    assert_eq!(progression.steps()[0].pitches, progression.steps()[3].pitches);
}

#[test]
fn observer_sees_every_step_in_order() {
    let config = RunConfiguration::builder()
        .sequence(tokens(&["T1", "R", "O"]))
        .build()
        .unwrap();
    let mut seen = Vec::new();
    let mut record = |index: usize, step: &ProgressionStep| seen.push((index, step.token.to_string()));
    ProgressionEngine::new()
        .linear(&config, &mut ChaCha8Rng::seed_from_u64(0), &mut record)
        .unwrap();
    assert_eq!(
        seen,
        vec![(0, "T1".to_string()), (1, "R".to_string()), (2, "O".to_string())]
    );
}

#[test]
fn inapplicable_operator_aborts_the_run() {
    let config = RunConfiguration::builder()
        .quality("dim")
        .sequence(tokens(&["I", "P"]))
        .build()
        .unwrap();
    match ProgressionEngine::new().run(&config) {
        Err(ProgressionError::Transform {
            step: 1,
            source: TransformError::UndefinedForChord { op, .. },
        }) => assert_eq!(op, "P"),
        other => panic!("expected UndefinedForChord at step 1, got {other:?}"),
    }
}

#[test]
fn unknown_operator_aborts_the_run() {
    let config = RunConfiguration::builder()
        .sequence(tokens(&["T1", "Q"]))
        .build()
        .unwrap();
    assert!(matches!(
        ProgressionEngine::new().run(&config),
        Err(ProgressionError::Transform {
            step: 1,
            source: TransformError::InvalidOperator { .. }
        })
    ));
}

#[test]
fn transposing_past_the_pitch_range_fails() {
    let config = RunConfiguration::builder()
        .octave(8)
        .sequence(tokens(&["T12", "T12"]))
        .build()
        .unwrap();
    assert!(matches!(
        ProgressionEngine::new().run(&config),
        Err(ProgressionError::Pitch(_))
    ));
}

#[test]
fn invalid_configuration_fails_before_traversal() {
    let mut config = RunConfiguration::default();
    config.quality = "maj13".to_string();
    let mut calls = 0;
    let mut count = |_: usize, _: &ProgressionStep| calls += 1;
    let result =
        ProgressionEngine::new().linear(&config, &mut ChaCha8Rng::seed_from_u64(0), &mut count);
    assert!(matches!(result, Err(ProgressionError::Config(_))));
    assert_eq!(calls, 0);
}

#[test]
fn result_serializes_for_downstream_writers() {
    let config = RunConfiguration::builder()
        .sequence(tokens(&["T-1"]))
        .build()
        .unwrap();
    let progression = ProgressionEngine::new().run(&config).unwrap();
    let json = serde_json::to_value(&progression).unwrap();
    assert_eq!(json["steps"][0]["token"], "T-1");
    assert_eq!(json["steps"][0]["voicing"][0], "B3");
    assert_eq!(json["steps"][0]["chord_name"], "B");
    assert_eq!(progression.chords().next().unwrap(), &[59, 63, 66]);
}

struct SpacedNamer;

impl ChordNamer for SpacedNamer {
    fn name(&self, pitch_classes: &[String]) -> String {
        format!("{} o/1", pitch_classes[0])
    }
}

#[test]
fn custom_namer_output_is_normalized() {
    let engine = ProgressionEngine::builder().namer(SpacedNamer).build();
    let config = RunConfiguration::builder()
        .sequence(tokens(&["I", "T1"]))
        .build()
        .unwrap();
    let progression = engine.run(&config).unwrap();
    let names: Vec<&str> = progression.steps().iter().map(|s| s.chord_name.as_str()).collect();
    assert_eq!(names, vec!["Cdim1", "C#dim1"]);
}

#[test]
fn every_accepted_sampled_configuration_runs() {
    let cases: Vec<(&str, Vec<OperatorFamily>, WalkMode, u64)> = QUALITIES
        .iter()
        .flat_map(|&quality| {
            FAMILY_SETS.iter().flat_map(move |families| {
                [WalkMode::Linear, WalkMode::Circular]
                    .into_iter()
                    .flat_map(move |mode| {
                        (0..16u64).map(move |seed| (quality, families.clone(), mode, seed))
                    })
            })
        })
        .collect();

    cases.into_par_iter().for_each(|(quality, families, mode, seed)| {
        let built = RunConfiguration::builder()
            .quality(quality)
            .families(families.clone())
            .count(8)
            .mode(mode)
            .walk_bound(8)
            .seed(seed)
            .build();
        let config = match built {
            Ok(config) => config,
            Err(ConfigError::InvalidConfiguration { field: "families", .. }) => {
                assert!(families.contains(&OperatorFamily::NeoRiemann), "{quality} {families:?}");
                return;
            }
            Err(e) => panic!("{quality} {families:?}: {e}"),
        };
        let progression = ProgressionEngine::new()
            .run(&config)
            .unwrap_or_else(|e| panic!("{quality} {families:?} {mode:?} seed {seed}: {e}"));
        assert_eq!(progression.len(), 8);
        for step in progression.steps() {
            assert_eq!(step.pitches.len(), progression.origin().len());
        }
    });
}

#[test]
fn extreme_transpositions_never_panic() {
    assert!(matches!(
        RunConfiguration::builder()
            .sequence(vec![TransformToken::Transpose(i32::MAX)])
            .build(),
        Err(ConfigError::InvalidConfiguration { field: "transforms", .. })
    ));

    let mut config = RunConfiguration::default();
    config.transforms = TransformSpec::Explicit(vec![TransformToken::Transpose(i32::MIN)]);
    assert!(matches!(
        ProgressionEngine::new().linear(&config, &mut ChaCha8Rng::seed_from_u64(0), &mut silent),
        Err(ProgressionError::Config(_))
    ));

    let dispatcher = TokenDispatcher::new(&ShiftTransposer, &ParsimoniousOps);
    let shifted = dispatcher
        .apply(&TransformToken::Transpose(i32::MAX), &C_MAJOR, &C_MAJOR)
        .unwrap();
    assert_eq!(shifted, vec![i32::MAX; 3]);

    let widest = RunConfiguration::builder()
        .sequence(tokens(&["T127"]))
        .build()
        .unwrap();
    assert!(matches!(
        ProgressionEngine::new().run(&widest),
        Err(ProgressionError::Pitch(_))
    ));
}
