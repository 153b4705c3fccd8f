//! Integration tests that load every JSON run configuration under
//! `tests/configs` and run it end to end.

use chord_walk::{
    ConfigError, ProgressionEngine, RunConfiguration, TransformSpec, Voicing, WalkMode,
    PitchFormat,
};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const CONFIG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/configs");

/// Gather all .json files under `dir`
fn collect_configs(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .map(|e| e.path().to_path_buf())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}

lazy_static! {
    static ref VALID: Vec<PathBuf> = collect_configs(&Path::new(CONFIG_DIR).join("valid"));
    static ref INVALID: Vec<PathBuf> = collect_configs(&Path::new(CONFIG_DIR).join("invalid"));
}

fn expected_len(config: &RunConfiguration) -> usize {
    match (config.mode, &config.transforms) {
        (WalkMode::Circular, _) => config.walk_bound,
        (WalkMode::Linear, TransformSpec::Count(count)) => *count,
        (WalkMode::Linear, TransformSpec::Explicit(tokens)) => tokens.len(),
    }
}

#[test]
fn fixtures_are_present() {
    assert!(VALID.len() >= 4, "valid configs: {:?}", *VALID);
    assert!(INVALID.len() >= 5, "invalid configs: {:?}", *INVALID);
}

#[test]
fn valid_configs_run_to_their_expected_length() {
    let engine = ProgressionEngine::new();
    for path in VALID.iter() {
        let config = RunConfiguration::from_json_file(path)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        let progression = engine
            .run(&config)
            .unwrap_or_else(|e| panic!("{}: {e}", path.display()));

        assert_eq!(progression.len(), expected_len(&config), "{}", path.display());
        for step in progression.steps() {
            match (&step.voicing, config.format) {
                (Voicing::Named(names), PitchFormat::Named) => {
                    assert_eq!(names.len(), step.pitches.len())
                }
                (Voicing::Numeric(numbers), PitchFormat::Numeric) => {
                    assert_eq!(numbers, &step.pitches)
                }
                (voicing, format) => {
                    panic!("{}: {voicing:?} for {format:?}", path.display())
                }
            }
            assert!(!step.chord_name.contains(' '), "{}", path.display());
        }
    }
}

#[test]
fn invalid_configs_are_rejected_on_load() {
    for path in INVALID.iter() {
        match RunConfiguration::from_json_file(path) {
            Err(ConfigError::InvalidConfiguration { .. }) | Err(ConfigError::Parse(_)) => {}
            other => panic!("{}: expected rejection, got {other:?}", path.display()),
        }
    }
}

#[test]
fn explicit_fixture_round_trips_through_json() {
    let path = Path::new(CONFIG_DIR).join("valid/e_flat_minor_explicit.json");
    let config = RunConfiguration::from_json_file(&path).unwrap();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(RunConfiguration::from_json_str(&json).unwrap(), config);
}
