//! End-to-end runner flows: config file → advice → artifacts, and batch
//! CSV in → CSV out.

use std::fs;

use crudelab_core::{BlendedAction, ReferenceData};
use crudelab_runner::export::RUN_DIR_PREFIX_LEN;
use crudelab_runner::{
    load_artifacts, load_queries_csv, run_advice, run_batch, save_artifacts, write_batch_csv,
    AdviceConfig, BatchRow, ConfigError, RunError,
};

const NERVOUS_CONFIG: &str = r#"
[query]
vector = [0.35, 0.75, 0.25, 0.45, 0.85, 0.70]
description = "Nervous market with negative news"
"#;

/// Two orthogonal situations, three actions.
const SMALL_SEED: &str = r#"
[[situations]]
id = "A"
vector = [1.0, 0.0]
description = "first"
date = "2023-01-01"
outcome = "BUY"

[[situations]]
id = "B"
vector = [0.0, 1.0]
description = "second"
date = "2023-02-01"
outcome = "SELL"

[[actions]]
id = "BUY"
label = "Buy"
level = "AGGRESSIVE"
rationale = "up"
risk = "HIGH"
horizon = "1-3 months"

[[actions]]
id = "SELL"
label = "Sell"
level = "DEFENSIVE"
rationale = "down"
risk = "MEDIUM"
horizon = "1-2 months"

[[actions]]
id = "HOLD"
label = "Hold"
level = "NEUTRAL"
rationale = "flat"
risk = "LOW"
horizon = "2-4 weeks"
"#;

#[test]
fn config_file_run_and_artifacts() {
    // GIVEN a config file on disk with no reference path
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("advice.toml");
    fs::write(&config_path, NERVOUS_CONFIG).unwrap();

    // WHEN it is loaded and run
    let config = AdviceConfig::from_file(&config_path).unwrap();
    let result = run_advice(&config).unwrap();

    // THEN the built-in tables recommend a strong sell via USUARIO_01
    assert_eq!(result.recommendation.matched.id.as_str(), "USUARIO_01_MercadoConMiedo");
    assert_eq!(result.recommendation.action.id.as_str(), "VENDER_FUERTE");
    assert_eq!(result.description, "Nervous market with negative news");
    assert_eq!(
        result.reference_fingerprint,
        ReferenceData::builtin().fingerprint()
    );

    // AND saving artifacts yields a run-id named directory that loads back
    let out = dir.path().join("out");
    let run_dir = save_artifacts(&result, &out).unwrap();
    assert_eq!(
        run_dir.file_name().unwrap().to_string_lossy(),
        result.run_id[..RUN_DIR_PREFIX_LEN]
    );
    let loaded = load_artifacts(&run_dir).unwrap();
    assert_eq!(loaded.run_id, result.run_id);
    let ranking_csv = fs::read_to_string(run_dir.join("ranking.csv")).unwrap();
    assert_eq!(ranking_csv.lines().count(), 8);
}

#[test]
fn identical_configs_share_a_run_id() {
    // GIVEN the same config run twice
    let config = AdviceConfig::from_toml(NERVOUS_CONFIG).unwrap();

    // WHEN both runs complete
    let a = run_advice(&config).unwrap();
    let b = run_advice(&config).unwrap();

    // THEN their identity and ranking match
    assert_eq!(a.run_id, b.run_id);
    assert_eq!(a.recommendation.ranking, b.recommendation.ranking);
}

#[test]
fn relative_reference_path_resolves_next_to_config() {
    // GIVEN a seed file and a config referring to it relatively
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("seed.toml"), SMALL_SEED).unwrap();
    let config_path = dir.path().join("advice.toml");
    fs::write(
        &config_path,
        "[query]\nvector = [0.1, 0.9]\n[reference]\npath = \"seed.toml\"\n",
    )
    .unwrap();

    // WHEN the config is run
    let config = AdviceConfig::from_file(&config_path).unwrap();
    let result = run_advice(&config).unwrap();

    // THEN the custom tables are used
    assert_eq!(result.recommendation.matched.id.as_str(), "B");
    assert_eq!(result.recommendation.action.id.as_str(), "SELL");
    assert_eq!(result.breakdown[0].name, "dim_0");
}

#[test]
fn missing_reference_file_is_a_seed_error() {
    // GIVEN a config pointing at a file that does not exist
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("advice.toml");
    fs::write(
        &config_path,
        "[query]\nvector = [1.0, 0.0]\n[reference]\npath = \"nope.toml\"\n",
    )
    .unwrap();
    let config = AdviceConfig::from_file(&config_path).unwrap();

    // WHEN / THEN running fails before any recommendation
    assert!(matches!(run_advice(&config), Err(RunError::Seed(_))));
}

#[test]
fn raw_signals_blend_alongside_recommendation() {
    // GIVEN a config with raw signals: +5% forecast, uptrend, compound 0.7
    let toml = format!(
        "{NERVOUS_CONFIG}\n[signals]\nforecast_pct_change = 5.0\nsentiment_compound = 0.7\ntrend = \"uptrend\"\n"
    );
    let config = AdviceConfig::from_toml(&toml).unwrap();

    // WHEN run
    let result = run_advice(&config).unwrap();

    // THEN the blend is 0.4*0.75 + 0.3*0.7 + 0.3*0.85 = 0.765, a strong buy,
    // independent of the similarity recommendation
    let blend = result.blend.unwrap();
    assert!((blend.score - 0.765).abs() < 1e-9);
    assert_eq!(blend.action, BlendedAction::StrongBuy);
    assert_eq!(result.recommendation.action.id.as_str(), "VENDER_FUERTE");
}

#[test]
fn reject_policy_surfaces_out_of_range_signal() {
    // GIVEN pre-normalized signals with prediction above 1 and reject policy
    let toml = format!(
        "{NERVOUS_CONFIG}\n[signals]\nprediction = 1.4\ntechnical = 0.5\nsentiment = 0.5\n[blend]\ninput_policy = \"reject\"\n"
    );
    let config = AdviceConfig::from_toml(&toml).unwrap();

    // WHEN / THEN the run fails with the core range error
    assert!(matches!(run_advice(&config), Err(RunError::Core(_))));
}

#[test]
fn mixed_signal_forms_fail_validation() {
    let toml = format!(
        "{NERVOUS_CONFIG}\n[signals]\nprediction = 0.5\ntechnical = 0.5\nsentiment = 0.5\ntrend = \"sideways\"\n"
    );
    assert!(matches!(
        AdviceConfig::from_toml(&toml),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn batch_csv_round_trip() {
    // GIVEN a query file with three rows, one of the wrong length
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("queries.csv");
    fs::write(
        &input,
        "id,v1,v2,v3,v4,v5,v6\n\
         q1,0.35,0.75,0.25,0.45,0.85,0.70\n\
         q2,0.76,0.31,0.84,0.81,0.34,0.21\n",
    )
    .unwrap();
    let mut queries = load_queries_csv(&input).unwrap();
    queries.push(crudelab_runner::QueryRow {
        id: "q3".into(),
        vector: vec![1.0, 2.0].into(),
    });

    // WHEN the batch runs and is written out
    let rows = run_batch(&queries, &ReferenceData::builtin());
    let output = dir.path().join("results.csv");
    write_batch_csv(&rows, &output).unwrap();

    // THEN the output has one row per query, in input order
    let mut rdr = csv::Reader::from_path(&output).unwrap();
    let back: Vec<BatchRow> = rdr.deserialize().collect::<Result<_, _>>().unwrap();
    let ids: Vec<_> = back.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["q1", "q2", "q3"]);
    assert_eq!(back[0].action.as_deref(), Some("VENDER_FUERTE"));
    assert!(back[2].error.as_deref().unwrap().contains("dimension"));
}

#[test]
fn missing_query_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_queries_csv(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, RunError::Io { .. }));
}
