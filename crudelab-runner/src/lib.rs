//! CrudeLab Runner — advice orchestration on top of `crudelab-core`.
//!
//! This crate provides:
//! - TOML advice configuration (query, reference tables, blend inputs)
//! - Single advice run with run id, reference fingerprint and threshold flag
//! - Parallel batch recommendation over CSV query files
//! - Artifact export (JSON + CSV)

pub mod batch;
pub mod config;
pub mod export;
pub mod runner;

pub use batch::{load_queries_csv, read_queries, run_batch, write_batch_csv, BatchRow, QueryRow};
pub use config::{AdviceConfig, BlendConfig, ConfigError, QueryConfig, ReferenceConfig, SignalsConfig};
pub use export::{load_artifacts, save_artifacts};
pub use runner::{load_reference, run_advice, run_advice_with, run_id, AdviceResult, RunError};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn advice_result_is_send_sync() {
        assert_send::<AdviceResult>();
        assert_sync::<AdviceResult>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<AdviceConfig>();
        assert_sync::<AdviceConfig>();
        assert_send::<SignalsConfig>();
        assert_sync::<SignalsConfig>();
    }

    #[test]
    fn batch_types_are_send_sync() {
        assert_send::<QueryRow>();
        assert_sync::<QueryRow>();
        assert_send::<BatchRow>();
        assert_sync::<BatchRow>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
    }
}
