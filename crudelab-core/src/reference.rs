//! Reference data: the situation library and action catalog, validated
//! against each other and passed into the engine at call time.
//!
//! Seed tables can come from the built-in set or from a TOML file:
//!
//! ```toml
//! [[situations]]
//! id = "USUARIO_01_MercadoConMiedo"
//! vector = [0.30, 0.85, 0.15, 0.40, 0.95, 0.80]
//! description = "Fearful market on geopolitical crisis"
//! context = "Middle East conflict, high inventories, weak demand"
//! date = "2023-10-15"
//! outcome = "VENDER_FUERTE"
//!
//! [[actions]]
//! id = "VENDER_FUERTE"
//! label = "SELL CRUDE"
//! level = "AGGRESSIVE"
//! rationale = "Close positions quickly, protect capital"
//! risk = "HIGH"
//! horizon = "2-3 weeks"
//! ```

use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::ActionCatalog;
use crate::domain::{ActionDescriptor, FeatureVector, HistoricalSituation};
use crate::engine::{recommend, Recommendation};
use crate::error::{CoreError, CoreResult};
use crate::library::SituationLibrary;
use crate::seed;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse seed TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize seed TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("inconsistent seed data: {0}")]
    Integrity(#[from] CoreError),
}

/// On-disk shape of the seed tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedTables {
    pub situations: Vec<HistoricalSituation>,
    pub actions: Vec<ActionDescriptor>,
}

/// Library + catalog with every outcome binding resolved.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    library: SituationLibrary,
    catalog: ActionCatalog,
}

impl ReferenceData {
    /// Pairs a library with a catalog.
    ///
    /// Fails with `UnknownAction` if any situation's outcome is missing from
    /// the catalog.
    pub fn new(library: SituationLibrary, catalog: ActionCatalog) -> CoreResult<Self> {
        for s in library.all_situations() {
            if !catalog.contains(&s.outcome) {
                return Err(CoreError::UnknownAction(s.outcome.clone()));
            }
        }
        debug!(
            situations = library.len(),
            actions = catalog.len(),
            "reference data validated"
        );
        Ok(Self { library, catalog })
    }

    pub fn from_tables(tables: SeedTables) -> CoreResult<Self> {
        let library = SituationLibrary::new(tables.situations)?;
        let catalog = ActionCatalog::new(tables.actions)?;
        Self::new(library, catalog)
    }

    /// The seven-situation, six-action built-in set.
    pub fn builtin() -> Self {
        Self::from_tables(SeedTables {
            situations: seed::builtin_situations(),
            actions: seed::builtin_actions(),
        })
        .unwrap_or_else(|e| unreachable!("built-in seed tables are consistent: {e}"))
    }

    pub fn from_toml(content: &str) -> Result<Self, SeedError> {
        let tables: SeedTables = toml::from_str(content)?;
        Ok(Self::from_tables(tables)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let data = Self::from_toml(&content)?;
        info!(
            path = %path.display(),
            situations = data.library.len(),
            "loaded reference data"
        );
        Ok(data)
    }

    pub fn to_tables(&self) -> SeedTables {
        SeedTables {
            situations: self.library.all_situations().to_vec(),
            actions: self.catalog.all_actions().to_vec(),
        }
    }

    pub fn to_toml(&self) -> Result<String, SeedError> {
        Ok(toml::to_string_pretty(&self.to_tables())?)
    }

    pub fn library(&self) -> &SituationLibrary {
        &self.library
    }

    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// BLAKE3 digest over both tables, in order (hex).
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        self.library.hash_into(&mut hasher);
        self.catalog.hash_into(&mut hasher);
        hasher.finalize().to_hex().to_string()
    }

    pub fn recommend(&self, query: &FeatureVector) -> CoreResult<Recommendation> {
        recommend(query, &self.library, &self.catalog)
    }
}

/// Reference data shared across threads, refreshed by whole-table swap.
///
/// Readers take an `Arc` snapshot and keep using it for the rest of their
/// call; a concurrent `replace` never mutates a snapshot in place.
#[derive(Debug)]
pub struct SharedReference {
    current: RwLock<Arc<ReferenceData>>,
}

impl SharedReference {
    pub fn new(data: ReferenceData) -> Self {
        Self {
            current: RwLock::new(Arc::new(data)),
        }
    }

    pub fn snapshot(&self) -> Arc<ReferenceData> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Installs `data` and returns the previous table.
    pub fn replace(&self, data: ReferenceData) -> Arc<ReferenceData> {
        let fingerprint = data.fingerprint();
        let next = Arc::new(data);
        let previous = {
            let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *guard, next)
        };
        info!(%fingerprint, "reference data replaced");
        previous
    }
}
