//! Immutable library of historical situations.
//!
//! Situations are kept in an ordered `Vec` (insertion order of the seed
//! data) with a side index for id lookups. Every scan that must be
//! reproducible, tie-breaking in the ranker included, walks the `Vec`.

use std::collections::HashMap;

use crate::domain::{ActionId, HistoricalSituation, SituationId};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default)]
pub struct SituationLibrary {
    situations: Vec<HistoricalSituation>,
    index: HashMap<SituationId, usize>,
}

impl SituationLibrary {
    /// Builds a library, rejecting duplicate ids and NaN/infinite
    /// components.
    pub fn new(situations: Vec<HistoricalSituation>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(situations.len());
        for (i, s) in situations.iter().enumerate() {
            if let Some((at, &value)) = s
                .vector
                .as_slice()
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite())
            {
                return Err(CoreError::NonFiniteComponent {
                    id: s.id.clone(),
                    index: at,
                    value,
                });
            }
            if index.insert(s.id.clone(), i).is_some() {
                return Err(CoreError::DuplicateSituation(s.id.clone()));
            }
        }
        Ok(Self { situations, index })
    }

    /// All situations in insertion order.
    pub fn all_situations(&self) -> &[HistoricalSituation] {
        &self.situations
    }

    pub fn get(&self, id: &SituationId) -> Option<&HistoricalSituation> {
        self.index.get(id).map(|&i| &self.situations[i])
    }

    /// Insertion position of a situation.
    pub fn position(&self, id: &SituationId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The action bound to a situation.
    pub fn outcome_of(&self, id: &SituationId) -> CoreResult<&ActionId> {
        self.get(id)
            .map(|s| &s.outcome)
            .ok_or_else(|| CoreError::UnknownSituation(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.situations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.situations.is_empty()
    }

    /// Length of the first vector, if any. Not enforced across entries.
    pub fn dimension(&self) -> Option<usize> {
        self.situations.first().map(|s| s.vector.len())
    }

    /// BLAKE3 digest over the ordered records (hex).
    ///
    /// Reordering the library changes the fingerprint, since order decides
    /// ties.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        self.hash_into(&mut hasher);
        hasher.finalize().to_hex().to_string()
    }

    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        for s in &self.situations {
            hash_situation(hasher, s);
        }
    }
}

fn hash_situation(hasher: &mut blake3::Hasher, s: &HistoricalSituation) {
    hash_str(hasher, s.id.as_str());
    hasher.update(&(s.vector.len() as u64).to_le_bytes());
    for v in s.vector.as_slice() {
        hasher.update(&v.to_le_bytes());
    }
    hash_str(hasher, &s.description);
    hash_str(hasher, &s.context);
    hash_str(hasher, &s.date.to_string());
    hash_str(hasher, s.outcome.as_str());
}

pub(crate) fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

impl TryFrom<Vec<HistoricalSituation>> for SituationLibrary {
    type Error = CoreError;

    fn try_from(situations: Vec<HistoricalSituation>) -> CoreResult<Self> {
        Self::new(situations)
    }
}
