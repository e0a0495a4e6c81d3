//! Immutable catalog of recommendable actions.

use std::collections::HashMap;

use crate::domain::{ActionDescriptor, ActionId};
use crate::error::{CoreError, CoreResult};
use crate::library::hash_str;

#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: Vec<ActionDescriptor>,
    index: HashMap<ActionId, usize>,
}

impl ActionCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn new(actions: Vec<ActionDescriptor>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(actions.len());
        for (i, a) in actions.iter().enumerate() {
            if index.insert(a.id.clone(), i).is_some() {
                return Err(CoreError::DuplicateAction(a.id.clone()));
            }
        }
        Ok(Self { actions, index })
    }

    pub fn lookup(&self, id: &ActionId) -> CoreResult<&ActionDescriptor> {
        self.index
            .get(id)
            .map(|&i| &self.actions[i])
            .ok_or_else(|| CoreError::UnknownAction(id.clone()))
    }

    pub fn contains(&self, id: &ActionId) -> bool {
        self.index.contains_key(id)
    }

    /// All actions in insertion order.
    pub fn all_actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub(crate) fn hash_into(&self, hasher: &mut blake3::Hasher) {
        for a in &self.actions {
            hash_str(hasher, a.id.as_str());
            hash_str(hasher, &a.label);
            hash_str(hasher, &a.level.to_string());
            hash_str(hasher, &a.rationale);
            hash_str(hasher, &a.risk.to_string());
            hash_str(hasher, &a.horizon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Aggressiveness, RiskLevel};

    fn hold() -> ActionDescriptor {
        ActionDescriptor::new(
            "MANTENER",
            "HOLD POSITION",
            Aggressiveness::Neutral,
            "Wait for clearer signals",
            RiskLevel::Low,
            "2-4 weeks",
        )
    }

    #[test]
    fn lookup_hits_and_misses() {
        let catalog = ActionCatalog::new(vec![hold()]).unwrap();
        assert_eq!(
            catalog.lookup(&ActionId::new("MANTENER")).unwrap().label,
            "HOLD POSITION"
        );
        assert_eq!(
            catalog.lookup(&ActionId::new("NOPE")).unwrap_err(),
            CoreError::UnknownAction(ActionId::new("NOPE"))
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ActionCatalog::new(vec![hold(), hold()]).unwrap_err();
        assert_eq!(err, CoreError::DuplicateAction(ActionId::new("MANTENER")));
    }
}
