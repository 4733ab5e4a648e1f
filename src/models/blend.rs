//! Blend recipes and logged blend entries
//!
//! A recipe is the list of `(slot, amount)` pairs a dispenser pours. It is
//! stored in submission order but compared as a set, so `[(2,20),(1,10)]`
//! and `[(1,10),(2,20),(1,10)]` describe the same blend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashSet};

use crate::errors::{AppError, AppResult};

/// Dispensing position on the machine
pub type Slot = i64;
/// Amount poured from a slot
pub type Amount = i64;
/// Surrogate id of a logged blend
pub type BlendEntryId = i32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe(Vec<(Slot, Amount)>);

impl Recipe {
    pub fn new(pairs: Vec<(Slot, Amount)>) -> Self {
        Self(pairs)
    }

    /// Build a recipe from request parameters such as `slot3=40`.
    ///
    /// Every parameter must be `<prefix><integer>` with an integer value; a
    /// single malformed parameter rejects the whole blend. When the same
    /// parameter name repeats, the first value is kept.
    pub fn from_slot_params<I, K, V>(prefix: &str, params: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();

        for (name, value) in params {
            let name = name.as_ref();
            if !seen.insert(name.to_string()) {
                continue;
            }

            let slot = name
                .strip_prefix(prefix)
                .ok_or_else(|| {
                    AppError::validation(format!(
                        "Parameter '{name}' must be named '{prefix}<slot>'"
                    ))
                })?
                .trim()
                .parse::<Slot>()
                .map_err(|_| {
                    AppError::validation(format!("Parameter '{name}' has a non-integer slot"))
                })?;

            let raw_amount = value.as_ref();
            let amount = raw_amount.trim().parse::<Amount>().map_err(|_| {
                AppError::validation(format!(
                    "Parameter '{name}' has a non-integer amount '{raw_amount}'"
                ))
            })?;

            pairs.push((slot, amount));
        }

        Ok(Self(pairs))
    }

    pub fn pairs(&self) -> &[(Slot, Amount)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical form used for equality: sorted, duplicates removed
    pub fn pair_set(&self) -> BTreeSet<(Slot, Amount)> {
        self.0.iter().copied().collect()
    }

    pub fn same_blend(&self, other: &Recipe) -> bool {
        self.pair_set() == other.pair_set()
    }

    /// Serialize to the stored payload, e.g. `[[1,10],[2,20]]`
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    pub fn decode(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Hex SHA-256 of the canonical pair set; equal for equivalent blends
    pub fn recipe_key(&self) -> String {
        let canonical: Vec<(Slot, Amount)> = self.pair_set().into_iter().collect();
        let mut hasher = Sha256::new();
        for (slot, amount) in canonical {
            hasher.update(slot.to_be_bytes());
            hasher.update(amount.to_be_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

impl From<Vec<(Slot, Amount)>> for Recipe {
    fn from(pairs: Vec<(Slot, Amount)>) -> Self {
        Self(pairs)
    }
}

/// One logged blend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlendEntry {
    pub id: BlendEntryId,
    /// Recipe payload as stored
    pub recipe: String,
    pub recipe_key: String,
    pub created_at: DateTime<Utc>,
}

impl BlendEntry {
    pub fn decode_recipe(&self) -> Result<Recipe, serde_json::Error> {
        Recipe::decode(&self.recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_set_equality_ignores_order_and_duplicates() {
        let a = Recipe::new(vec![(1, 10), (2, 20)]);
        let b = Recipe::new(vec![(2, 20), (1, 10), (1, 10)]);
        assert!(a.same_blend(&b));
        assert_eq!(a.recipe_key(), b.recipe_key());
    }

    #[test]
    fn test_different_amount_is_different_blend() {
        let a = Recipe::new(vec![(1, 10)]);
        let b = Recipe::new(vec![(1, 20)]);
        assert!(!a.same_blend(&b));
        assert_ne!(a.recipe_key(), b.recipe_key());
    }

    #[test]
    fn test_payload_keeps_submission_order() {
        let recipe = Recipe::new(vec![(3, 40), (1, 15)]);
        let payload = recipe.encode().unwrap();
        assert_eq!(payload, "[[3,40],[1,15]]");
        assert_eq!(Recipe::decode(&payload).unwrap(), recipe);
    }

    #[test]
    fn test_decode_accepts_spaced_payloads() {
        let recipe = Recipe::decode("[[1, 10], [2, 20]]").unwrap();
        assert_eq!(recipe.pairs(), &[(1, 10), (2, 20)]);
        assert!(Recipe::decode("[[1, \"ten\"]]").is_err());
    }

    #[test]
    fn test_empty_recipe_has_stable_key() {
        let empty = Recipe::default();
        assert!(empty.is_empty());
        assert_eq!(empty.encode().unwrap(), "[]");
        assert_eq!(empty.recipe_key(), Recipe::new(vec![]).recipe_key());
        assert_eq!(empty.recipe_key().len(), 64);
    }

    #[test]
    fn test_slot_params_parse() {
        let recipe =
            Recipe::from_slot_params("slot", [("slot1", "10"), ("slot12", " 35 ")]).unwrap();
        assert_eq!(recipe.pairs(), &[(1, 10), (12, 35)]);
    }

    #[test]
    fn test_repeated_parameter_keeps_first_value() {
        let recipe =
            Recipe::from_slot_params("slot", [("slot1", "10"), ("slot1", "99")]).unwrap();
        assert_eq!(recipe.pairs(), &[(1, 10)]);
    }

    #[test]
    fn test_no_params_is_empty_blend() {
        let params: Vec<(String, String)> = Vec::new();
        let recipe = Recipe::from_slot_params("slot", params).unwrap();
        assert!(recipe.is_empty());
    }

    #[rstest]
    #[case::non_integer_amount("slot1", "ten")]
    #[case::float_amount("slot1", "1.5")]
    #[case::empty_amount("slot1", "")]
    #[case::non_integer_slot("slotA", "10")]
    #[case::missing_slot("slot", "10")]
    #[case::wrong_prefix("bottle1", "10")]
    fn test_malformed_params_are_rejected(#[case] name: &str, #[case] value: &str) {
        let result = Recipe::from_slot_params("slot", [("slot2", "5"), (name, value)]);
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
