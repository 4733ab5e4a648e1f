//! Blend deduplication service
//!
//! Turns a submitted blend into the id of a logged blend: an equivalent
//! logged blend is reused, otherwise a new entry is appended.
//!
//! The scan and the append are not isolated from each other. Two concurrent
//! submissions of the same blend can both miss during the scan; the unique
//! `recipe_key` index lets only one append commit and the other resolves to
//! the stored entry.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::database::repositories::BlendLogStore;
use crate::errors::{AppError, AppResult, RepositoryError};
use crate::models::{BlendEntry, BlendEntryId, Recipe};

#[derive(Clone)]
pub struct BlendDedupService {
    store: Arc<dyn BlendLogStore>,
    slot_prefix: String,
}

impl BlendDedupService {
    pub fn new(store: Arc<dyn BlendLogStore>, slot_prefix: impl Into<String>) -> Self {
        Self {
            store,
            slot_prefix: slot_prefix.into(),
        }
    }

    /// Parse `<prefix><slot>=<amount>` request parameters into a candidate
    pub fn parse_candidate<I, K, V>(&self, params: I) -> AppResult<Recipe>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Recipe::from_slot_params(&self.slot_prefix, params)
    }

    /// Return the id of the logged blend equal (as a set) to `candidate`,
    /// appending it first when no such blend exists.
    pub async fn submit_or_find(&self, candidate: &Recipe) -> AppResult<BlendEntryId> {
        if let Some(id) = self.find_existing(candidate).await? {
            debug!(id, pairs = candidate.pairs().len(), "Blend already logged");
            return Ok(id);
        }

        match self.store.append(candidate).await {
            Ok(entry) => {
                info!(id = entry.id, recipe = %entry.recipe, "Logged new blend");
                Ok(entry.id)
            }
            Err(err) if err.is_unique_violation() => {
                let recipe_key = candidate.recipe_key();
                warn!(
                    recipe_key = %recipe_key,
                    "Blend already stored by a concurrent submission"
                );
                let entry = self
                    .store
                    .find_by_recipe_key(&recipe_key)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal(format!(
                            "Blend with key {recipe_key} rejected as duplicate but not found"
                        ))
                    })?;
                Ok(entry.id)
            }
            Err(err) => {
                error!("Failed to log blend: {}", err);
                Err(err.into())
            }
        }
    }

    /// Every logged blend, payloads as stored
    pub async fn log(&self) -> AppResult<Vec<BlendEntry>> {
        Ok(self.store.list_all().await?)
    }

    /// Linear scan; first match in store order wins
    async fn find_existing(&self, candidate: &Recipe) -> AppResult<Option<BlendEntryId>> {
        let wanted = candidate.pair_set();

        for entry in self.store.list_all().await? {
            let recipe = entry.decode_recipe().map_err(|e| {
                error!(id = entry.id, "Stored blend has an unreadable recipe: {}", e);
                RepositoryError::from(e)
            })?;
            if recipe.pair_set() == wanted {
                return Ok(Some(entry.id));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::BlendLogSeaOrmRepository;
    use crate::database::repositories::traits::MockBlendLogStore;
    use crate::database::test_support::memory_database;
    use std::collections::HashSet;
    use tracing_test::traced_test;

    async fn service() -> (BlendDedupService, Arc<BlendLogSeaOrmRepository>) {
        let database = memory_database().await;
        let repo = Arc::new(BlendLogSeaOrmRepository::new(database.connection()));
        (BlendDedupService::new(repo.clone(), "slot"), repo)
    }

    fn entry(id: BlendEntryId, recipe: &Recipe) -> BlendEntry {
        BlendEntry {
            id,
            recipe: recipe.encode().unwrap(),
            recipe_key: recipe.recipe_key(),
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_resubmission_returns_same_id() {
        let (service, repo) = service().await;
        let recipe = Recipe::new(vec![(1, 10), (3, 25)]);

        let first = service.submit_or_find(&recipe).await.unwrap();
        let second = service.submit_or_find(&recipe).await.unwrap();

        assert_eq!(first, second);
        let matching = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.decode_recipe().unwrap().same_blend(&recipe))
            .count();
        assert_eq!(matching, 1);
    }

    #[tokio::test]
    async fn test_submission_order_is_ignored() {
        let (service, _repo) = service().await;

        let a = service
            .submit_or_find(&Recipe::new(vec![(1, 10), (2, 20)]))
            .await
            .unwrap();
        let b = service
            .submit_or_find(&Recipe::new(vec![(2, 20), (1, 10)]))
            .await
            .unwrap();

        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_amount_gets_new_id() {
        let (service, _repo) = service().await;

        let a = service
            .submit_or_find(&Recipe::new(vec![(1, 10)]))
            .await
            .unwrap();
        let b = service
            .submit_or_find(&Recipe::new(vec![(1, 20)]))
            .await
            .unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_empty_blend_is_deduplicated() {
        let (service, repo) = service().await;
        let params: Vec<(String, String)> = Vec::new();
        let empty = service.parse_candidate(params).unwrap();

        let a = service.submit_or_find(&empty).await.unwrap();
        let b = service.submit_or_find(&Recipe::default()).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_log_lists_each_distinct_blend_once() {
        let (service, _repo) = service().await;
        let submissions = [
            vec![(1, 10)],
            vec![(1, 10), (2, 5)],
            vec![(2, 5), (1, 10)],
            vec![(1, 10)],
            vec![],
            vec![(4, 60)],
        ];

        for pairs in submissions {
            service.submit_or_find(&Recipe::new(pairs)).await.unwrap();
        }

        let log = service.log().await.unwrap();
        assert_eq!(log.len(), 4);
        let ids: HashSet<_> = log.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_amount_leaves_store_untouched() {
        let (service, repo) = service().await;
        service
            .submit_or_find(&Recipe::new(vec![(1, 10)]))
            .await
            .unwrap();

        let result = service.parse_candidate([("slot1", "10"), ("slot2", "lots")]);

        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_share_one_entry() {
        let (service, repo) = service().await;
        let service = Arc::new(service);

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                // Alternate the submission order of the same set
                let pairs = if i % 2 == 0 {
                    vec![(1, 10), (2, 20)]
                } else {
                    vec![(2, 20), (1, 10)]
                };
                tokio::spawn(async move { service.submit_or_find(&Recipe::new(pairs)).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap());
        }

        assert_eq!(ids.len(), 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_lost_append_race_resolves_to_stored_entry() {
        let recipe = Recipe::new(vec![(5, 15)]);
        let winner = entry(7, &recipe);
        let expected_key = recipe.recipe_key();

        let mut store = MockBlendLogStore::new();
        store.expect_list_all().times(1).returning(|| Ok(Vec::new()));
        store.expect_append().times(1).returning(|_| {
            Err(RepositoryError::ConstraintViolation {
                constraint: "idx_blend_log_recipe_key".to_string(),
                message: "UNIQUE constraint failed: blend_log.recipe_key".to_string(),
            })
        });
        store
            .expect_find_by_recipe_key()
            .withf(move |key| key.to_string() == expected_key)
            .times(1)
            .returning(move |_| Ok(Some(winner.clone())));

        let service = BlendDedupService::new(Arc::new(store), "slot");
        assert_eq!(service.submit_or_find(&recipe).await.unwrap(), 7);
        assert!(logs_contain("concurrent submission"));
    }

    #[tokio::test]
    async fn test_append_failure_is_a_storage_error() {
        let mut store = MockBlendLogStore::new();
        store.expect_list_all().returning(|| Ok(Vec::new()));
        store.expect_append().returning(|_| {
            Err(RepositoryError::Database(sea_orm::DbErr::Custom(
                "disk I/O error".to_string(),
            )))
        });
        store.expect_find_by_recipe_key().never();

        let service = BlendDedupService::new(Arc::new(store), "slot");
        let result = service.submit_or_find(&Recipe::new(vec![(1, 1)])).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_scan_failure_never_appends() {
        let mut store = MockBlendLogStore::new();
        store.expect_list_all().returning(|| {
            Err(RepositoryError::Database(sea_orm::DbErr::Custom(
                "database is locked".to_string(),
            )))
        });
        store.expect_append().never();

        let service = BlendDedupService::new(Arc::new(store), "slot");
        let result = service.submit_or_find(&Recipe::new(vec![(1, 1)])).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_first_match_in_store_order_wins() {
        let recipe = Recipe::new(vec![(1, 10)]);
        let other = Recipe::new(vec![(9, 90)]);
        let stored = vec![entry(1, &other), entry(2, &recipe), entry(3, &recipe)];

        let mut store = MockBlendLogStore::new();
        store
            .expect_list_all()
            .returning(move || Ok(stored.clone()));
        store.expect_append().never();

        let service = BlendDedupService::new(Arc::new(store), "slot");
        assert_eq!(service.submit_or_find(&recipe).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_stored_recipe_is_a_storage_error() {
        let mut broken = entry(1, &Recipe::new(vec![(1, 1)]));
        broken.recipe = "not json".to_string();

        let mut store = MockBlendLogStore::new();
        store
            .expect_list_all()
            .returning(move || Ok(vec![broken.clone()]));
        store.expect_append().never();

        let service = BlendDedupService::new(Arc::new(store), "slot");
        let result = service.submit_or_find(&Recipe::new(vec![(1, 1)])).await;

        assert!(matches!(
            result,
            Err(AppError::Storage(RepositoryError::SerializationFailed(_)))
        ));
    }
}
