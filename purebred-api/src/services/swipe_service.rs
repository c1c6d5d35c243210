use serde::{Deserialize, Serialize};
use uuid::Uuid;

use purebred_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Like, Match, SwipeAction};
use crate::store::Store;

/// Result of a swipe, serialized as either
/// `{"status":"match","match_id":..}` or `{"status":"recorded","match":false}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SwipeOutcome {
    Match {
        match_id: Uuid,
    },
    Recorded {
        #[serde(rename = "match")]
        matched: bool,
    },
}

impl SwipeOutcome {
    pub fn recorded() -> Self {
        Self::Recorded { matched: false }
    }
}

/// Records a swipe and, on a reciprocal like, materializes the match.
///
/// The like is persisted before anything else is looked at. A match is only
/// reported the first time a pair becomes mutual; later reciprocal likes, and
/// swipes that reference unknown pets, come back as `recorded`.
pub async fn swipe(store: &dyn Store, like: Like) -> AppResult<SwipeOutcome> {
    if like.liker_pet_id == like.target_pet_id {
        return Err(AppError::new(ErrorCode::CannotSwipeSelf, "cannot swipe your own pet"));
    }

    let liker_pet_id = like.liker_pet_id;
    let target_pet_id = like.target_pet_id;
    let action = like.action;

    store.insert_like(like).await?;
    metrics::counter!("purebred_swipes_total", "action" => action.as_str()).increment(1);
    tracing::debug!(%liker_pet_id, %target_pet_id, %action, "swipe recorded");

    if action != SwipeAction::Like {
        return Ok(SwipeOutcome::recorded());
    }

    let mutual = store
        .find_like(target_pet_id, liker_pet_id, SwipeAction::Like)
        .await?;
    if mutual.is_none() {
        return Ok(SwipeOutcome::recorded());
    }

    let (Some(liker_pet), Some(target_pet)) = (
        store.get_pet(liker_pet_id).await?,
        store.get_pet(target_pet_id).await?,
    ) else {
        tracing::warn!(%liker_pet_id, %target_pet_id, "mutual like references a missing pet");
        return Ok(SwipeOutcome::recorded());
    };

    if store.find_match(liker_pet_id, target_pet_id).await?.is_some() {
        return Ok(SwipeOutcome::recorded());
    }

    // A concurrent reciprocal swipe may have won the race since the lookup.
    match store.create_match_if_absent(Match::between(&liker_pet, &target_pet)).await? {
        Some(created) => {
            metrics::counter!("purebred_matches_created_total").increment(1);
            tracing::info!(
                match_id = %created.id,
                pet_a_id = %created.pet_a_id,
                pet_b_id = %created.pet_b_id,
                "match created"
            );
            Ok(SwipeOutcome::Match { match_id: created.id })
        }
        None => Ok(SwipeOutcome::recorded()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use crate::models::{Gender, Pet, Species};
    use crate::store::MemoryStore;

    async fn seed_pet(store: &MemoryStore, owner_id: Uuid) -> Uuid {
        let pet = Pet {
            id: Uuid::now_v7(),
            owner_id,
            species: Species::Dog,
            name: "Biscuit".into(),
            breed: "Beagle".into(),
            age: 3,
            gender: Gender::Female,
            pedigree: false,
            photos: vec![],
            videos: vec![],
            personality: vec![],
            preferences: vec![],
            city: None,
            location_lat: None,
            location_lng: None,
            verified: false,
            created_at: Utc::now(),
        };
        let id = pet.id;
        store.insert_pet(pet).await.unwrap();
        id
    }

    async fn pair(store: &MemoryStore) -> ((Uuid, Uuid), (Uuid, Uuid)) {
        let (o1, o2) = (Uuid::now_v7(), Uuid::now_v7());
        let p1 = seed_pet(store, o1).await;
        let p2 = seed_pet(store, o2).await;
        ((p1, o1), (p2, o2))
    }

    #[tokio::test]
    async fn self_swipe_is_rejected_for_any_action() {
        let store = MemoryStore::new();
        let pet = Uuid::now_v7();
        for action in [SwipeAction::Like, SwipeAction::Pass] {
            let err = swipe(&store, Like::new(pet, pet, action, Uuid::now_v7()))
                .await
                .unwrap_err();
            assert_eq!(err.error_code(), ErrorCode::CannotSwipeSelf);
        }
        assert_eq!(store.like_count(pet, pet), 0);
    }

    #[tokio::test]
    async fn reciprocal_like_creates_exactly_one_match() {
        let store = MemoryStore::new();
        let ((p1, o1), (p2, o2)) = pair(&store).await;

        let first = swipe(&store, Like::new(p1, p2, SwipeAction::Like, o1)).await.unwrap();
        assert_eq!(first, SwipeOutcome::recorded());

        let second = swipe(&store, Like::new(p2, p1, SwipeAction::Like, o2)).await.unwrap();
        let SwipeOutcome::Match { match_id } = second else {
            panic!("expected a match, got {second:?}");
        };

        let created = store.get_match(match_id).await.unwrap().unwrap();
        assert_eq!((created.pet_a_id, created.pet_b_id), (p2, p1));
        assert_eq!((created.owner_a_id, created.owner_b_id), (o2, o1));

        let third = swipe(&store, Like::new(p1, p2, SwipeAction::Like, o1)).await.unwrap();
        assert_eq!(third, SwipeOutcome::recorded());
        assert_eq!(store.match_count(), 1);
        assert_eq!(store.like_count(p1, p2), 2);
    }

    #[tokio::test]
    async fn pass_never_matches() {
        let store = MemoryStore::new();
        let ((p1, o1), (p2, o2)) = pair(&store).await;

        swipe(&store, Like::new(p1, p2, SwipeAction::Like, o1)).await.unwrap();
        let outcome = swipe(&store, Like::new(p2, p1, SwipeAction::Pass, o2)).await.unwrap();

        assert_eq!(outcome, SwipeOutcome::recorded());
        assert_eq!(store.match_count(), 0);
        assert_eq!(store.like_count(p2, p1), 1);
    }

    #[tokio::test]
    async fn earlier_pass_does_not_count_as_interest() {
        let store = MemoryStore::new();
        let ((p1, o1), (p2, o2)) = pair(&store).await;

        swipe(&store, Like::new(p1, p2, SwipeAction::Pass, o1)).await.unwrap();
        let outcome = swipe(&store, Like::new(p2, p1, SwipeAction::Like, o2)).await.unwrap();
        assert_eq!(outcome, SwipeOutcome::recorded());
        assert_eq!(store.match_count(), 0);
    }

    #[tokio::test]
    async fn missing_pet_is_a_soft_failure() {
        let store = MemoryStore::new();
        let owner = Uuid::now_v7();
        let known = seed_pet(&store, owner).await;
        let ghost = Uuid::now_v7();

        swipe(&store, Like::new(ghost, known, SwipeAction::Like, Uuid::now_v7())).await.unwrap();
        let outcome = swipe(&store, Like::new(known, ghost, SwipeAction::Like, owner))
            .await
            .unwrap();

        assert_eq!(outcome, SwipeOutcome::recorded());
        assert_eq!(store.match_count(), 0);
        assert_eq!(store.like_count(known, ghost), 1);
    }

    #[tokio::test]
    async fn concurrent_reciprocal_likes_match_once() {
        let store = Arc::new(MemoryStore::new());
        let ((p1, o1), (p2, o2)) = pair(&store).await;

        // both directions already liked once, so every further like is mutual
        swipe(store.as_ref(), Like::new(p1, p2, SwipeAction::Like, o1)).await.unwrap();
        store.insert_like(Like::new(p2, p1, SwipeAction::Like, o2)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            let like = if i % 2 == 0 {
                Like::new(p1, p2, SwipeAction::Like, o1)
            } else {
                Like::new(p2, p1, SwipeAction::Like, o2)
            };
            handles.push(tokio::spawn(async move { swipe(store.as_ref(), like).await }));
        }

        let mut announced = 0;
        for handle in handles {
            if let SwipeOutcome::Match { .. } = handle.await.unwrap().unwrap() {
                announced += 1;
            }
        }
        assert_eq!(announced, 1);
        assert_eq!(store.match_count(), 1);
    }

    #[test]
    fn outcome_wire_shapes() {
        let id = Uuid::now_v7();
        assert_eq!(
            serde_json::to_value(SwipeOutcome::Match { match_id: id }).unwrap(),
            serde_json::json!({ "status": "match", "match_id": id.to_string() })
        );
        assert_eq!(
            serde_json::to_value(SwipeOutcome::recorded()).unwrap(),
            serde_json::json!({ "status": "recorded", "match": false })
        );
    }
}
