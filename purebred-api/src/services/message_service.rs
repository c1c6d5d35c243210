use chrono::Utc;
use uuid::Uuid;

use purebred_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Match, Message};
use crate::store::Store;

/// Resolve a match and check that `owner_id` is one of its two owners.
pub async fn authorize_sender(
    store: &dyn Store,
    match_id: Uuid,
    owner_id: Uuid,
) -> AppResult<Match> {
    let m = store
        .get_match(match_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MatchNotFound, "match not found"))?;

    if !m.has_owner(owner_id) {
        metrics::counter!("purebred_message_rejections_total").increment(1);
        tracing::warn!(%match_id, %owner_id, "message from non-participant rejected");
        return Err(AppError::new(ErrorCode::NotMatchParticipant, "not part of this match"));
    }

    Ok(m)
}

/// Store a message on a match after checking the sender owns one side of it.
///
/// `sender_pet_id` is taken as given; it is not checked against the match.
pub async fn send_message(
    store: &dyn Store,
    match_id: Uuid,
    sender_pet_id: Uuid,
    sender_owner_id: Uuid,
    text: String,
) -> AppResult<Message> {
    authorize_sender(store, match_id, sender_owner_id).await?;

    let message = Message {
        id: Uuid::now_v7(),
        match_id,
        sender_pet_id,
        sender_owner_id,
        text,
        created_at: Utc::now(),
    };
    store.insert_message(message.clone()).await?;
    metrics::counter!("purebred_messages_total").increment(1);

    tracing::info!(
        message_id = %message.id,
        match_id = %match_id,
        sender_owner_id = %sender_owner_id,
        "message sent"
    );

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn seeded_match(store: &MemoryStore) -> Match {
        let m = Match {
            id: Uuid::now_v7(),
            pet_a_id: Uuid::now_v7(),
            pet_b_id: Uuid::now_v7(),
            owner_a_id: Uuid::now_v7(),
            owner_b_id: Uuid::now_v7(),
            created_at: Utc::now(),
        };
        store.create_match_if_absent(m).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn either_owner_may_send() {
        let store = MemoryStore::new();
        let m = seeded_match(&store).await;

        send_message(&store, m.id, m.pet_a_id, m.owner_a_id, "hi".into()).await.unwrap();
        send_message(&store, m.id, m.pet_b_id, m.owner_b_id, "hello".into()).await.unwrap();

        let messages = store.messages_for_match(m.id, 10).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "hi");
    }

    #[tokio::test]
    async fn outsider_is_forbidden() {
        let store = MemoryStore::new();
        let m = seeded_match(&store).await;

        let err = send_message(&store, m.id, m.pet_a_id, Uuid::now_v7(), "hey".into())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::NotMatchParticipant);
        assert!(store.messages_for_match(m.id, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_match_is_not_found() {
        let store = MemoryStore::new();
        let err = send_message(&store, Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7(), "?".into())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::MatchNotFound);
    }

    #[tokio::test]
    async fn sender_pet_is_not_checked() {
        let store = MemoryStore::new();
        let m = seeded_match(&store).await;
        let stranger_pet = Uuid::now_v7();

        let msg = send_message(&store, m.id, stranger_pet, m.owner_a_id, "mine".into())
            .await
            .unwrap();
        assert_eq!(msg.sender_pet_id, stranger_pet);
    }
}
