use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use purebred_shared::pair_key;

use super::{PetFilter, Store, COLLECTIONS};
use crate::models::{
    Announcement, Like, Match, Message, Owner, Pet, Species, SwipeAction, Verification,
};

/// Process-local store. Lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    owners: DashMap<Uuid, Owner>,
    owner_emails: DashMap<String, Uuid>,
    pets: DashMap<Uuid, Pet>,
    /// Keyed by (liker, target); every swipe is appended.
    likes: DashMap<(Uuid, Uuid), Vec<Like>>,
    matches: DashMap<Uuid, Match>,
    match_pairs: DashMap<String, Uuid>,
    messages: DashMap<Uuid, Vec<Message>>,
    announcements: DashMap<Uuid, Announcement>,
    verifications: DashMap<Uuid, Verification>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of swipes recorded from `liker` towards `target`.
    pub fn like_count(&self, liker_pet_id: Uuid, target_pet_id: Uuid) -> usize {
        self.likes
            .get(&(liker_pet_id, target_pet_id))
            .map_or(0, |likes| likes.len())
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn verification(&self, id: Uuid) -> Option<Verification> {
        self.verifications.get(&id).map(|v| v.clone())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn collection_names(&self) -> anyhow::Result<Vec<String>> {
        Ok(COLLECTIONS.iter().map(|c| c.to_string()).collect())
    }

    async fn create_owner(&self, owner: Owner) -> anyhow::Result<Option<Owner>> {
        match self.owner_emails.entry(owner.email.clone()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                slot.insert(owner.id);
                self.owners.insert(owner.id, owner.clone());
                Ok(Some(owner))
            }
        }
    }

    async fn get_owner(&self, id: Uuid) -> anyhow::Result<Option<Owner>> {
        Ok(self.owners.get(&id).map(|o| o.clone()))
    }

    async fn insert_pet(&self, pet: Pet) -> anyhow::Result<()> {
        self.pets.insert(pet.id, pet);
        Ok(())
    }

    async fn get_pet(&self, id: Uuid) -> anyhow::Result<Option<Pet>> {
        Ok(self.pets.get(&id).map(|p| p.clone()))
    }

    async fn search_pets(&self, filter: &PetFilter, limit: usize) -> anyhow::Result<Vec<Pet>> {
        let mut pets: Vec<Pet> = self
            .pets
            .iter()
            .filter(|p| filter.matches(p.value()))
            .map(|p| p.value().clone())
            .collect();
        pets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        pets.truncate(limit);
        Ok(pets)
    }

    async fn insert_like(&self, like: Like) -> anyhow::Result<()> {
        self.likes
            .entry((like.liker_pet_id, like.target_pet_id))
            .or_default()
            .push(like);
        Ok(())
    }

    async fn find_like(
        &self,
        liker_pet_id: Uuid,
        target_pet_id: Uuid,
        action: SwipeAction,
    ) -> anyhow::Result<Option<Like>> {
        Ok(self.likes.get(&(liker_pet_id, target_pet_id)).and_then(|likes| {
            likes.iter().find(|l| l.action == action).cloned()
        }))
    }

    async fn find_match(&self, pet_x: Uuid, pet_y: Uuid) -> anyhow::Result<Option<Match>> {
        Ok(self
            .matches
            .iter()
            .find(|m| {
                (m.pet_a_id == pet_x && m.pet_b_id == pet_y)
                    || (m.pet_a_id == pet_y && m.pet_b_id == pet_x)
            })
            .map(|m| m.value().clone()))
    }

    async fn create_match_if_absent(&self, m: Match) -> anyhow::Result<Option<Match>> {
        match self.match_pairs.entry(pair_key(&m.pet_a_id, &m.pet_b_id)) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                slot.insert(m.id);
                self.matches.insert(m.id, m.clone());
                Ok(Some(m))
            }
        }
    }

    async fn get_match(&self, id: Uuid) -> anyhow::Result<Option<Match>> {
        Ok(self.matches.get(&id).map(|m| m.clone()))
    }

    async fn matches_for_owner(&self, owner_id: Uuid, limit: usize) -> anyhow::Result<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .matches
            .iter()
            .filter(|m| m.has_owner(owner_id))
            .map(|m| m.value().clone())
            .collect();
        matches.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn insert_message(&self, message: Message) -> anyhow::Result<()> {
        self.messages.entry(message.match_id).or_default().push(message);
        Ok(())
    }

    async fn messages_for_match(
        &self,
        match_id: Uuid,
        limit: usize,
    ) -> anyhow::Result<Vec<Message>> {
        let mut messages = self
            .messages
            .get(&match_id)
            .map(|m| m.clone())
            .unwrap_or_default();
        // stable: equal timestamps keep arrival order
        messages.sort_by_key(|m| m.created_at);
        messages.truncate(limit);
        Ok(messages)
    }

    async fn insert_announcement(&self, announcement: Announcement) -> anyhow::Result<()> {
        self.announcements.insert(announcement.id, announcement);
        Ok(())
    }

    async fn list_announcements(
        &self,
        species: Option<Species>,
        limit: usize,
    ) -> anyhow::Result<Vec<Announcement>> {
        let mut announcements: Vec<Announcement> = self
            .announcements
            .iter()
            .filter(|a| species.map_or(true, |s| a.species == s))
            .map(|a| a.value().clone())
            .collect();
        announcements.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        announcements.truncate(limit);
        Ok(announcements)
    }

    async fn insert_verification(&self, verification: Verification) -> anyhow::Result<()> {
        self.verifications.insert(verification.id, verification);
        Ok(())
    }
}
