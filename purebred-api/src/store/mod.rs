//! Persistence port.
//!
//! Handlers and services only see [`Store`]; the backend is chosen once in
//! `main` and handed to the router inside `AppState`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    Announcement, Gender, Like, Match, Message, Owner, Pet, Species, SwipeAction, Verification,
};

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;

/// Collection names exposed by `/schema`.
pub const COLLECTIONS: [&str; 7] = [
    "owner",
    "pet",
    "like",
    "match",
    "message",
    "announcement",
    "verification",
];

#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for diagnostics.
    fn backend(&self) -> &'static str;
    async fn ping(&self) -> anyhow::Result<()>;
    async fn collection_names(&self) -> anyhow::Result<Vec<String>>;

    // Owners
    /// Inserts unless an owner with the same email exists; returns `None` then.
    async fn create_owner(&self, owner: Owner) -> anyhow::Result<Option<Owner>>;
    async fn get_owner(&self, id: Uuid) -> anyhow::Result<Option<Owner>>;

    // Pets
    async fn insert_pet(&self, pet: Pet) -> anyhow::Result<()>;
    async fn get_pet(&self, id: Uuid) -> anyhow::Result<Option<Pet>>;
    async fn search_pets(&self, filter: &PetFilter, limit: usize) -> anyhow::Result<Vec<Pet>>;

    // Swipes
    async fn insert_like(&self, like: Like) -> anyhow::Result<()>;
    async fn find_like(
        &self,
        liker_pet_id: Uuid,
        target_pet_id: Uuid,
        action: SwipeAction,
    ) -> anyhow::Result<Option<Like>>;

    // Matches
    /// Looks the pair up in both orientations.
    async fn find_match(&self, pet_x: Uuid, pet_y: Uuid) -> anyhow::Result<Option<Match>>;
    /// Atomic insert keyed on the unordered pet pair. Returns `None` when a
    /// match for the pair already exists.
    async fn create_match_if_absent(&self, m: Match) -> anyhow::Result<Option<Match>>;
    async fn get_match(&self, id: Uuid) -> anyhow::Result<Option<Match>>;
    async fn matches_for_owner(&self, owner_id: Uuid, limit: usize) -> anyhow::Result<Vec<Match>>;

    // Messages
    async fn insert_message(&self, message: Message) -> anyhow::Result<()>;
    /// Oldest first.
    async fn messages_for_match(
        &self,
        match_id: Uuid,
        limit: usize,
    ) -> anyhow::Result<Vec<Message>>;

    // Announcements & verification
    async fn insert_announcement(&self, announcement: Announcement) -> anyhow::Result<()>;
    async fn list_announcements(
        &self,
        species: Option<Species>,
        limit: usize,
    ) -> anyhow::Result<Vec<Announcement>>;
    async fn insert_verification(&self, verification: Verification) -> anyhow::Result<()>;
}

/// Pet search criteria. `breed` is a case-insensitive exact match, `city` a
/// case-insensitive substring match, ages are inclusive.
#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub gender: Option<Gender>,
    pub pedigree: Option<bool>,
    pub city: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl PetFilter {
    pub fn for_species(species: Species) -> Self {
        Self {
            species: Some(species),
            ..Self::default()
        }
    }

    pub fn matches(&self, pet: &Pet) -> bool {
        if self.species.is_some_and(|s| s != pet.species) {
            return false;
        }
        if let Some(breed) = &self.breed {
            if pet.breed.to_lowercase() != breed.to_lowercase() {
                return false;
            }
        }
        if self.min_age.is_some_and(|min| pet.age < min) {
            return false;
        }
        if self.max_age.is_some_and(|max| pet.age > max) {
            return false;
        }
        if self.gender.is_some_and(|g| g != pet.gender) {
            return false;
        }
        if self.pedigree.is_some_and(|p| p != pet.pedigree) {
            return false;
        }
        if let Some(city) = &self.city {
            let needle = city.to_lowercase();
            match &pet.city {
                Some(c) if c.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }
        if self.owner_id.is_some_and(|o| o != pet.owner_id) {
            return false;
        }
        true
    }
}
