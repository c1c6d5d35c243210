use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Enums ---

macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!(concat!("unknown ", stringify!($name), ": {}"), s)),
                }
            }
        }
    };
}

text_enum!(Species { Dog => "dog", Cat => "cat" });
text_enum!(Gender { Male => "male", Female => "female" });
text_enum!(SwipeAction { Like => "like", Pass => "pass" });
text_enum!(AnnouncementKind { Breeding => "breeding", Event => "event" });
text_enum!(VerificationKind { Photo => "photo", Pedigree => "pedigree" });
text_enum!(VerificationStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

impl Default for VerificationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

// --- Owner ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub city: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub premium: bool,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

// --- Pet ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub species: Species,
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub gender: Gender,
    pub pedigree: bool,
    pub photos: Vec<String>,
    pub videos: Vec<String>,
    pub personality: Vec<String>,
    pub preferences: Vec<String>,
    pub city: Option<String>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

// --- Like ---

/// One swipe. Re-swiping the same pair appends another record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub id: Uuid,
    pub liker_pet_id: Uuid,
    pub target_pet_id: Uuid,
    pub action: SwipeAction,
    pub created_by_owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(
        liker_pet_id: Uuid,
        target_pet_id: Uuid,
        action: SwipeAction,
        created_by_owner_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            liker_pet_id,
            target_pet_id,
            action,
            created_by_owner_id,
            created_at: Utc::now(),
        }
    }
}

// --- Match ---

/// Mutual like between two pets. Owner ids are copied from the pets when the
/// match is created and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub pet_a_id: Uuid,
    pub pet_b_id: Uuid,
    pub owner_a_id: Uuid,
    pub owner_b_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn between(pet_a: &Pet, pet_b: &Pet) -> Self {
        Self {
            id: Uuid::now_v7(),
            pet_a_id: pet_a.id,
            pet_b_id: pet_b.id,
            owner_a_id: pet_a.owner_id,
            owner_b_id: pet_b.owner_id,
            created_at: Utc::now(),
        }
    }

    pub fn pair_key(&self) -> String {
        purebred_shared::pair_key(&self.pet_a_id, &self.pet_b_id)
    }

    pub fn has_owner(&self, owner_id: Uuid) -> bool {
        self.owner_a_id == owner_id || self.owner_b_id == owner_id
    }
}

// --- Message ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub match_id: Uuid,
    pub sender_pet_id: Uuid,
    pub sender_owner_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// --- Announcement ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub pet_id: Option<Uuid>,
    pub species: Species,
    pub title: String,
    pub description: String,
    pub city: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
    pub created_at: DateTime<Utc>,
}

// --- Verification ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub id: Uuid,
    pub pet_id: Uuid,
    #[serde(rename = "type")]
    pub kind: VerificationKind,
    pub status: VerificationStatus,
    pub document_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
