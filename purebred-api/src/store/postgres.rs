use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use uuid::Uuid;

use super::{PetFilter, Store};
use crate::models::{
    Announcement, Like, Match, Message, Owner, Pet, Species, SwipeAction, Verification,
};
use crate::schema::{announcements, likes, matches, messages, owners, pets, verifications};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// PostgreSQL backend. Expects the tables in `schema.sql`.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn connect(database_url: &str, max_size: u32) -> anyhow::Result<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(2.min(max_size)))
            .test_on_check_out(true)
            .build(manager)?;

        tracing::info!(max_size, "database connection pool created");
        Ok(Self { pool })
    }

    /// Run a diesel closure on the blocking pool with a checked-out connection.
    async fn with_conn<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&mut PgConnection) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await?
    }
}

fn parse_text<T>(value: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse().map_err(anyhow::Error::msg)
}

/// Escape LIKE metacharacters so user input is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// --- Rows ---

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = owners)]
struct OwnerRow {
    id: Uuid,
    name: String,
    email: String,
    city: Option<String>,
    location_lat: Option<f64>,
    location_lng: Option<f64>,
    premium: bool,
    verified: bool,
    created_at: DateTime<Utc>,
}

impl From<Owner> for OwnerRow {
    fn from(o: Owner) -> Self {
        Self {
            id: o.id,
            name: o.name,
            email: o.email,
            city: o.city,
            location_lat: o.location_lat,
            location_lng: o.location_lng,
            premium: o.premium,
            verified: o.verified,
            created_at: o.created_at,
        }
    }
}

impl From<OwnerRow> for Owner {
    fn from(r: OwnerRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            city: r.city,
            location_lat: r.location_lat,
            location_lng: r.location_lng,
            premium: r.premium,
            verified: r.verified,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = pets)]
struct PetRow {
    id: Uuid,
    owner_id: Uuid,
    species: String,
    name: String,
    breed: String,
    age: i32,
    gender: String,
    pedigree: bool,
    photos: Vec<String>,
    videos: Vec<String>,
    personality: Vec<String>,
    preferences: Vec<String>,
    city: Option<String>,
    location_lat: Option<f64>,
    location_lng: Option<f64>,
    verified: bool,
    created_at: DateTime<Utc>,
}

impl From<Pet> for PetRow {
    fn from(p: Pet) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            species: p.species.as_str().to_string(),
            name: p.name,
            breed: p.breed,
            age: p.age,
            gender: p.gender.as_str().to_string(),
            pedigree: p.pedigree,
            photos: p.photos,
            videos: p.videos,
            personality: p.personality,
            preferences: p.preferences,
            city: p.city,
            location_lat: p.location_lat,
            location_lng: p.location_lng,
            verified: p.verified,
            created_at: p.created_at,
        }
    }
}

impl TryFrom<PetRow> for Pet {
    type Error = anyhow::Error;

    fn try_from(r: PetRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: r.id,
            owner_id: r.owner_id,
            species: parse_text(&r.species)?,
            name: r.name,
            breed: r.breed,
            age: r.age,
            gender: parse_text(&r.gender)?,
            pedigree: r.pedigree,
            photos: r.photos,
            videos: r.videos,
            personality: r.personality,
            preferences: r.preferences,
            city: r.city,
            location_lat: r.location_lat,
            location_lng: r.location_lng,
            verified: r.verified,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = likes)]
struct LikeRow {
    id: Uuid,
    liker_pet_id: Uuid,
    target_pet_id: Uuid,
    action: String,
    created_by_owner_id: Uuid,
    created_at: DateTime<Utc>,
}

impl TryFrom<LikeRow> for Like {
    type Error = anyhow::Error;

    fn try_from(r: LikeRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: r.id,
            liker_pet_id: r.liker_pet_id,
            target_pet_id: r.target_pet_id,
            action: parse_text(&r.action)?,
            created_by_owner_id: r.created_by_owner_id,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = matches)]
struct MatchRow {
    id: Uuid,
    pet_a_id: Uuid,
    pet_b_id: Uuid,
    owner_a_id: Uuid,
    owner_b_id: Uuid,
    pair_key: String,
    created_at: DateTime<Utc>,
}

impl From<Match> for MatchRow {
    fn from(m: Match) -> Self {
        Self {
            pair_key: m.pair_key(),
            id: m.id,
            pet_a_id: m.pet_a_id,
            pet_b_id: m.pet_b_id,
            owner_a_id: m.owner_a_id,
            owner_b_id: m.owner_b_id,
            created_at: m.created_at,
        }
    }
}

impl From<MatchRow> for Match {
    fn from(r: MatchRow) -> Self {
        Self {
            id: r.id,
            pet_a_id: r.pet_a_id,
            pet_b_id: r.pet_b_id,
            owner_a_id: r.owner_a_id,
            owner_b_id: r.owner_b_id,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = messages)]
struct MessageRow {
    id: Uuid,
    match_id: Uuid,
    sender_pet_id: Uuid,
    sender_owner_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<Message> for MessageRow {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            match_id: m.match_id,
            sender_pet_id: m.sender_pet_id,
            sender_owner_id: m.sender_owner_id,
            text: m.text,
            created_at: m.created_at,
        }
    }
}

impl From<MessageRow> for Message {
    fn from(r: MessageRow) -> Self {
        Self {
            id: r.id,
            match_id: r.match_id,
            sender_pet_id: r.sender_pet_id,
            sender_owner_id: r.sender_owner_id,
            text: r.text,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = announcements)]
struct AnnouncementRow {
    id: Uuid,
    owner_id: Uuid,
    pet_id: Option<Uuid>,
    species: String,
    title: String,
    description: String,
    city: Option<String>,
    date: Option<NaiveDate>,
    kind: String,
    created_at: DateTime<Utc>,
}

impl From<Announcement> for AnnouncementRow {
    fn from(a: Announcement) -> Self {
        Self {
            id: a.id,
            owner_id: a.owner_id,
            pet_id: a.pet_id,
            species: a.species.as_str().to_string(),
            title: a.title,
            description: a.description,
            city: a.city,
            date: a.date,
            kind: a.kind.as_str().to_string(),
            created_at: a.created_at,
        }
    }
}

impl TryFrom<AnnouncementRow> for Announcement {
    type Error = anyhow::Error;

    fn try_from(r: AnnouncementRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: r.id,
            owner_id: r.owner_id,
            pet_id: r.pet_id,
            species: parse_text(&r.species)?,
            title: r.title,
            description: r.description,
            city: r.city,
            date: r.date,
            kind: parse_text(&r.kind)?,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = verifications)]
struct NewVerificationRow {
    id: Uuid,
    pet_id: Uuid,
    kind: String,
    status: String,
    document_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<Verification> for NewVerificationRow {
    fn from(v: Verification) -> Self {
        Self {
            id: v.id,
            pet_id: v.pet_id,
            kind: v.kind.as_str().to_string(),
            status: v.status.as_str().to_string(),
            document_url: v.document_url,
            created_at: v.created_at,
        }
    }
}

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = diesel::sql_types::Text)]
    table_name: String,
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.with_conn(|conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn collection_names(&self) -> anyhow::Result<Vec<String>> {
        self.with_conn(|conn| {
            let names = diesel::sql_query(
                "SELECT table_name::text AS table_name FROM information_schema.tables \
                 WHERE table_schema = 'public' ORDER BY table_name",
            )
            .load::<TableName>(conn)?;
            Ok(names.into_iter().map(|t| t.table_name).collect())
        })
        .await
    }

    async fn create_owner(&self, owner: Owner) -> anyhow::Result<Option<Owner>> {
        let row = OwnerRow::from(owner);
        self.with_conn(move |conn| {
            let inserted = diesel::insert_into(owners::table)
                .values(&row)
                .on_conflict(owners::email)
                .do_nothing()
                .get_result::<OwnerRow>(conn)
                .optional()?;
            Ok(inserted.map(Owner::from))
        })
        .await
    }

    async fn get_owner(&self, id: Uuid) -> anyhow::Result<Option<Owner>> {
        self.with_conn(move |conn| {
            let row = owners::table.find(id).first::<OwnerRow>(conn).optional()?;
            Ok(row.map(Owner::from))
        })
        .await
    }

    async fn insert_pet(&self, pet: Pet) -> anyhow::Result<()> {
        let row = PetRow::from(pet);
        self.with_conn(move |conn| {
            diesel::insert_into(pets::table).values(&row).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn get_pet(&self, id: Uuid) -> anyhow::Result<Option<Pet>> {
        self.with_conn(move |conn| {
            pets::table
                .find(id)
                .first::<PetRow>(conn)
                .optional()?
                .map(Pet::try_from)
                .transpose()
        })
        .await
    }

    async fn search_pets(&self, filter: &PetFilter, limit: usize) -> anyhow::Result<Vec<Pet>> {
        let filter = filter.clone();
        self.with_conn(move |conn| {
            let mut query: pets::BoxedQuery<'static, Pg> = pets::table.into_boxed();

            if let Some(species) = filter.species {
                query = query.filter(pets::species.eq(species.as_str()));
            }
            if let Some(breed) = filter.breed {
                query = query.filter(pets::breed.ilike(escape_like(&breed)));
            }
            if let Some(min_age) = filter.min_age {
                query = query.filter(pets::age.ge(min_age));
            }
            if let Some(max_age) = filter.max_age {
                query = query.filter(pets::age.le(max_age));
            }
            if let Some(gender) = filter.gender {
                query = query.filter(pets::gender.eq(gender.as_str()));
            }
            if let Some(pedigree) = filter.pedigree {
                query = query.filter(pets::pedigree.eq(pedigree));
            }
            if let Some(city) = filter.city {
                query = query.filter(pets::city.ilike(format!("%{}%", escape_like(&city))));
            }
            if let Some(owner_id) = filter.owner_id {
                query = query.filter(pets::owner_id.eq(owner_id));
            }

            query
                .order((pets::created_at.asc(), pets::id.asc()))
                .limit(limit as i64)
                .load::<PetRow>(conn)?
                .into_iter()
                .map(Pet::try_from)
                .collect()
        })
        .await
    }

    async fn insert_like(&self, like: Like) -> anyhow::Result<()> {
        let row = LikeRow {
            id: like.id,
            liker_pet_id: like.liker_pet_id,
            target_pet_id: like.target_pet_id,
            action: like.action.as_str().to_string(),
            created_by_owner_id: like.created_by_owner_id,
            created_at: like.created_at,
        };
        self.with_conn(move |conn| {
            diesel::insert_into(likes::table).values(&row).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn find_like(
        &self,
        liker_pet_id: Uuid,
        target_pet_id: Uuid,
        action: SwipeAction,
    ) -> anyhow::Result<Option<Like>> {
        self.with_conn(move |conn| {
            likes::table
                .filter(likes::liker_pet_id.eq(liker_pet_id))
                .filter(likes::target_pet_id.eq(target_pet_id))
                .filter(likes::action.eq(action.as_str()))
                .first::<LikeRow>(conn)
                .optional()?
                .map(Like::try_from)
                .transpose()
        })
        .await
    }

    async fn find_match(&self, pet_x: Uuid, pet_y: Uuid) -> anyhow::Result<Option<Match>> {
        self.with_conn(move |conn| {
            let row = matches::table
                .filter(
                    matches::pet_a_id
                        .eq(pet_x)
                        .and(matches::pet_b_id.eq(pet_y))
                        .or(matches::pet_a_id.eq(pet_y).and(matches::pet_b_id.eq(pet_x))),
                )
                .first::<MatchRow>(conn)
                .optional()?;
            Ok(row.map(Match::from))
        })
        .await
    }

    async fn create_match_if_absent(&self, m: Match) -> anyhow::Result<Option<Match>> {
        let row = MatchRow::from(m);
        self.with_conn(move |conn| {
            let inserted = diesel::insert_into(matches::table)
                .values(&row)
                .on_conflict(matches::pair_key)
                .do_nothing()
                .get_result::<MatchRow>(conn)
                .optional()?;
            Ok(inserted.map(Match::from))
        })
        .await
    }

    async fn get_match(&self, id: Uuid) -> anyhow::Result<Option<Match>> {
        self.with_conn(move |conn| {
            let row = matches::table.find(id).first::<MatchRow>(conn).optional()?;
            Ok(row.map(Match::from))
        })
        .await
    }

    async fn matches_for_owner(&self, owner_id: Uuid, limit: usize) -> anyhow::Result<Vec<Match>> {
        self.with_conn(move |conn| {
            let rows = matches::table
                .filter(matches::owner_a_id.eq(owner_id).or(matches::owner_b_id.eq(owner_id)))
                .order((matches::created_at.asc(), matches::id.asc()))
                .limit(limit as i64)
                .load::<MatchRow>(conn)?;
            Ok(rows.into_iter().map(Match::from).collect())
        })
        .await
    }

    async fn insert_message(&self, message: Message) -> anyhow::Result<()> {
        let row = MessageRow::from(message);
        self.with_conn(move |conn| {
            diesel::insert_into(messages::table).values(&row).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn messages_for_match(
        &self,
        match_id: Uuid,
        limit: usize,
    ) -> anyhow::Result<Vec<Message>> {
        self.with_conn(move |conn| {
            let rows = messages::table
                .filter(messages::match_id.eq(match_id))
                .order((messages::created_at.asc(), messages::id.asc()))
                .limit(limit as i64)
                .load::<MessageRow>(conn)?;
            Ok(rows.into_iter().map(Message::from).collect())
        })
        .await
    }

    async fn insert_announcement(&self, announcement: Announcement) -> anyhow::Result<()> {
        let row = AnnouncementRow::from(announcement);
        self.with_conn(move |conn| {
            diesel::insert_into(announcements::table).values(&row).execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn list_announcements(
        &self,
        species: Option<Species>,
        limit: usize,
    ) -> anyhow::Result<Vec<Announcement>> {
        self.with_conn(move |conn| {
            let mut query: announcements::BoxedQuery<'static, Pg> =
                announcements::table.into_boxed();
            if let Some(species) = species {
                query = query.filter(announcements::species.eq(species.as_str()));
            }
            query
                .order((announcements::created_at.asc(), announcements::id.asc()))
                .limit(limit as i64)
                .load::<AnnouncementRow>(conn)?
                .into_iter()
                .map(Announcement::try_from)
                .collect()
        })
        .await
    }

    async fn insert_verification(&self, verification: Verification) -> anyhow::Result<()> {
        let row = NewVerificationRow::from(verification);
        self.with_conn(move |conn| {
            diesel::insert_into(verifications::table).values(&row).execute(conn)?;
            Ok(())
        })
        .await
    }
}
