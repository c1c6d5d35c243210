use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use purebred_shared::errors::{AppError, AppResult, ErrorCode};
use purebred_shared::extract::{ValidJson, ValidQuery};
use purebred_shared::{parse_id, Created};

use crate::models::{Gender, Pet, Species};
use crate::store::PetFilter;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePetRequest {
    pub owner_id: String,
    pub species: Species,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub breed: String,
    #[validate(range(min = 0, max = 35))]
    pub age: i32,
    pub gender: Gender,
    #[serde(default)]
    pub pedigree: bool,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub personality: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    pub city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub location_lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub location_lng: Option<f64>,
    #[serde(default)]
    pub verified: bool,
}

/// POST /pets
pub async fn create_pet(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreatePetRequest>,
) -> AppResult<Json<Created>> {
    let owner_id = parse_id(&req.owner_id)?;

    // The owner must exist; reported as a bad request rather than 404.
    if state.store.get_owner(owner_id).await?.is_none() {
        return Err(AppError::new(ErrorCode::UnknownOwner, "owner not found"));
    }

    let pet = Pet {
        id: Uuid::now_v7(),
        owner_id,
        species: req.species,
        name: req.name,
        breed: req.breed,
        age: req.age,
        gender: req.gender,
        pedigree: req.pedigree,
        photos: req.photos,
        videos: req.videos,
        personality: req.personality,
        preferences: req.preferences,
        city: req.city,
        location_lat: req.location_lat,
        location_lng: req.location_lng,
        verified: req.verified,
        created_at: Utc::now(),
    };
    let pet_id = pet.id;

    state.store.insert_pet(pet).await?;
    tracing::info!(pet_id = %pet_id, owner_id = %owner_id, "pet listed");

    Ok(Json(Created::new(pet_id)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PetSearchParams {
    pub species: Species,
    pub breed: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub gender: Option<Gender>,
    pub pedigree: Option<bool>,
    pub city: Option<String>,
    pub owner_id: Option<String>,
}

impl PetSearchParams {
    fn into_filter(self) -> AppResult<PetFilter> {
        let owner_id = non_empty(self.owner_id).map(|id| parse_id(&id)).transpose()?;
        Ok(PetFilter {
            species: Some(self.species),
            breed: non_empty(self.breed),
            min_age: self.min_age,
            max_age: self.max_age,
            gender: self.gender,
            pedigree: self.pedigree,
            city: non_empty(self.city),
            owner_id,
        })
    }
}

/// GET /pets?species=dog&breed=&min_age=&max_age=&gender=&pedigree=&city=&owner_id=
pub async fn list_pets(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PetSearchParams>,
) -> AppResult<Json<Vec<Pet>>> {
    let filter = params.into_filter()?;
    let pets = state.store.search_pets(&filter, state.config.list_limit).await?;
    Ok(Json(pets))
}

#[derive(Debug, Deserialize, Validate)]
pub struct NearbyParams {
    pub species: Species,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub city: Option<String>,
    pub radius_km: Option<u32>,
}

/// GET /nearby?species=cat&city=
///
/// Location matching is by city substring only; `lat`, `lng` and
/// `radius_km` are accepted but do not narrow the result.
pub async fn nearby_pets(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<NearbyParams>,
) -> AppResult<Json<Vec<Pet>>> {
    if params.lat.is_some() || params.lng.is_some() {
        tracing::debug!(
            lat = ?params.lat,
            lng = ?params.lng,
            radius_km = params.radius_km.unwrap_or(50),
            "coordinates ignored by nearby search"
        );
    }

    let filter = PetFilter {
        city: non_empty(params.city),
        ..PetFilter::for_species(params.species)
    };
    let pets = state.store.search_pets(&filter, state.config.nearby_limit).await?;
    Ok(Json(pets))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
