//! HTTP routes.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use runefall_domain::{
    AbilityDefinition, AbilityId, CharacterId, EffectDescriptor, Loadout, ResourceKind,
    ResourcePool, SlotKey, SynergyRule, SynergyRuleId,
};

use crate::app::App;
use crate::use_cases::abilities::{AbilityError, TargetRef, UseRequest};
use crate::entities::{LedgerError, LoadoutError};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/abilities", get(list_abilities))
        .route(
            "/api/characters/{id}/abilities/{ability_id}/use",
            post(use_ability),
        )
        .route("/api/characters/{id}/cooldowns", get(get_cooldowns))
        .route("/api/characters/{id}/synergies", get(get_synergies))
        .route(
            "/api/characters/{id}/loadout",
            get(get_loadout).put(update_loadout),
        )
        .route(
            "/api/characters/{id}/resources/regenerate",
            post(regenerate),
        )
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Abilities
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListAbilitiesQuery {
    character_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
struct AbilityListingDto {
    #[serde(flatten)]
    definition: AbilityDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    unlocked: Option<bool>,
}

async fn list_abilities(
    State(app): State<Arc<App>>,
    Query(query): Query<ListAbilitiesQuery>,
) -> Result<Json<Vec<AbilityListingDto>>, ApiError> {
    let listings = app
        .use_cases
        .list_abilities
        .execute(query.character_id.map(CharacterId::from_uuid))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(
        listings
            .into_iter()
            .map(|listing| AbilityListingDto {
                definition: listing.definition,
                unlocked: listing.unlocked,
            })
            .collect(),
    ))
}

#[derive(Debug, Default, Deserialize)]
struct UseAbilityBody {
    target: Option<String>,
    context: Option<String>,
}

#[derive(Debug, Serialize)]
struct UseResultDto {
    ability_id: AbilityId,
    effect: EffectDescriptor,
    target: Option<TargetRef>,
    applied_synergies: Vec<SynergyRuleId>,
    used_at: DateTime<Utc>,
    ready_at: DateTime<Utc>,
    balance: ResourcePool,
}

async fn use_ability(
    State(app): State<Arc<App>>,
    Path((id, ability_id)): Path<(Uuid, String)>,
    body: Option<Json<UseAbilityBody>>,
) -> Result<Json<UseResultDto>, ApiError> {
    let ability_id = AbilityId::new(ability_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let Json(body) = body.unwrap_or_default();
    let result = app
        .use_cases
        .use_ability
        .execute(UseRequest {
            character_id: CharacterId::from_uuid(id),
            ability_id,
            target: body.target.map(TargetRef),
            context: body.context,
        })
        .await?;
    Ok(Json(UseResultDto {
        ability_id: result.ability_id,
        effect: result.effect,
        target: result.target,
        applied_synergies: result.applied_synergies,
        used_at: result.used_at,
        ready_at: result.ready_at,
        balance: result.balance,
    }))
}

// =============================================================================
// Cooldowns & synergies
// =============================================================================

#[derive(Debug, Serialize)]
struct CooldownDto {
    ability_id: AbilityId,
    remaining_ms: i64,
    total_ms: i64,
    ready_at: DateTime<Utc>,
}

async fn get_cooldowns(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CooldownDto>>, ApiError> {
    let views = app
        .use_cases
        .get_cooldowns
        .execute(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(
        views
            .into_iter()
            .map(|view| CooldownDto {
                ability_id: view.ability_id,
                remaining_ms: view.remaining.num_milliseconds(),
                total_ms: view.total.num_milliseconds(),
                ready_at: view.ready_at,
            })
            .collect(),
    ))
}

async fn get_synergies(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SynergyRule>>, ApiError> {
    let rules = app
        .use_cases
        .get_synergies
        .execute(CharacterId::from_uuid(id))
        .await?;
    Ok(Json(rules))
}

// =============================================================================
// Loadout
// =============================================================================

#[derive(Debug, Deserialize)]
struct UpdateLoadoutBody {
    slots: BTreeMap<String, Option<String>>,
}

async fn get_loadout(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Loadout>, ApiError> {
    let loadout = app
        .use_cases
        .get_loadout
        .execute(CharacterId::from_uuid(id))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(loadout))
}

async fn update_loadout(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLoadoutBody>,
) -> Result<Json<Loadout>, ApiError> {
    let mut assignments = BTreeMap::new();
    for (slot, ability) in body.slots {
        let slot: SlotKey = slot
            .parse()
            .map_err(|e: runefall_domain::DomainError| ApiError::BadRequest(e.to_string()))?;
        let ability = ability
            .map(AbilityId::new)
            .transpose()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        assignments.insert(slot, ability);
    }

    let loadout = app
        .use_cases
        .update_loadout
        .execute(CharacterId::from_uuid(id), assignments)
        .await?;
    Ok(Json(loadout))
}

// =============================================================================
// Resources
// =============================================================================

#[derive(Debug, Deserialize)]
struct RegenerateBody {
    kind: ResourceKind,
    amount: u32,
}

async fn regenerate(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(body): Json<RegenerateBody>,
) -> Result<Json<ResourcePool>, ApiError> {
    let pool = app
        .use_cases
        .regenerate
        .execute(CharacterId::from_uuid(id), body.kind, body.amount)
        .await?;
    Ok(Json(pool))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(Value),
    Unprocessable(Value),
    Timeout,
    Unavailable(String),
    Internal(String),
}

impl From<AbilityError> for ApiError {
    fn from(err: AbilityError) -> Self {
        match err {
            AbilityError::UnknownAbility(id) => {
                ApiError::NotFound(format!("Unknown ability: {}", id))
            }
            AbilityError::NotEquipped(id) => ApiError::Conflict(json!({
                "error": "not_equipped",
                "ability_id": id,
            })),
            AbilityError::OnCooldown { remaining } => ApiError::Conflict(json!({
                "error": "on_cooldown",
                "remaining_ms": remaining.num_milliseconds(),
            })),
            AbilityError::InsufficientResources { missing } => ApiError::Conflict(json!({
                "error": "insufficient_resources",
                "missing": missing,
            })),
            AbilityError::Timeout => ApiError::Timeout,
            AbilityError::StorageConflict => {
                ApiError::Unavailable("Storage is contended, retry".to_string())
            }
            AbilityError::Repo(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<LoadoutError> for ApiError {
    fn from(err: LoadoutError) -> Self {
        match err {
            LoadoutError::InvalidAbility {
                slot,
                ability_id,
                reason,
            } => ApiError::Unprocessable(json!({
                "error": "invalid_ability",
                "slot": slot.as_str(),
                "ability_id": ability_id,
                "reason": reason.to_string(),
            })),
            LoadoutError::Repo(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Insufficient(missing) => ApiError::Conflict(json!({
                "error": "insufficient_resources",
                "missing": missing,
            })),
            LedgerError::Conflict(_) => {
                ApiError::Unavailable("Storage is contended, retry".to_string())
            }
            LedgerError::Repo(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        match self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({"error": msg}))).into_response()
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({"error": msg}))).into_response()
            }
            ApiError::Conflict(body) => (StatusCode::CONFLICT, Json(body)).into_response(),
            ApiError::Unprocessable(body) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ApiError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                Json(json!({"error": "Commit timed out"})),
            )
                .into_response(),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": msg}))).into_response()
            }
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal error"})),
            )
                .into_response(),
        }
    }
}
