//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use novel_model::{
    Character, CharacterId, Description, DescriptionId, DescriptionOwner, Novel, NovelId,
    NovelUserPermission, Relationship, RelationshipId, UserId,
};
use novel_recorder::{
    CharacterCard, CharacterDetail, CharacterDraft, CharacterPatch, DescriptionDetail,
    DescriptionDraft, DescriptionPatch, NovelDetail, NovelDraft, NovelPatch, PermissionGrant,
    RelationshipCard, RelationshipDetail, RelationshipDraft, SiteSummary,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::ApiResult;
use crate::identity::CurrentActor;
use crate::AppState;

type Created<T> = (StatusCode, Json<T>);

fn created<T>(value: T) -> Created<T> {
    (StatusCode::CREATED, Json(value))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(site_summary))
        .route("/novels", post(create_novel))
        .route("/novels/public", get(public_novels))
        .route("/novels/mine", get(my_novels))
        .route(
            "/novels/:id",
            get(novel_detail).patch(update_novel).delete(delete_novel),
        )
        .route("/novels/:id/characters", get(novel_characters))
        .route(
            "/novels/:id/permissions",
            get(novel_permissions).put(grant_permission),
        )
        .route("/novels/:id/permissions/:user_id", delete(revoke_permission))
        .route("/characters", post(create_character))
        .route(
            "/characters/:id",
            get(character_detail)
                .patch(rename_character)
                .delete(delete_character),
        )
        .route("/characters/:id/relationships", get(character_relationships))
        .route("/characters/:id/descriptions", get(character_descriptions))
        .route("/relationships", post(create_relationship))
        .route(
            "/relationships/:id",
            get(relationship_detail).delete(delete_relationship),
        )
        .route(
            "/relationships/:id/descriptions",
            get(relationship_descriptions),
        )
        .route("/descriptions", post(create_description))
        .route(
            "/descriptions/:id",
            get(description_detail)
                .patch(update_description)
                .delete(delete_description),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Novel Recorder is alive".into(),
    })
}

#[axum::debug_handler]
async fn site_summary(State(state): State<AppState>) -> Json<SiteSummary> {
    Json(state.read().await.site_summary())
}

// Novels

#[axum::debug_handler]
async fn create_novel(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(draft): Json<NovelDraft>,
) -> ApiResult<Created<Novel>> {
    let novel = state
        .write(move |recorder| recorder.create_novel(&actor, draft))
        .await?;
    Ok(created(novel))
}

#[axum::debug_handler]
async fn public_novels(State(state): State<AppState>) -> Json<Vec<Novel>> {
    Json(state.read().await.public_novels())
}

#[axum::debug_handler]
async fn my_novels(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> ApiResult<Json<Vec<Novel>>> {
    Ok(Json(state.read().await.my_novels(&actor)?))
}

#[axum::debug_handler]
async fn novel_detail(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<NovelId>,
) -> ApiResult<Json<NovelDetail>> {
    Ok(Json(state.read().await.novel_detail(&actor, id)?))
}

#[axum::debug_handler]
async fn update_novel(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<NovelId>,
    Json(patch): Json<NovelPatch>,
) -> ApiResult<Json<Novel>> {
    let novel = state
        .write(move |recorder| recorder.update_novel(&actor, id, patch))
        .await?;
    Ok(Json(novel))
}

#[axum::debug_handler]
async fn delete_novel(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<NovelId>,
) -> ApiResult<StatusCode> {
    state
        .write(move |recorder| recorder.delete_novel(&actor, id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
async fn novel_characters(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<NovelId>,
) -> ApiResult<Json<Vec<CharacterCard>>> {
    Ok(Json(state.read().await.novel_characters(&actor, id)?))
}

// Permissions

#[axum::debug_handler]
async fn novel_permissions(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<NovelId>,
) -> ApiResult<Json<Vec<NovelUserPermission>>> {
    Ok(Json(state.read().await.novel_permissions(&actor, id)?))
}

#[axum::debug_handler]
async fn grant_permission(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<NovelId>,
    Json(grant): Json<PermissionGrant>,
) -> ApiResult<Json<NovelUserPermission>> {
    let permission = state
        .write(move |recorder| recorder.grant_permission(&actor, id, grant))
        .await?;
    Ok(Json(permission))
}

#[axum::debug_handler]
async fn revoke_permission(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((id, user)): Path<(NovelId, UserId)>,
) -> ApiResult<StatusCode> {
    state
        .write(move |recorder| recorder.revoke_permission(&actor, id, user))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// Characters

#[axum::debug_handler]
async fn create_character(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(draft): Json<CharacterDraft>,
) -> ApiResult<Created<Character>> {
    let character = state
        .write(move |recorder| recorder.create_character(&actor, draft))
        .await?;
    Ok(created(character))
}

#[axum::debug_handler]
async fn character_detail(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<CharacterId>,
) -> ApiResult<Json<CharacterDetail>> {
    Ok(Json(state.read().await.character_detail(&actor, id)?))
}

#[axum::debug_handler]
async fn rename_character(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<CharacterId>,
    Json(patch): Json<CharacterPatch>,
) -> ApiResult<Json<Character>> {
    let character = state
        .write(move |recorder| recorder.rename_character(&actor, id, patch.name))
        .await?;
    Ok(Json(character))
}

#[axum::debug_handler]
async fn delete_character(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<CharacterId>,
) -> ApiResult<StatusCode> {
    state
        .write(move |recorder| recorder.delete_character(&actor, id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
async fn character_relationships(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<CharacterId>,
) -> ApiResult<Json<Vec<RelationshipCard>>> {
    Ok(Json(state.read().await.character_relationships(&actor, id)?))
}

#[axum::debug_handler]
async fn character_descriptions(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<CharacterId>,
) -> ApiResult<Json<Vec<Description>>> {
    let owner = DescriptionOwner::Character(id);
    Ok(Json(state.read().await.owner_descriptions(&actor, owner)?))
}

// Relationships

#[axum::debug_handler]
async fn create_relationship(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(draft): Json<RelationshipDraft>,
) -> ApiResult<Created<Relationship>> {
    let relationship = state
        .write(move |recorder| recorder.create_relationship(&actor, draft))
        .await?;
    Ok(created(relationship))
}

#[axum::debug_handler]
async fn relationship_detail(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<RelationshipId>,
) -> ApiResult<Json<RelationshipDetail>> {
    Ok(Json(state.read().await.relationship_detail(&actor, id)?))
}

#[axum::debug_handler]
async fn delete_relationship(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<RelationshipId>,
) -> ApiResult<StatusCode> {
    state
        .write(move |recorder| recorder.delete_relationship(&actor, id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
async fn relationship_descriptions(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<RelationshipId>,
) -> ApiResult<Json<Vec<Description>>> {
    let owner = DescriptionOwner::Relationship(id);
    Ok(Json(state.read().await.owner_descriptions(&actor, owner)?))
}

// Descriptions

#[axum::debug_handler]
async fn create_description(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(draft): Json<DescriptionDraft>,
) -> ApiResult<Created<Description>> {
    let description = state
        .write(move |recorder| recorder.create_description(&actor, draft))
        .await?;
    Ok(created(description))
}

#[axum::debug_handler]
async fn description_detail(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<DescriptionId>,
) -> ApiResult<Json<DescriptionDetail>> {
    Ok(Json(state.read().await.description_detail(&actor, id)?))
}

#[axum::debug_handler]
async fn update_description(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<DescriptionId>,
    Json(patch): Json<DescriptionPatch>,
) -> ApiResult<Json<Description>> {
    let description = state
        .write(move |recorder| recorder.update_description(&actor, id, patch))
        .await?;
    Ok(Json(description))
}

#[axum::debug_handler]
async fn delete_description(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<DescriptionId>,
) -> ApiResult<StatusCode> {
    state
        .write(move |recorder| recorder.delete_description(&actor, id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
