//! Trip link endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::TripId;
use planner::CreateLink;
use serde::{Deserialize, Serialize};
use trip_store::{Link, TripStore};

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateLinkRequest {
    pub title: String,
    pub url: String,
}

#[derive(Serialize)]
pub struct LinkCreatedResponse {
    pub link_id: String,
}

#[derive(Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            id: link.id.to_string(),
            title: link.title,
            url: link.url,
        }
    }
}

#[derive(Serialize)]
pub struct LinksResponse {
    pub links: Vec<LinkResponse>,
}

/// POST /trips/:id/links: attach a link to a trip.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkCreatedResponse>), ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    let Json(req) = payload?;

    let link_id = state
        .planner
        .create_link(CreateLink::new(trip_id, req.title, req.url))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LinkCreatedResponse {
            link_id: link_id.to_string(),
        }),
    ))
}

/// GET /trips/:id/links: list a trip's links.
#[tracing::instrument(skip(state))]
pub async fn list<S: TripStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<LinksResponse>, ApiError> {
    let trip_id: TripId = parse_id(&id)?;
    let links = state.planner.list_links(trip_id).await?;

    Ok(Json(LinksResponse {
        links: links.into_iter().map(Into::into).collect(),
    }))
}
