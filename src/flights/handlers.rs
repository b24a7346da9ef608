use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateFlightRequest, CreateFlightResponse, MessageResponse};
use super::repo::Flight;
use super::service;
use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn flight_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/flights",
            get(list_flights).post(create_flight),
        )
        .route(
            "/flights/:id",
            get(get_flight).delete(delete_flight),
        )
}

#[instrument(skip(state, payload))]
async fn create_flight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateFlightRequest>,
) -> Result<Json<CreateFlightResponse>, ApiError> {
    let new_flight = payload.validate()?;

    let flight = service::add_flight(state.flights.as_ref(), user_id, new_flight).await?;

    info!(user_id = %user_id, flight_id = %flight.id, "flight created");
    Ok(Json(CreateFlightResponse {
        message: "flight created successfully".into(),
        flight,
    }))
}

#[instrument(skip(state))]
async fn get_flight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Flight>, ApiError> {
    let flight = service::fetch_flight(state.flights.as_ref(), user_id, id).await?;
    Ok(Json(flight))
}

#[instrument(skip(state))]
async fn list_flights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Flight>>, ApiError> {
    let flights = service::list_flights(state.flights.as_ref(), user_id).await?;
    Ok(Json(flights))
}

#[instrument(skip(state))]
async fn delete_flight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    service::delete_flight(state.flights.as_ref(), user_id, id).await?;
    info!(user_id = %user_id, flight_id = %id, "flight deleted");
    Ok(Json(MessageResponse {
        message: "flight deleted successfully".into(),
    }))
}
