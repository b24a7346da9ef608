use uuid::Uuid;

use super::repo::{Flight, FlightRepo, NewFlight};
use crate::error::ApiError;

pub async fn add_flight(
    repo: &dyn FlightRepo,
    user_id: Uuid,
    flight: NewFlight,
) -> Result<Flight, ApiError> {
    let created = repo.create(user_id, flight).await?;
    Ok(created)
}

/// Looks up a flight and enforces ownership. A missing flight is 404; an
/// existing flight owned by someone else is 403. The distinction is
/// deliberate: existence is revealed to non-owners.
pub async fn fetch_flight(
    repo: &dyn FlightRepo,
    user_id: Uuid,
    id: Uuid,
) -> Result<Flight, ApiError> {
    let Some(flight) = repo.find_by_id(id).await? else {
        return Err(ApiError::NotFound("flight"));
    };
    if flight.user_id != user_id {
        return Err(ApiError::Forbidden(
            "you do not have permission to access this flight",
        ));
    }
    Ok(flight)
}

pub async fn list_flights(repo: &dyn FlightRepo, user_id: Uuid) -> Result<Vec<Flight>, ApiError> {
    let flights = repo.list_by_user(user_id).await?;
    Ok(flights)
}

/// Same ownership check as `fetch_flight` before the row is removed.
pub async fn delete_flight(repo: &dyn FlightRepo, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
    fetch_flight(repo, user_id, id).await?;
    if !repo.delete(id).await? {
        return Err(ApiError::NotFound("flight"));
    }
    Ok(())
}
