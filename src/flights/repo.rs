use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One security question with its answer, embedded in the flight document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Flight record in the database. `qa` always holds exactly five pairs;
/// the boundary rejects anything else before it reaches storage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Flight {
    pub id: Uuid,
    pub title: String,
    pub from_country: String,
    pub to_country: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub user_id: Uuid,
    pub qa: Json<Vec<QaPair>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated flight fields as they arrive from the boundary. The owner is
/// passed separately; it comes from the authenticated identity, never the
/// request body.
#[derive(Debug)]
pub struct NewFlight {
    pub title: String,
    pub from_country: String,
    pub to_country: String,
    pub date: OffsetDateTime,
    pub qa: Vec<QaPair>,
}

#[async_trait]
pub trait FlightRepo: Send + Sync {
    async fn create(&self, user_id: Uuid, flight: NewFlight) -> anyhow::Result<Flight>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Flight>>;
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Flight>>;
    /// Returns false when no row matched the id.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgFlightRepo {
    db: PgPool,
}

impl PgFlightRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FlightRepo for PgFlightRepo {
    async fn create(&self, user_id: Uuid, flight: NewFlight) -> anyhow::Result<Flight> {
        let created = sqlx::query_as::<_, Flight>(
            r#"
            INSERT INTO flights (title, from_country, to_country, date, user_id, qa)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, from_country, to_country, date, user_id, qa, created_at
            "#,
        )
        .bind(&flight.title)
        .bind(&flight.from_country)
        .bind(&flight.to_country)
        .bind(flight.date)
        .bind(user_id)
        .bind(Json(flight.qa))
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Flight>> {
        let flight = sqlx::query_as::<_, Flight>(
            r#"
            SELECT id, title, from_country, to_country, date, user_id, qa, created_at
            FROM flights
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(flight)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Flight>> {
        let flights = sqlx::query_as::<_, Flight>(
            r#"
            SELECT id, title, from_country, to_country, date, user_id, qa, created_at
            FROM flights
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(flights)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM flights WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-memory implementation backing service-level tests.
#[cfg(test)]
pub mod mem {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryFlightRepo {
        flights: Mutex<Vec<Flight>>,
    }

    #[async_trait]
    impl FlightRepo for MemoryFlightRepo {
        async fn create(&self, user_id: Uuid, flight: NewFlight) -> anyhow::Result<Flight> {
            let created = Flight {
                id: Uuid::new_v4(),
                title: flight.title,
                from_country: flight.from_country,
                to_country: flight.to_country,
                date: flight.date,
                user_id,
                qa: Json(flight.qa),
                created_at: OffsetDateTime::now_utc(),
            };
            self.flights.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Flight>> {
            Ok(self
                .flights
                .lock()
                .unwrap()
                .iter()
                .find(|f| f.id == id)
                .cloned())
        }

        async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Flight>> {
            Ok(self
                .flights
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
            let mut flights = self.flights.lock().unwrap();
            let before = flights.len();
            flights.retain(|f| f.id != id);
            Ok(flights.len() < before)
        }
    }
}
