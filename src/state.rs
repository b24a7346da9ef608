use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;
use crate::flights::repo::{FlightRepo, PgFlightRepo};
use crate::users::repo::{PgUserRepo, UserRepo};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub flights: Arc<dyn FlightRepo>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let users = Arc::new(PgUserRepo::new(db.clone())) as Arc<dyn UserRepo>;
        let flights = Arc::new(PgFlightRepo::new(db.clone())) as Arc<dyn FlightRepo>;

        Ok(Self {
            db,
            config,
            users,
            flights,
        })
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        flights: Arc<dyn FlightRepo>,
    ) -> Self {
        Self {
            db,
            config,
            users,
            flights,
        }
    }
}
