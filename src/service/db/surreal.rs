//! SurrealDB implementation for marong-bot pairing lookups.

use std::sync::Arc;

use async_trait::async_trait;
use surrealdb::{
    Surreal,
    engine::any::{self, Any},
    opt::auth::Root,
};
use tracing::{info, instrument};

use crate::base::{config::Config, types::Res};

use super::{DbClient, GenericDbClient, PairingRecord};

// Extra methods on `DbClient` applied by the surreal implementation.

impl DbClient {
    /// Connect to the configured SurrealDB endpoint.
    pub async fn surreal(config: &Config) -> Res<Self> {
        let client = SurrealDbClient::connect(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Specific implementations.

/// SurrealDB client implementation.
///
/// Ids are stored as strings: Discord snowflakes and group ids do not fit
/// SurrealDB's signed integers in every case.
#[derive(Clone)]
pub struct SurrealDbClient {
    db: Surreal<Any>,
}

impl SurrealDbClient {
    /// Connect, authenticate when credentials are configured, and define the schema.
    #[instrument(name = "SurrealDbClient::connect", skip_all)]
    pub async fn connect(config: &Config) -> Res<Self> {
        let db = any::connect(config.db_endpoint.as_str()).await?;

        if let (Some(username), Some(password)) = (&config.db_username, &config.db_password) {
            db.signin(Root { username, password }).await?;
        }

        db.use_ns(config.db_namespace.as_str()).use_db(config.db_database.as_str()).await?;

        let client = Self { db };
        client.define_schema().await?;

        info!("Database initialized successfully.");

        Ok(client)
    }

    /// In-memory database, used by tests and local runs.
    pub async fn memory() -> Res<Self> {
        let db = any::connect("mem://").await?;
        db.use_ns("marong").use_db("bot").await?;

        let client = Self { db };
        client.define_schema().await?;

        Ok(client)
    }

    async fn define_schema(&self) -> Res<()> {
        self.db
            .query(
                "DEFINE TABLE IF NOT EXISTS pairing SCHEMAFULL;
                 DEFINE FIELD IF NOT EXISTS group_id ON pairing TYPE string;
                 DEFINE FIELD IF NOT EXISTS week ON pairing TYPE int;
                 DEFINE FIELD IF NOT EXISTS requester_id ON pairing TYPE string;
                 DEFINE FIELD IF NOT EXISTS partner_nickname ON pairing TYPE string;
                 DEFINE INDEX IF NOT EXISTS pairing_lookup ON pairing FIELDS group_id, week, requester_id;",
            )
            .await?
            .check()?;

        Ok(())
    }

    /// Store a pairing record.
    #[instrument(skip(self))]
    pub async fn insert_pairing(&self, record: &PairingRecord) -> Res<()> {
        self.db
            .query("CREATE pairing SET group_id = $group_id, week = $week, requester_id = $requester_id, partner_nickname = $partner_nickname")
            .bind(("group_id", record.group_id.to_string()))
            .bind(("week", i64::from(record.week)))
            .bind(("requester_id", record.requester_id.to_string()))
            .bind(("partner_nickname", record.partner_nickname.clone()))
            .await?
            .check()?;

        Ok(())
    }
}

#[async_trait]
impl GenericDbClient for SurrealDbClient {
    #[instrument(skip(self))]
    async fn lookup_pairing(&self, requester_id: u64, group_id: u64, week: u32) -> Res<Option<String>> {
        let mut response = self
            .db
            .query("SELECT VALUE partner_nickname FROM pairing WHERE group_id = $group_id AND week = $week AND requester_id = $requester_id LIMIT 1")
            .bind(("group_id", group_id.to_string()))
            .bind(("week", i64::from(week)))
            .bind(("requester_id", requester_id.to_string()))
            .await?;

        let nickname: Option<String> = response.take(0)?;

        Ok(nickname)
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    fn record(week: u32, requester_id: u64, partner: &str) -> PairingRecord {
        PairingRecord {
            group_id: 3,
            week,
            requester_id,
            partner_nickname: partner.to_string(),
        }
    }

    #[tokio::test]
    async fn lookup_finds_matching_week() {
        let db = SurrealDbClient::memory().await.unwrap();
        db.insert_pairing(&record(1, 100, "밤톨")).await.unwrap();
        db.insert_pairing(&record(2, 100, "도토리")).await.unwrap();

        assert_eq!(db.lookup_pairing(100, 3, 2).await.unwrap(), Some("도토리".to_string()));
    }

    #[tokio::test]
    async fn lookup_returns_none_without_record() {
        let db = SurrealDbClient::memory().await.unwrap();
        db.insert_pairing(&record(1, 100, "밤톨")).await.unwrap();

        assert_eq!(db.lookup_pairing(100, 3, 5).await.unwrap(), None);
        assert_eq!(db.lookup_pairing(200, 3, 1).await.unwrap(), None);
        assert_eq!(db.lookup_pairing(100, 4, 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn large_snowflakes_round_trip() {
        let db = SurrealDbClient::memory().await.unwrap();
        let requester = u64::MAX - 1;
        db.insert_pairing(&record(1, requester, "큰수")).await.unwrap();

        assert_eq!(db.lookup_pairing(requester, 3, 1).await.unwrap(), Some("큰수".to_string()));
    }
}
