//! PostgreSQL-backed allowlist.
//!
//! One `tokio_postgres::Client` is shared by every caller; the client
//! pipelines concurrent queries itself. The lock only guards swapping in a
//! fresh client after the connection task has ended; the healthy path takes
//! a shared read guard just long enough to clone the `Arc`.

use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};

use brove_core::error::{BroveError, Result};
use brove_core::PubKey;

use super::{AllowlistEntry, AllowlistStore};

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS allowed_pubkeys (
    pubkey VARCHAR(64) PRIMARY KEY,
    reason TEXT,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

const INSERT: &str =
    "INSERT INTO allowed_pubkeys (pubkey, reason) VALUES ($1, $2) ON CONFLICT (pubkey) DO NOTHING";
const DELETE: &str = "DELETE FROM allowed_pubkeys WHERE pubkey = $1";
const EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM allowed_pubkeys WHERE pubkey = $1)";
// pubkey breaks ties between rows stamped in the same microsecond
const SELECT_ALL: &str =
    "SELECT pubkey, reason, created_at FROM allowed_pubkeys ORDER BY created_at ASC, pubkey ASC";

pub struct PgAllowlist {
    database_url: String,
    client: RwLock<Arc<Client>>,
}

fn storage(what: String) -> impl FnOnce(tokio_postgres::Error) -> BroveError {
    move |e| BroveError::Connectivity(format!("{what}: {e}"))
}

async fn open_client(database_url: &str) -> Result<Client> {
    let (client, conn) = tokio_postgres::connect(database_url, NoTls)
        .await
        .map_err(storage("failed to open database connection".into()))?;

    // drive the connection in background
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::error!(error = %e, "allowlist database connection closed");
        }
    });

    Ok(client)
}

impl PgAllowlist {
    /// Connect, verify connectivity, and create the table if needed.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let client = open_client(database_url).await?;
        let store = Self {
            database_url: database_url.to_string(),
            client: RwLock::new(Arc::new(client)),
        };
        store.health_check().await?;
        store
            .client()
            .await?
            .batch_execute(CREATE_TABLE)
            .await
            .map_err(storage("failed to create allowed_pubkeys table".into()))?;

        tracing::info!("allowlist store ready (postgres)");
        Ok(store)
    }

    /// Current client, reconnecting first if the connection has ended.
    ///
    /// A failed reconnect is returned as `Connectivity`; the next call tries
    /// again.
    async fn client(&self) -> Result<Arc<Client>> {
        {
            let client = self.client.read().await;
            if !client.is_closed() {
                return Ok(Arc::clone(&client));
            }
        }

        let mut client = self.client.write().await;
        // another caller may have reconnected while we waited
        if client.is_closed() {
            tracing::warn!("allowlist database connection lost, reconnecting");
            *client = Arc::new(open_client(&self.database_url).await?);
            tracing::info!("allowlist database connection restored");
        }
        Ok(Arc::clone(&client))
    }
}

#[async_trait]
impl AllowlistStore for PgAllowlist {
    async fn add(&self, pubkey: &PubKey, reason: &str) -> Result<()> {
        pubkey.validate()?;
        self.client()
            .await?
            .execute(INSERT, &[&pubkey.as_str(), &reason])
            .await
            .map_err(storage(format!("failed to add allowed pubkey {pubkey}")))?;
        Ok(())
    }

    async fn remove(&self, pubkey: &PubKey) -> Result<()> {
        pubkey.validate()?;
        let affected = self
            .client()
            .await?
            .execute(DELETE, &[&pubkey.as_str()])
            .await
            .map_err(storage(format!("failed to remove allowed pubkey {pubkey}")))?;
        if affected == 0 {
            return Err(BroveError::NotFound(pubkey.to_string()));
        }
        Ok(())
    }

    async fn contains(&self, pubkey: &PubKey) -> Result<bool> {
        if pubkey.is_empty() {
            return Ok(false);
        }
        let row = self
            .client()
            .await?
            .query_one(EXISTS, &[&pubkey.as_str()])
            .await
            .map_err(storage(format!("failed to check if pubkey {pubkey} is allowed")))?;
        row.try_get(0)
            .map_err(storage(format!("failed to read allowlist row for {pubkey}")))
    }

    async fn entries(&self) -> Result<Vec<AllowlistEntry>> {
        let rows = self
            .client()
            .await?
            .query(SELECT_ALL, &[])
            .await
            .map_err(storage("failed to query allowed pubkeys".into()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let pubkey: String = row
                .try_get(0)
                .map_err(storage("failed to scan pubkey row".into()))?;
            let reason: Option<String> = row
                .try_get(1)
                .map_err(storage("failed to scan pubkey row".into()))?;
            let created_at: Option<SystemTime> = row
                .try_get(2)
                .map_err(storage("failed to scan pubkey row".into()))?;
            out.push(AllowlistEntry {
                pubkey: PubKey::new(pubkey),
                reason: reason.unwrap_or_default(),
                created_at: created_at.unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
        Ok(out)
    }

    async fn health_check(&self) -> Result<()> {
        self.client()
            .await?
            .simple_query("SELECT 1")
            .await
            .map_err(storage("database ping failed".into()))?;
        Ok(())
    }
}
