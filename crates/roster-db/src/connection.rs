//! Connecting to SurrealDB over any supported engine.

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Where and as whom to connect.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Endpoint URL (`ws://127.0.0.1:8000`, `wss://…`, or `mem://`).
    pub url: String,
    /// Namespace holding the roster data.
    pub namespace: String,
    /// Database within the namespace.
    pub database: String,
    /// Root username. Sign-in is skipped unless both credentials are set.
    pub username: Option<String>,
    /// Root password.
    pub password: Option<String>,
}

impl DbConfig {
    /// An embedded, process-local database. Nothing is persisted.
    pub fn in_memory() -> Self {
        Self {
            url: "mem://".into(),
            ..Self::default()
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8000".into(),
            namespace: "roster".into(),
            database: "main".into(),
            username: None,
            password: None,
        }
    }
}

/// Shared SurrealDB client handle.
///
/// Established once at startup and cloned into whatever needs it; the
/// underlying client is reference counted.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Any>,
}

impl DbManager {
    /// Open the connection described by `config`.
    ///
    /// Signs in as root when credentials are configured, selects the
    /// namespace and database, and returns a ready-to-use manager.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Opening SurrealDB connection"
        );

        let db = any::connect(config.url.as_str()).await?;

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            db.signin(Root {
                username: username.clone(),
                password: password.clone(),
            })
            .await?;
        }

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!(namespace = %config.namespace, "SurrealDB connection ready");

        Ok(Self { db })
    }

    /// The client, for building repositories.
    pub fn client(&self) -> &Surreal<Any> {
        &self.db
    }

    /// Round-trip to the server to confirm it is answering.
    pub async fn health(&self) -> Result<(), surrealdb::Error> {
        self.db.health().await
    }
}
