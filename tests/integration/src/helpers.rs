//! Test helpers for integration tests
//!
//! Spawns a server on an ephemeral port, seeds the guild directory and
//! mints access tokens with the configured secret.

use std::net::SocketAddr;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Result;
use feed_api::{create_app, create_app_state};
use feed_common::{AppConfig, JwtService};
use feed_core::{MemberRole, Snowflake, SnowflakeGenerator};
use feed_db::{create_pool, DatabaseConfig, PgPool};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Ids for seeded guilds and users; a worker id the server never uses
pub fn test_snowflake() -> Snowflake {
    static GENERATOR: LazyLock<SnowflakeGenerator> =
        LazyLock::new(|| SnowflakeGenerator::new(1000));
    GENERATOR.generate()
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pool: PgPool,
    jwt: JwtService,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(&config).await?;
        let app = create_app(state, &config)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // separate pool for seeding the directory tables
        let pool = create_pool(&DatabaseConfig::from(&config.database)).await?;
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            pool,
            jwt,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Insert a guild into the directory
    pub async fn seed_guild(&self, public_read: bool) -> Result<Snowflake> {
        let guild_id = test_snowflake();
        sqlx::query("INSERT INTO guilds (id, name, public_read) VALUES ($1, $2, $3)")
            .bind(guild_id.into_inner())
            .bind(format!("guild {guild_id}"))
            .bind(public_read)
            .execute(&self.pool)
            .await?;
        Ok(guild_id)
    }

    /// Insert an active member and return their id with a signed token
    pub async fn seed_member(
        &self,
        guild_id: Snowflake,
        role: MemberRole,
    ) -> Result<(Snowflake, String)> {
        let user_id = test_snowflake();
        sqlx::query(
            r#"
            INSERT INTO guild_members (guild_id, user_id, display_name, role, status, reputation)
            VALUES ($1, $2, $3, $4, 'active', 0)
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(user_id.into_inner())
        .bind(format!("member {user_id}"))
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;

        let token = self.jwt.issue_access_token(user_id)?;
        Ok((user_id, token))
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.put(&url).bearer_auth(token).send().await?)
    }
}

/// Configuration from the environment (and `.env`)
pub fn test_config() -> Result<AppConfig> {
    dotenvy::dotenv().ok();
    AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Whether the backing services are configured; tests return early if not
pub async fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET", "API_PORT"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
