use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// When set, issued tokens carry an `exp` claim and verification
    /// enforces it. Unset by default: tokens do not expire.
    pub ttl_minutes: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://postgres@localhost/sequencer".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").unwrap_or_else(|_| "my-jwt-secret-only".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok()),
        };
        Ok(Self { database_url, jwt })
    }
}
