use anyhow::Context;
use time::{format_description::FormatItem, macros::format_description, UtcOffset};

const OFFSET_FORMAT: &[FormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs the service against the in-memory store.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    /// Fixed zone every class time is normalized to.
    pub class_offset: UtcOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "fitbook".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "fitbook-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };
        let class_offset = match std::env::var("CLASS_UTC_OFFSET") {
            Ok(raw) => parse_offset(&raw)?,
            Err(_) => default_class_offset(),
        };
        Ok(Self {
            database_url,
            jwt,
            class_offset,
        })
    }
}

/// Asia/Kolkata, which observes no DST.
pub fn default_class_offset() -> UtcOffset {
    time::macros::offset!(+5:30)
}

pub fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    UtcOffset::parse(raw.trim(), OFFSET_FORMAT)
        .with_context(|| format!("invalid CLASS_UTC_OFFSET {raw:?}, expected e.g. +05:30"))
}
