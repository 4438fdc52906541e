use anyhow::{Context, Result};
use axum::http::HeaderValue;
use platform_db::DatabaseSettings;

/// Local development frontends allowed to call the API with credentials.
const DEFAULT_CORS_ORIGINS: [&str; 6] = [
    "http://localhost:5173",
    "localhost:5173",
    "http://localhost:3000",
    "localhost:3000",
    "http://frontend",
    "http://frontend:80",
];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database = DatabaseSettings::from_env();
        database.database_url()?;

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|raw| parse_origins(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(default_origins);
        for origin in &cors_allowed_origins {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin {origin:?}"))?;
        }

        Ok(Self {
            database,
            cors_allowed_origins,
        })
    }
}

pub fn default_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blank_entries_dropped() {
        let parsed = parse_origins(" http://localhost:5173 ,, https://hr.example.com ,");
        assert_eq!(parsed, ["http://localhost:5173", "https://hr.example.com"]);
    }

    #[test]
    fn blank_list_yields_nothing() {
        assert!(parse_origins(" , ").is_empty());
    }

    #[test]
    fn defaults_cover_local_frontends() {
        let origins = default_origins();
        assert_eq!(origins.len(), 6);
        assert!(origins.iter().any(|o| o == "http://localhost:5173"));
        assert!(origins.iter().all(|o| HeaderValue::from_str(o).is_ok()));
    }
}
