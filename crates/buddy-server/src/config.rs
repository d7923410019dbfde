//! Server Configuration

/// Settings read from the environment (after `.env` is loaded)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Credits granted on registration
    pub starting_credits: u32,

    /// Model used for flashcard generation
    pub model: String,

    /// Directory holding the built WASM frontend
    pub static_dir: String,

    /// Public origin for checkout return URLs; derived from `Host` when unset
    pub public_url: Option<String>,

    /// `SQLite` URL for accounts and cached decks; in-memory stores when unset
    pub database_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            starting_credits: 3,
            model: "llama3.2".into(),
            static_dir: "static".into(),
            public_url: None,
            database_url: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            starting_credits: lookup("STARTING_CREDITS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.starting_credits),
            model: lookup("FLASHCARD_MODEL").unwrap_or(defaults.model),
            static_dir: lookup("STATIC_DIR").unwrap_or(defaults.static_dir),
            public_url: lookup("PUBLIC_URL").filter(|v| !v.is_empty()),
            database_url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.starting_credits, 3);
        assert!(config.public_url.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let env: HashMap<&str, &str> = [
            ("STARTING_CREDITS", "10"),
            ("FLASHCARD_MODEL", "mistral"),
            ("PUBLIC_URL", "https://buddy.example"),
            ("DATABASE_URL", "sqlite://buddy.db"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_lookup(|k| env.get(k).map(ToString::to_string));
        assert_eq!(config.starting_credits, 10);
        assert_eq!(config.model, "mistral");
        assert_eq!(config.public_url.as_deref(), Some("https://buddy.example"));
        assert_eq!(config.database_url.as_deref(), Some("sqlite://buddy.db"));
    }

    #[test]
    fn test_bad_number_falls_back() {
        let config = ServerConfig::from_lookup(|k| (k == "STARTING_CREDITS").then(|| "many".into()));
        assert_eq!(config.starting_credits, 3);
    }
}
