use std::path::PathBuf;

/// Process settings, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub assets_dir: PathBuf,
    pub db_path: PathBuf,
    pub port: u16,
    pub local_player: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let port = get("PORT").and_then(|p| p.parse().ok()).unwrap_or(3000);
        ServerConfig {
            assets_dir: PathBuf::from(get("ASSETS_DIR").unwrap_or_else(|| "assets".to_string())),
            db_path: PathBuf::from(
                get("DB_PATH").unwrap_or_else(|| "data/setups.redb".to_string()),
            ),
            port,
            local_player: get("LOCAL_PLAYER").unwrap_or_else(|| "Player".to_string()),
        }
    }
}
