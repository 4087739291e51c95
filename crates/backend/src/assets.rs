use skirmish_shared::models::GameMap;
use skirmish_shared::PreviewConfig;
use std::path::Path;

use crate::error::LobbyError;

pub struct Assets {
    pub maps: Vec<GameMap>,
    pub preview: PreviewConfig,
}

impl Assets {
    /// Load `maps.json` (required) and `preview.json` (optional) from `assets_dir`.
    pub fn load(assets_dir: &Path) -> Result<Self, LobbyError> {
        let maps_path = assets_dir.join("maps.json");
        let maps_data = std::fs::read_to_string(&maps_path).map_err(|source| LobbyError::Io {
            path: maps_path.clone(),
            source,
        })?;
        let maps: Vec<GameMap> =
            serde_json::from_str(&maps_data).map_err(|source| LobbyError::Parse {
                file: "maps.json".to_string(),
                source,
            })?;

        let preview_path = assets_dir.join("preview.json");
        let preview = match std::fs::read_to_string(&preview_path) {
            Ok(data) => serde_json::from_str(&data).map_err(|source| LobbyError::Parse {
                file: "preview.json".to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PreviewConfig::default(),
            Err(source) => {
                return Err(LobbyError::Io {
                    path: preview_path,
                    source,
                })
            }
        };

        tracing::info!(
            maps = maps.len(),
            context_menu = preview.context_menu_enabled,
            "Loaded lobby assets"
        );

        Ok(Assets { maps, preview })
    }

    pub fn find_map_by_file_name(&self, file_name: &str) -> Option<&GameMap> {
        self.maps.iter().find(|m| m.file_name == file_name)
    }
}
