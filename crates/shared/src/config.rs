use serde::{Deserialize, Serialize};

use crate::models::Rgb;

/// Preview behaviour and layout settings, usually read from `preview.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewConfig {
    /// Skirmish games and hosted online games assign slots through a menu;
    /// everyone else claims their own slot directly.
    pub context_menu_enabled: bool,
    pub start_location_selection_enabled: bool,
    /// Sides a player may pick to actually play.
    pub playable_side_count: u8,
    /// Random-side selectors listed after the playable sides.
    pub random_selector_count: u8,
    /// Edge length of the square starting-location indicator.
    pub indicator_size: i32,
    pub menu_width: i32,
    pub menu_item_height: i32,
    /// Player colours; `color_id` N uses entry N-1.
    pub palette: Vec<Rgb>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            context_menu_enabled: false,
            start_location_selection_enabled: true,
            playable_side_count: 2,
            random_selector_count: 1,
            indicator_size: 24,
            menu_width: 150,
            menu_item_height: 18,
            palette: Vec::new(),
        }
    }
}

impl PreviewConfig {
    pub fn color_for(&self, color_id: u8) -> Rgb {
        (color_id as usize)
            .checked_sub(1)
            .and_then(|i| self.palette.get(i))
            .copied()
            .unwrap_or(Rgb::WHITE)
    }

    pub fn is_playable_side(&self, side_id: u8) -> bool {
        (side_id as u16) < self.playable_side_count as u16 + self.random_selector_count as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: PreviewConfig = serde_json::from_str(r#"{"contextMenuEnabled": true}"#).unwrap();
        assert!(cfg.context_menu_enabled);
        assert!(cfg.start_location_selection_enabled);
        assert_eq!(cfg.menu_width, 150);
    }

    #[test]
    fn test_color_for() {
        let cfg = PreviewConfig {
            palette: vec![Rgb { r: 255, g: 0, b: 0 }],
            ..Default::default()
        };
        assert_eq!(cfg.color_for(0), Rgb::WHITE);
        assert_eq!(cfg.color_for(1), Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(cfg.color_for(2), Rgb::WHITE);
    }

    #[test]
    fn test_playable_sides_include_random_selectors() {
        let cfg = PreviewConfig::default();
        assert!(cfg.is_playable_side(0));
        assert!(cfg.is_playable_side(2));
        // spectator
        assert!(!cfg.is_playable_side(3));
    }
}
