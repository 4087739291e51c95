use std::sync::{Arc, Mutex};

use skirmish_shared::models::{GameMap, LobbySetup, Point};
use skirmish_shared::{MapGeometry, MapPreview, Player, PreviewConfig, PreviewEvent, Roster, Viewport};

use crate::error::LobbyError;

pub type SharedLobby = Arc<Mutex<Lobby>>;

/// Default preview control size until the client reports its own.
pub const DEFAULT_VIEWPORT: Viewport = Viewport::new(400, 300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
}

/// One lobby session: owns the roster and feeds it to the map preview.
pub struct Lobby {
    roster: Roster,
    preview: MapPreview,
    map: Option<GameMap>,
}

impl Lobby {
    pub fn new(config: PreviewConfig, local_player: &str) -> Self {
        let roster = Roster::new(vec![Player::new(local_player)], Vec::new());
        let mut preview = MapPreview::new(config, local_player, DEFAULT_VIEWPORT);
        preview.refresh_roster(&roster);
        Lobby {
            roster,
            preview,
            map: None,
        }
    }

    pub fn shared(self) -> SharedLobby {
        Arc::new(Mutex::new(self))
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn preview(&self) -> &MapPreview {
        &self.preview
    }

    pub fn map(&self) -> Option<&GameMap> {
        self.map.as_ref()
    }

    pub fn select_map(&mut self, map: Option<GameMap>) {
        let geometry = map.as_ref().map(MapGeometry::from_source);
        tracing::info!(
            map = map.as_ref().map(|m| m.file_name.as_str()).unwrap_or("<none>"),
            "Map selected"
        );
        self.map = map;
        self.preview.set_map(geometry, &self.roster);
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.preview.resize(Viewport::new(width, height), &self.roster);
    }

    pub fn set_context_menu_enabled(&mut self, enabled: bool) {
        self.preview.set_context_menu_enabled(enabled);
    }

    pub fn add_player(&mut self, player: Player, ai: bool) -> Result<(), LobbyError> {
        if self.roster.iter().any(|(_, p)| p.name == player.name) {
            return Err(LobbyError::DuplicatePlayer(player.name));
        }
        tracing::info!(player = %player.name, ai, "Player joined");
        if ai {
            self.roster.ai_players.push(player);
        } else {
            self.roster.players.push(player);
        }
        self.preview.refresh_roster(&self.roster);
        Ok(())
    }

    pub fn remove_player(&mut self, name: &str) -> Result<(), LobbyError> {
        if name == self.preview.local_player() {
            return Err(LobbyError::LocalPlayerRemoval(name.to_string()));
        }
        let before = self.roster.len();
        self.roster.players.retain(|p| p.name != name);
        self.roster.ai_players.retain(|p| p.name != name);
        if self.roster.len() == before {
            return Err(LobbyError::UnknownPlayer(name.to_string()));
        }
        tracing::info!(player = name, "Player left");
        self.preview.refresh_roster(&self.roster);
        Ok(())
    }

    pub fn slot_primary(&mut self, slot: usize) -> Option<PreviewEvent> {
        let event = self.preview.on_slot_primary(&self.roster, slot);
        self.handle(event)
    }

    pub fn slot_secondary(&mut self, slot: usize) -> Option<PreviewEvent> {
        let event = self.preview.on_slot_secondary(&mut self.roster, slot);
        self.handle(event)
    }

    pub fn menu_select(&mut self, index: usize) -> Option<PreviewEvent> {
        let event = self.preview.on_menu_select(&mut self.roster, index);
        self.handle(event)
    }

    pub fn close_menu(&mut self) {
        self.preview.close_menu();
    }

    /// Route a raw click in preview-control coordinates to the indicator under it.
    pub fn click_at(&mut self, point: Point, button: Button) -> Option<PreviewEvent> {
        let slot = self.preview.hit_test(point)?;
        match button {
            Button::Primary => self.slot_primary(slot),
            Button::Secondary => self.slot_secondary(slot),
        }
    }

    fn handle(&mut self, event: Option<PreviewEvent>) -> Option<PreviewEvent> {
        match event? {
            PreviewEvent::LocalStartingLocationSelected(number) => {
                let local = self.preview.local_player().to_string();
                let Some(player) = self.roster.find_human_mut(&local) else {
                    tracing::warn!(player = %local, "local player missing from roster");
                    return None;
                };
                player.starting_location = number;
                tracing::info!(player = %local, slot = number, "Local starting location changed");
                self.preview.refresh_roster(&self.roster);
            }
            PreviewEvent::StartingLocationApplied => {
                tracing::info!("Starting locations applied");
            }
        }
        event
    }

    pub fn to_setup(&self, name: String, created_at: String) -> LobbySetup {
        LobbySetup {
            id: uuid::Uuid::new_v4(),
            name,
            map_file_name: self.map.as_ref().map(|m| m.file_name.clone()),
            roster: self.roster.clone(),
            created_at,
        }
    }

    /// Replace map and roster with a saved setup. The local player is kept in
    /// the roster even if the setup was saved by someone else.
    pub fn apply_setup(&mut self, setup: LobbySetup, map: Option<GameMap>) {
        self.roster = setup.roster;
        let local = self.preview.local_player().to_string();
        if self.roster.find_human(&local).is_none() {
            self.roster.players.insert(0, Player::new(local));
        }
        self.select_map(map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(enforce_max_players: bool) -> GameMap {
        GameMap {
            display_name: "Twin Peaks".to_string(),
            file_name: "twin_peaks".to_string(),
            preview_width: 400,
            preview_height: 300,
            starting_locations: vec![
                Point::new(40, 40),
                Point::new(360, 40),
                Point::new(40, 260),
                Point::new(360, 260),
            ],
            enforce_max_players,
            overlays: vec![],
        }
    }

    fn lobby(menu: bool) -> Lobby {
        let config = PreviewConfig {
            context_menu_enabled: menu,
            ..Default::default()
        };
        let mut lobby = Lobby::new(config, "Local");
        lobby.add_player(Player::new("Player-X"), false).unwrap();
        lobby.add_player(Player::new("AI-1"), true).unwrap();
        lobby.select_map(Some(map(true)));
        lobby
    }

    #[test]
    fn test_direct_claim_updates_local_player() {
        let mut lobby = lobby(false);
        let event = lobby.slot_primary(2);
        assert_eq!(event, Some(PreviewEvent::LocalStartingLocationSelected(3)));
        assert_eq!(lobby.roster().players[0].starting_location, 3);
        assert_eq!(lobby.preview().slots().indicator(2).unwrap().label, vec!["Local"]);
    }

    #[test]
    fn test_direct_release_clears_local_player() {
        let mut lobby = lobby(false);
        lobby.slot_primary(1);
        assert_eq!(
            lobby.slot_secondary(1),
            Some(PreviewEvent::LocalStartingLocationSelected(0))
        );
        assert_eq!(lobby.roster().players[0].starting_location, 0);
        assert!(lobby.preview().slots().indicator(1).unwrap().occupants.is_empty());
    }

    #[test]
    fn test_direct_claim_of_taken_slot_is_rejected() {
        let mut lobby = lobby(false);
        lobby.set_context_menu_enabled(true);
        lobby.slot_primary(0);
        lobby.menu_select(2);
        assert_eq!(lobby.roster().ai_players[0].starting_location, 1);

        lobby.set_context_menu_enabled(false);
        assert_eq!(lobby.slot_primary(0), None);
        assert_eq!(lobby.roster().players[0].starting_location, 0);
    }

    #[test]
    fn test_menu_assignment_through_clicks() {
        let mut lobby = lobby(true);
        let centre = lobby.preview().slots().indicator(3).unwrap().position;
        assert_eq!(lobby.click_at(centre, Button::Primary), None);
        assert!(lobby.preview().menu().open);

        assert_eq!(lobby.menu_select(1), Some(PreviewEvent::StartingLocationApplied));
        assert_eq!(lobby.roster().players[1].starting_location, 4);

        assert_eq!(
            lobby.click_at(centre, Button::Secondary),
            Some(PreviewEvent::StartingLocationApplied)
        );
        assert_eq!(lobby.roster().players[1].starting_location, 0);
    }

    #[test]
    fn test_click_outside_indicators_is_noop() {
        let mut lobby = lobby(true);
        assert_eq!(lobby.click_at(Point::new(200, 150), Button::Primary), None);
        assert!(!lobby.preview().menu().open);
    }

    #[test]
    fn test_add_duplicate_player_fails() {
        let mut lobby = lobby(false);
        let err = lobby.add_player(Player::new("AI-1"), false).unwrap_err();
        assert!(matches!(err, LobbyError::DuplicatePlayer(_)));
    }

    #[test]
    fn test_removed_player_disappears_from_slots() {
        let mut lobby = lobby(true);
        lobby.slot_primary(0);
        lobby.menu_select(1);
        assert_eq!(lobby.preview().slots().indicator(0).unwrap().occupants.len(), 1);

        lobby.remove_player("Player-X").unwrap();
        assert!(lobby.preview().slots().indicator(0).unwrap().occupants.is_empty());
        assert_eq!(lobby.preview().menu().items.len(), 2);
        assert!(matches!(
            lobby.remove_player("Player-X"),
            Err(LobbyError::UnknownPlayer(_))
        ));
    }

    #[test]
    fn test_setup_roundtrip_keeps_local_player() {
        let mut lobby = lobby(true);
        lobby.slot_primary(1);
        lobby.menu_select(2);
        let setup = lobby.to_setup("evening".to_string(), "2024-01-01T00:00:00Z".to_string());
        assert_eq!(setup.map_file_name.as_deref(), Some("twin_peaks"));

        let mut other = Lobby::new(PreviewConfig::default(), "Someone");
        other.apply_setup(setup, Some(map(true)));
        assert_eq!(other.roster().players[0].name, "Someone");
        assert_eq!(other.roster().ai_players[0].starting_location, 2);
        assert_eq!(other.preview().slots().indicator(1).unwrap().label, vec!["AI-1"]);
    }

    #[test]
    fn test_clearing_map_hides_indicators() {
        let mut lobby = lobby(false);
        lobby.select_map(None);
        assert_eq!(lobby.preview().slots().enabled_count(), 0);
        assert_eq!(lobby.slot_primary(0), None);
    }

    #[test]
    fn test_local_player_cannot_be_removed() {
        let mut lobby = lobby(false);
        assert!(matches!(
            lobby.remove_player("Local"),
            Err(LobbyError::LocalPlayerRemoval(_))
        ));
        assert!(lobby.roster().find_human("Local").is_some());
        assert_eq!(
            lobby.slot_primary(2),
            Some(PreviewEvent::LocalStartingLocationSelected(3))
        );
    }

    #[test]
    fn test_selection_without_local_player_reports_nothing() {
        let mut lobby = lobby(false);
        lobby.roster.players.retain(|p| p.name != "Local");
        lobby.preview.refresh_roster(&lobby.roster);
        assert_eq!(lobby.slot_primary(2), None);
        assert!(lobby.roster().iter().all(|(_, p)| p.starting_location == 0));
    }

    #[test]
    fn test_extreme_viewports_do_not_panic() {
        let mut lobby = lobby(true);
        lobby.resize(i32::MIN, 300);
        assert_eq!(lobby.preview().slots().enabled_count(), 0);
        assert_eq!(lobby.click_at(Point::new(0, 0), Button::Primary), None);

        lobby.resize(i32::MAX, i32::MAX);
        assert_eq!(lobby.preview().slots().enabled_count(), 4);
        let far = lobby.preview().slots().indicator(3).unwrap().position;
        assert_eq!(lobby.click_at(far, Button::Primary), None);
        assert!(lobby.preview().menu().open);
        assert_eq!(lobby.menu_select(2), Some(PreviewEvent::StartingLocationApplied));
        assert_eq!(lobby.roster().ai_players[0].starting_location, 4);
    }
}
