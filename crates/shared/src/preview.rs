//! The map preview control: input dispatch for starting-location indicators.
//!
//! `MapPreview` never owns the roster. Every call that needs players borrows
//! the roster from its owner, and every roster mutation is followed by a full
//! label/menu sync before the call returns.

use crate::assignment;
use crate::config::PreviewConfig;
use crate::letterbox::Letterbox;
use crate::menu::{place_menu, ContextMenu};
use crate::models::{MapGeometry, Point, PreviewEvent, Rect, Roster, Viewport};
use crate::slots::SlotRegistry;
use crate::sync::{self, PlacedOverlay};

#[derive(Debug, Clone)]
pub struct MapPreview {
    config: PreviewConfig,
    local_player: String,
    viewport: Viewport,
    geometry: Option<MapGeometry>,
    letterbox: Option<Letterbox>,
    slots: SlotRegistry,
    overlays: Vec<PlacedOverlay>,
    menu: ContextMenu,
}

impl MapPreview {
    pub fn new(config: PreviewConfig, local_player: impl Into<String>, viewport: Viewport) -> Self {
        MapPreview {
            config,
            local_player: local_player.into(),
            viewport,
            geometry: None,
            letterbox: None,
            slots: SlotRegistry::new(),
            overlays: Vec::new(),
            menu: ContextMenu::default(),
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn local_player(&self) -> &str {
        &self.local_player
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn letterbox(&self) -> Option<&Letterbox> {
        self.letterbox.as_ref()
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn overlays(&self) -> &[PlacedOverlay] {
        &self.overlays
    }

    pub fn menu(&self) -> &ContextMenu {
        &self.menu
    }

    pub fn set_context_menu_enabled(&mut self, enabled: bool) {
        self.config.context_menu_enabled = enabled;
        if !enabled {
            self.menu.close();
        }
    }

    pub fn set_start_location_selection_enabled(&mut self, enabled: bool) {
        self.config.start_location_selection_enabled = enabled;
    }

    /// Replace the map (or clear it) and resync everything.
    pub fn set_map(&mut self, geometry: Option<MapGeometry>, roster: &Roster) {
        self.geometry = geometry;
        if self.geometry.is_none() {
            self.menu.close();
        }
        self.refresh_all(roster);
    }

    pub fn resize(&mut self, viewport: Viewport, roster: &Roster) {
        self.viewport = viewport;
        self.refresh_all(roster);
    }

    fn refresh_all(&mut self, roster: &Roster) {
        let (letterbox, overlays) =
            sync::sync_geometry(&mut self.slots, self.geometry.as_ref(), self.viewport);
        self.letterbox = letterbox;
        self.overlays = overlays;
        self.refresh_roster(roster);
    }

    /// Rebuild occupant labels and the menu after the roster changed.
    ///
    /// An open menu is rebuilt in place and stays at its last position, unless
    /// its slot has disappeared.
    pub fn refresh_roster(&mut self, roster: &Roster) {
        sync::sync_labels(&mut self.slots, roster);

        let open_slot = self
            .menu
            .slot
            .filter(|slot| self.menu.open && self.slots.is_enabled(*slot));
        self.menu.items = sync::build_menu_items(roster, &self.config, open_slot);

        match open_slot {
            Some(slot) => {
                let position = self.menu.position;
                self.menu.open_at(slot, position);
            }
            None => self.menu.close(),
        }
    }

    /// Control-space bounds of an enabled indicator, centred on its anchor.
    pub fn indicator_bounds(&self, slot: usize) -> Option<Rect> {
        let indicator = self.slots.indicator(slot).filter(|i| i.enabled)?;
        let size = self.config.indicator_size;
        Some(Rect::new(
            indicator.position.x.saturating_sub(size / 2),
            indicator.position.y.saturating_sub(size / 2),
            size,
            size,
        ))
    }

    /// The enabled indicator under `point`, lowest slot first.
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        (0..crate::slots::MAX_STARTING_LOCATIONS)
            .find(|slot| self.indicator_bounds(*slot).is_some_and(|b| b.contains(point)))
    }

    fn live_slot(&self, slot: usize) -> Option<&MapGeometry> {
        if !self.slots.is_enabled(slot) {
            tracing::debug!(slot, "activation on disabled slot ignored");
            return None;
        }
        self.geometry.as_ref()
    }

    /// Primary activation of an indicator.
    ///
    /// Direct mode asks for the local player to move to the slot; menu mode
    /// opens the assignment menu next to the indicator and raises nothing.
    pub fn on_slot_primary(&mut self, roster: &Roster, slot: usize) -> Option<PreviewEvent> {
        if !self.config.start_location_selection_enabled {
            return None;
        }
        let enforce = self.live_slot(slot)?.enforce_max_players;

        if !self.config.context_menu_enabled {
            return assignment::request_claim(roster, slot, enforce);
        }

        self.menu.items = sync::build_menu_items(roster, &self.config, Some(slot));
        let bounds = self.indicator_bounds(slot)?;
        let position = place_menu(
            bounds,
            self.config.menu_width,
            self.menu.height(self.config.menu_item_height),
            self.viewport,
        );
        self.menu.open_at(slot, position);
        tracing::debug!(slot, items = self.menu.items.len(), "assignment menu opened");
        None
    }

    /// Secondary activation of an indicator.
    ///
    /// Direct mode only lets the local player release their own slot; menu
    /// mode releases whoever holds it.
    pub fn on_slot_secondary(&mut self, roster: &mut Roster, slot: usize) -> Option<PreviewEvent> {
        self.live_slot(slot)?;

        if !self.config.context_menu_enabled {
            return assignment::request_release(roster, &self.local_player, slot);
        }

        let event = assignment::clear_slot(roster, slot);
        if event.is_some() {
            self.refresh_roster(roster);
        }
        event
    }

    /// Pick entry `index` of the open assignment menu.
    pub fn on_menu_select(&mut self, roster: &mut Roster, index: usize) -> Option<PreviewEvent> {
        let (slot, target) = match self.menu.selection(index) {
            Some((slot, item)) => (slot, item.target),
            None => {
                tracing::debug!(index, "menu selection ignored");
                return None;
            }
        };
        let enforce = self.live_slot(slot)?.enforce_max_players;

        self.menu.close();
        let event = assignment::assign(roster, slot, target, enforce);
        self.refresh_roster(roster);
        event
    }

    pub fn close_menu(&mut self) {
        self.menu.close();
    }
}
