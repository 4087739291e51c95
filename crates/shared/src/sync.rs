//! Keeps indicators, labels and the assignment menu in step with the map,
//! the viewport and the roster.

use serde::Serialize;

use crate::assignment::slot_number;
use crate::config::PreviewConfig;
use crate::letterbox::Letterbox;
use crate::models::{MapGeometry, Player, Point, Rgb, Roster, RosterRef, Viewport};
use crate::slots::{SlotRegistry, MAX_STARTING_LOCATIONS};

/// An overlay marker after projection into control space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOverlay {
    pub name: String,
    /// Top-left corner in control space.
    pub position: Point,
    pub width: i32,
    pub height: i32,
}

/// One entry of the assignment menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub text: String,
    pub color: Rgb,
    pub selectable: bool,
    pub target: RosterRef,
}

/// `"[A] "` for team 1, `"[B] "` for team 2 and so on; nothing for team 0.
pub fn team_prefix(team_id: u8) -> String {
    match team_id {
        1..=26 => format!("[{}] ", (b'A' + team_id - 1) as char),
        _ => String::new(),
    }
}

pub fn display_name(player: &Player) -> String {
    format!("{}{}", team_prefix(player.team_id), player.name)
}

/// Recompute the letterbox and place or hide every indicator.
///
/// With no map, or a map/viewport with no usable area, every indicator is
/// disabled. Anchors beyond the arena capacity are dropped.
pub fn sync_geometry(
    slots: &mut SlotRegistry,
    geometry: Option<&MapGeometry>,
    viewport: Viewport,
) -> (Option<Letterbox>, Vec<PlacedOverlay>) {
    let Some(geometry) = geometry else {
        slots.disable_from(0);
        return (None, Vec::new());
    };
    let Some(letterbox) =
        Letterbox::compute(geometry.preview_width, geometry.preview_height, viewport)
    else {
        tracing::debug!(?viewport, "preview has no usable area");
        slots.disable_from(0);
        return (None, Vec::new());
    };

    let live = geometry.anchors.len().min(MAX_STARTING_LOCATIONS);
    if geometry.anchors.len() > MAX_STARTING_LOCATIONS {
        tracing::warn!(
            anchors = geometry.anchors.len(),
            "map has more starting locations than the preview can show"
        );
    }

    slots.disable_from(live);
    for (slot, anchor) in geometry.anchors.iter().take(live).enumerate() {
        slots.set_anchor_screen_position(slot, letterbox.map_point(*anchor));
        slots.set_visible(slot, true);
    }

    let overlays = geometry
        .overlays
        .iter()
        .map(|o| PlacedOverlay {
            name: o.name.clone(),
            position: letterbox.map_centered(o.point, o.width, o.height),
            width: o.width,
            height: o.height,
        })
        .collect();

    (Some(letterbox), overlays)
}

/// Rebuild occupant lists and their label lines from one roster pass.
pub fn sync_labels(slots: &mut SlotRegistry, roster: &Roster) {
    slots.rebuild_occupants(roster);
    for indicator in slots.indicators_mut() {
        indicator.label = indicator
            .occupants
            .iter()
            .filter_map(|r| roster.get(*r))
            .map(display_name)
            .collect();
    }
}

fn is_selectable(player: &Player, target: Option<u8>, config: &PreviewConfig) -> bool {
    let on_target = target.is_some_and(|n| player.starting_location == n);
    !on_target && config.is_playable_side(player.side_id)
}

/// Build the numbered assignment menu, humans then AI.
///
/// `slot` is the slot the menu is opened for, if any; players already on it
/// are not selectable.
pub fn build_menu_items(roster: &Roster, config: &PreviewConfig, slot: Option<usize>) -> Vec<MenuItem> {
    let target = slot.and_then(slot_number);
    roster
        .iter()
        .enumerate()
        .map(|(i, (r, player))| MenuItem {
            text: format!("{}. {}", i + 1, display_name(player)),
            color: config.color_for(player.color_id),
            selectable: is_selectable(player, target, config),
            target: r,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Overlay;

    fn geometry(anchors: Vec<Point>) -> MapGeometry {
        MapGeometry {
            preview_width: 600,
            preview_height: 300,
            anchors,
            enforce_max_players: true,
            overlays: vec![],
        }
    }

    #[test]
    fn test_team_prefix() {
        assert_eq!(team_prefix(0), "");
        assert_eq!(team_prefix(1), "[A] ");
        assert_eq!(team_prefix(4), "[D] ");
        assert_eq!(team_prefix(26), "[Z] ");
        assert_eq!(team_prefix(27), "");
    }

    #[test]
    fn test_sync_geometry_places_live_anchors() {
        let mut slots = SlotRegistry::new();
        let geo = geometry(vec![Point::new(0, 0), Point::new(600, 300)]);
        let (lb, _) = sync_geometry(&mut slots, Some(&geo), Viewport::new(300, 300));
        let lb = lb.unwrap();

        assert_eq!(slots.enabled_count(), 2);
        assert_eq!(slots.indicator(0).unwrap().position, lb.rect.origin());
        assert_eq!(
            slots.indicator(1).unwrap().position,
            Point::new(lb.rect.right(), lb.rect.bottom())
        );
        assert!(!slots.indicator(2).unwrap().visible);
    }

    #[test]
    fn test_sync_geometry_shrinking_map_disables_tail() {
        let mut slots = SlotRegistry::new();
        let vp = Viewport::new(300, 300);
        let big = geometry((0..6).map(|i| Point::new(i * 10, i * 10)).collect());
        sync_geometry(&mut slots, Some(&big), vp);
        assert_eq!(slots.enabled_count(), 6);

        let small = geometry(vec![Point::new(5, 5)]);
        sync_geometry(&mut slots, Some(&small), vp);
        assert_eq!(slots.enabled_count(), 1);
    }

    #[test]
    fn test_sync_geometry_drops_anchors_beyond_capacity() {
        let mut slots = SlotRegistry::new();
        let geo = geometry((0..11).map(|i| Point::new(i * 10, 0)).collect());
        sync_geometry(&mut slots, Some(&geo), Viewport::new(300, 300));
        assert_eq!(slots.enabled_count(), MAX_STARTING_LOCATIONS);
    }

    #[test]
    fn test_sync_geometry_without_map_disables_everything() {
        let mut slots = SlotRegistry::new();
        let geo = geometry(vec![Point::new(0, 0)]);
        sync_geometry(&mut slots, Some(&geo), Viewport::new(300, 300));

        let (lb, overlays) = sync_geometry(&mut slots, None, Viewport::new(300, 300));
        assert!(lb.is_none());
        assert!(overlays.is_empty());
        assert_eq!(slots.enabled_count(), 0);
        assert!(slots.iter().all(|i| !i.visible));
    }

    #[test]
    fn test_sync_geometry_collapsed_viewport_disables_everything() {
        let mut slots = SlotRegistry::new();
        let geo = geometry(vec![Point::new(0, 0)]);
        let (lb, _) = sync_geometry(&mut slots, Some(&geo), Viewport::new(0, 0));
        assert!(lb.is_none());
        assert_eq!(slots.enabled_count(), 0);
    }

    #[test]
    fn test_sync_geometry_places_overlays_centred() {
        let mut slots = SlotRegistry::new();
        let mut geo = geometry(vec![]);
        geo.preview_width = 100;
        geo.preview_height = 100;
        geo.overlays.push(Overlay {
            name: "oil".to_string(),
            point: Point::new(50, 50),
            width: 10,
            height: 10,
        });
        let (_, overlays) = sync_geometry(&mut slots, Some(&geo), Viewport::new(102, 102));
        assert_eq!(overlays[0].position, Point::new(46, 46));
    }

    #[test]
    fn test_sync_labels_matches_starting_locations() {
        let roster = Roster::new(
            vec![Player::new("Alice").with_team(1).at(1), Player::new("Bob").at(3)],
            vec![Player::new("AI-1").with_team(2).at(1)],
        );
        let mut slots = SlotRegistry::new();
        sync_labels(&mut slots, &roster);
        assert_eq!(slots.indicator(0).unwrap().label, vec!["[A] Alice", "[B] AI-1"]);
        assert_eq!(slots.indicator(2).unwrap().label, vec!["Bob"]);
        assert!(slots.indicator(1).unwrap().label.is_empty());
    }

    #[test]
    fn test_menu_items_numbered_with_team_prefix() {
        let roster = Roster::new(
            vec![Player::new("Alice").with_team(1), Player::new("Bob")],
            vec![Player::new("AI-1").with_team(3)],
        );
        let items = build_menu_items(&roster, &PreviewConfig::default(), None);
        let texts: Vec<_> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["1. [A] Alice", "2. Bob", "3. [C] AI-1"]);
        assert_eq!(items[2].target, RosterRef::Ai(0));
    }

    #[test]
    fn test_menu_items_selectable_rules() {
        let roster = Roster::new(
            vec![Player::new("OnSlot").at(2), Player::new("Spectator").with_side(3)],
            vec![Player::new("AI-1").at(1)],
        );
        let items = build_menu_items(&roster, &PreviewConfig::default(), Some(1));
        assert!(!items[0].selectable);
        assert!(!items[1].selectable);
        assert!(items[2].selectable);
    }

    #[test]
    fn test_menu_items_colour_from_palette() {
        let cfg = PreviewConfig {
            palette: vec![Rgb { r: 10, g: 20, b: 30 }],
            ..Default::default()
        };
        let roster = Roster::new(vec![Player::new("A").with_color(1), Player::new("B")], vec![]);
        let items = build_menu_items(&roster, &cfg, None);
        assert_eq!(items[0].color, Rgb { r: 10, g: 20, b: 30 });
        assert_eq!(items[1].color, Rgb::WHITE);
    }

    #[test]
    fn test_menu_items_empty_roster() {
        let items = build_menu_items(&Roster::default(), &PreviewConfig::default(), Some(0));
        assert!(items.is_empty());
    }
}
