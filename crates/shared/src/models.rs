use serde::{Deserialize, Serialize};
#[cfg(feature = "uuid-support")]
use uuid::Uuid;

/// Integer pixel coordinate, either in preview-image space or in control space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Edge-inclusive containment: a point on the far edge counts as inside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Size of the control the preview is drawn into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Viewport { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

/// A human or computer-controlled lobby member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    /// 0 = no team.
    #[serde(default)]
    pub team_id: u8,
    /// 0 = random colour.
    #[serde(default)]
    pub color_id: u8,
    #[serde(default)]
    pub side_id: u8,
    /// 0 = unassigned, otherwise a 1-based slot number.
    #[serde(default)]
    pub starting_location: u8,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            team_id: 0,
            color_id: 0,
            side_id: 0,
            starting_location: 0,
        }
    }

    pub fn with_team(mut self, team_id: u8) -> Self {
        self.team_id = team_id;
        self
    }

    pub fn with_color(mut self, color_id: u8) -> Self {
        self.color_id = color_id;
        self
    }

    pub fn with_side(mut self, side_id: u8) -> Self {
        self.side_id = side_id;
        self
    }

    pub fn at(mut self, starting_location: u8) -> Self {
        self.starting_location = starting_location;
        self
    }
}

/// Position of a player inside the roster: humans come first, then AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RosterRef {
    Human(usize),
    Ai(usize),
}

/// Human and AI players of the current match setup, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub players: Vec<Player>,
    pub ai_players: Vec<Player>,
}

impl Roster {
    pub fn new(players: Vec<Player>, ai_players: Vec<Player>) -> Self {
        Roster {
            players,
            ai_players,
        }
    }

    pub fn len(&self) -> usize {
        self.players.len() + self.ai_players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Humans then AI, each paired with its roster reference.
    pub fn iter(&self) -> impl Iterator<Item = (RosterRef, &Player)> {
        let humans = self
            .players
            .iter()
            .enumerate()
            .map(|(i, p)| (RosterRef::Human(i), p));
        let ai = self
            .ai_players
            .iter()
            .enumerate()
            .map(|(i, p)| (RosterRef::Ai(i), p));
        humans.chain(ai)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut().chain(self.ai_players.iter_mut())
    }

    /// Translate a combined index (humans first) into a roster reference.
    pub fn entry(&self, index: usize) -> Option<RosterRef> {
        if index < self.players.len() {
            Some(RosterRef::Human(index))
        } else if index - self.players.len() < self.ai_players.len() {
            Some(RosterRef::Ai(index - self.players.len()))
        } else {
            None
        }
    }

    pub fn get(&self, r: RosterRef) -> Option<&Player> {
        match r {
            RosterRef::Human(i) => self.players.get(i),
            RosterRef::Ai(i) => self.ai_players.get(i),
        }
    }

    pub fn get_mut(&mut self, r: RosterRef) -> Option<&mut Player> {
        match r {
            RosterRef::Human(i) => self.players.get_mut(i),
            RosterRef::Ai(i) => self.ai_players.get_mut(i),
        }
    }

    pub fn find_human(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn find_human_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn is_occupied(&self, slot_number: u8) -> bool {
        slot_number != 0 && self.iter().any(|(_, p)| p.starting_location == slot_number)
    }
}

/// An auxiliary marker drawn on top of the preview image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub name: String,
    /// Preview-image pixel coordinate of the marker centre.
    pub point: Point,
    pub width: i32,
    pub height: i32,
}

/// What the preview needs to know about a map.
pub trait MapSource {
    fn preview_pixel_size(&self) -> (u32, u32);
    fn starting_location_anchors(&self) -> Vec<Point>;
    fn enforce_max_players(&self) -> bool;

    fn overlays(&self) -> Vec<Overlay> {
        Vec::new()
    }
}

/// Immutable per-map geometry; replaced wholesale when the map changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapGeometry {
    pub preview_width: u32,
    pub preview_height: u32,
    pub anchors: Vec<Point>,
    pub enforce_max_players: bool,
    #[serde(default)]
    pub overlays: Vec<Overlay>,
}

impl MapGeometry {
    pub fn from_source(source: &impl MapSource) -> Self {
        let (preview_width, preview_height) = source.preview_pixel_size();
        MapGeometry {
            preview_width,
            preview_height,
            anchors: source.starting_location_anchors(),
            enforce_max_players: source.enforce_max_players(),
            overlays: source.overlays(),
        }
    }
}

/// A map definition as listed in `maps.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMap {
    pub display_name: String,
    pub file_name: String,
    pub preview_width: u32,
    pub preview_height: u32,
    /// Starting locations in preview-image pixels, slot 1 first.
    pub starting_locations: Vec<Point>,
    #[serde(default)]
    pub enforce_max_players: bool,
    #[serde(default)]
    pub overlays: Vec<Overlay>,
}

impl MapSource for GameMap {
    fn preview_pixel_size(&self) -> (u32, u32) {
        (self.preview_width, self.preview_height)
    }

    fn starting_location_anchors(&self) -> Vec<Point> {
        self.starting_locations.clone()
    }

    fn enforce_max_players(&self) -> bool {
        self.enforce_max_players
    }

    fn overlays(&self) -> Vec<Overlay> {
        self.overlays.clone()
    }
}

/// Notifications raised towards the roster owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreviewEvent {
    /// Direct mode: the local player asks for a 1-based slot, or 0 to clear.
    LocalStartingLocationSelected(u8),
    /// Menu mode: the roster was mutated in place; re-read it.
    StartingLocationApplied,
}

/// A saved lobby configuration: map plus roster with starting locations.
#[cfg(feature = "uuid-support")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LobbySetup {
    pub id: Uuid,
    pub name: String,
    pub map_file_name: Option<String>,
    pub roster: Roster,
    pub created_at: String,
}
