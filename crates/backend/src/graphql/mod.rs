use std::sync::{Arc, MutexGuard};

use async_graphql::{Context, Enum, InputObject, Object, SimpleObject, ID};
use skirmish_shared::models::{self, GameMap, PreviewEvent};
use skirmish_shared::sync::display_name;

use crate::assets::Assets;
use crate::lobby::{Button, Lobby, SharedLobby};
use crate::storage::Storage;

// GraphQL output types

#[derive(SimpleObject)]
pub struct GqlGameMap {
    pub display_name: String,
    pub file_name: String,
    pub preview_width: u32,
    pub preview_height: u32,
    pub starting_location_count: usize,
    pub enforce_max_players: bool,
}

impl From<&GameMap> for GqlGameMap {
    fn from(m: &GameMap) -> Self {
        GqlGameMap {
            display_name: m.display_name.clone(),
            file_name: m.file_name.clone(),
            preview_width: m.preview_width,
            preview_height: m.preview_height,
            starting_location_count: m.starting_locations.len(),
            enforce_max_players: m.enforce_max_players,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlPoint {
    pub x: i32,
    pub y: i32,
}

impl From<models::Point> for GqlPoint {
    fn from(p: models::Point) -> Self {
        GqlPoint { x: p.x, y: p.y }
    }
}

#[derive(SimpleObject)]
pub struct GqlLetterbox {
    pub scale: f64,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(SimpleObject)]
pub struct GqlPlayer {
    pub name: String,
    pub display_name: String,
    pub is_ai: bool,
    pub team_id: u8,
    pub color_id: u8,
    pub side_id: u8,
    pub starting_location: u8,
}

impl GqlPlayer {
    fn new(p: &models::Player, is_ai: bool) -> Self {
        GqlPlayer {
            name: p.name.clone(),
            display_name: display_name(p),
            is_ai,
            team_id: p.team_id,
            color_id: p.color_id,
            side_id: p.side_id,
            starting_location: p.starting_location,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlSlot {
    /// 1-based slot number.
    pub number: i32,
    pub position: GqlPoint,
    pub enabled: bool,
    pub visible: bool,
    pub label: Vec<String>,
}

#[derive(SimpleObject)]
pub struct GqlMenuItem {
    pub text: String,
    pub color: String,
    pub selectable: bool,
}

#[derive(SimpleObject)]
pub struct GqlMenu {
    pub open: bool,
    /// 1-based slot the menu assigns to.
    pub slot: Option<i32>,
    pub position: GqlPoint,
    pub items: Vec<GqlMenuItem>,
}

#[derive(SimpleObject)]
pub struct GqlOverlay {
    pub name: String,
    pub position: GqlPoint,
    pub width: i32,
    pub height: i32,
}

#[derive(SimpleObject)]
pub struct GqlLobby {
    pub map_file_name: Option<String>,
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub context_menu_enabled: bool,
    pub letterbox: Option<GqlLetterbox>,
    pub players: Vec<GqlPlayer>,
    pub slots: Vec<GqlSlot>,
    pub menu: GqlMenu,
    pub overlays: Vec<GqlOverlay>,
}

impl From<&Lobby> for GqlLobby {
    fn from(lobby: &Lobby) -> Self {
        let preview = lobby.preview();
        let viewport = preview.viewport();
        let roster = lobby.roster();
        let menu = preview.menu();

        GqlLobby {
            map_file_name: lobby.map().map(|m| m.file_name.clone()),
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            context_menu_enabled: preview.config().context_menu_enabled,
            letterbox: preview.letterbox().map(|lb| GqlLetterbox {
                scale: lb.scale,
                x: lb.rect.x,
                y: lb.rect.y,
                width: lb.rect.width,
                height: lb.rect.height,
            }),
            players: roster
                .iter()
                .map(|(r, p)| GqlPlayer::new(p, matches!(r, models::RosterRef::Ai(_))))
                .collect(),
            slots: preview
                .slots()
                .iter()
                .enumerate()
                .map(|(i, s)| GqlSlot {
                    number: i as i32 + 1,
                    position: s.position.into(),
                    enabled: s.enabled,
                    visible: s.visible,
                    label: s.label.clone(),
                })
                .collect(),
            menu: GqlMenu {
                open: menu.open,
                slot: menu.slot.map(|s| s as i32 + 1),
                position: menu.position.into(),
                items: menu
                    .items
                    .iter()
                    .map(|i| GqlMenuItem {
                        text: i.text.clone(),
                        color: i.color.to_hex(),
                        selectable: i.selectable,
                    })
                    .collect(),
            },
            overlays: preview
                .overlays()
                .iter()
                .map(|o| GqlOverlay {
                    name: o.name.clone(),
                    position: o.position.into(),
                    width: o.width,
                    height: o.height,
                })
                .collect(),
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlEventKind {
    LocalStartingLocationSelected,
    StartingLocationApplied,
}

/// Result of an input: what the preview raised, plus the resulting lobby state.
#[derive(SimpleObject)]
pub struct GqlInteraction {
    pub event: Option<GqlEventKind>,
    /// Slot number carried by `LOCAL_STARTING_LOCATION_SELECTED` (0 = cleared).
    pub slot: Option<i32>,
    pub lobby: GqlLobby,
}

impl GqlInteraction {
    fn new(event: Option<PreviewEvent>, lobby: &Lobby) -> Self {
        let (event, slot) = match event {
            Some(PreviewEvent::LocalStartingLocationSelected(n)) => (
                Some(GqlEventKind::LocalStartingLocationSelected),
                Some(n as i32),
            ),
            Some(PreviewEvent::StartingLocationApplied) => {
                (Some(GqlEventKind::StartingLocationApplied), None)
            }
            None => (None, None),
        };
        GqlInteraction {
            event,
            slot,
            lobby: lobby.into(),
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlSetup {
    pub id: ID,
    pub name: String,
    pub map_file_name: Option<String>,
    pub player_count: usize,
    pub created_at: String,
}

impl From<models::LobbySetup> for GqlSetup {
    fn from(s: models::LobbySetup) -> Self {
        GqlSetup {
            id: ID(s.id.to_string()),
            name: s.name,
            map_file_name: s.map_file_name,
            player_count: s.roster.len(),
            created_at: s.created_at,
        }
    }
}

#[derive(SimpleObject)]
pub struct GqlStats {
    pub total_setups: u64,
    pub db_size_bytes: u64,
    pub player_count: usize,
    pub assigned_count: usize,
}

// Input types

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum GqlButton {
    Primary,
    Secondary,
}

impl From<GqlButton> for Button {
    fn from(b: GqlButton) -> Self {
        match b {
            GqlButton::Primary => Button::Primary,
            GqlButton::Secondary => Button::Secondary,
        }
    }
}

#[derive(InputObject)]
pub struct AddPlayerInput {
    pub name: String,
    pub is_ai: Option<bool>,
    pub team_id: Option<u8>,
    pub color_id: Option<u8>,
    pub side_id: Option<u8>,
}

fn lock<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<MutexGuard<'a, Lobby>> {
    let lobby = ctx.data::<SharedLobby>()?;
    Ok(lobby.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("lobby lock poisoned by an earlier panic, recovering");
        poisoned.into_inner()
    }))
}

/// 1-based slot number from the API to the preview's 0-based index.
fn slot_index(number: i32) -> async_graphql::Result<usize> {
    usize::try_from(number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| async_graphql::Error::new(format!("Invalid slot number: {}", number)))
}

// Query root

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn maps(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlGameMap>> {
        let assets = ctx.data::<Arc<Assets>>()?;
        Ok(assets.maps.iter().map(GqlGameMap::from).collect())
    }

    async fn lobby(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlLobby> {
        let lobby = lock(ctx)?;
        Ok(GqlLobby::from(&*lobby))
    }

    async fn setups(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GqlSetup>> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let setups = storage.list_setups()?;
        Ok(setups.into_iter().map(GqlSetup::from).collect())
    }

    async fn setup(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<GqlSetup>> {
        let storage = ctx.data::<Arc<Storage>>()?;
        Ok(storage.get_setup(&id)?.map(GqlSetup::from))
    }

    async fn stats(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlStats> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let total_setups = storage.count_setups()?;
        let db_size_bytes = storage.db_size_bytes()?;
        let lobby = lock(ctx)?;
        let roster = lobby.roster();
        Ok(GqlStats {
            total_setups,
            db_size_bytes,
            player_count: roster.len(),
            assigned_count: roster
                .iter()
                .filter(|(_, p)| p.starting_location != 0)
                .count(),
        })
    }
}

// Mutation root

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Select a map by file name, or clear the selection with `null`.
    async fn select_map(
        &self,
        ctx: &Context<'_>,
        file_name: Option<String>,
    ) -> async_graphql::Result<GqlLobby> {
        let assets = ctx.data::<Arc<Assets>>()?;
        let map = match file_name {
            Some(name) => Some(
                assets
                    .find_map_by_file_name(&name)
                    .cloned()
                    .ok_or_else(|| async_graphql::Error::new(format!("Unknown map: {}", name)))?,
            ),
            None => None,
        };
        let mut lobby = lock(ctx)?;
        lobby.select_map(map);
        Ok(GqlLobby::from(&*lobby))
    }

    async fn resize_viewport(
        &self,
        ctx: &Context<'_>,
        width: i32,
        height: i32,
    ) -> async_graphql::Result<GqlLobby> {
        let mut lobby = lock(ctx)?;
        lobby.resize(width, height);
        Ok(GqlLobby::from(&*lobby))
    }

    async fn set_context_menu_enabled(
        &self,
        ctx: &Context<'_>,
        enabled: bool,
    ) -> async_graphql::Result<GqlLobby> {
        let mut lobby = lock(ctx)?;
        lobby.set_context_menu_enabled(enabled);
        Ok(GqlLobby::from(&*lobby))
    }

    async fn add_player(
        &self,
        ctx: &Context<'_>,
        input: AddPlayerInput,
    ) -> async_graphql::Result<GqlLobby> {
        let player = models::Player::new(input.name)
            .with_team(input.team_id.unwrap_or(0))
            .with_color(input.color_id.unwrap_or(0))
            .with_side(input.side_id.unwrap_or(0));
        let mut lobby = lock(ctx)?;
        lobby.add_player(player, input.is_ai.unwrap_or(false))?;
        Ok(GqlLobby::from(&*lobby))
    }

    async fn remove_player(&self, ctx: &Context<'_>, name: String) -> async_graphql::Result<GqlLobby> {
        let mut lobby = lock(ctx)?;
        lobby.remove_player(&name)?;
        Ok(GqlLobby::from(&*lobby))
    }

    async fn slot_primary(&self, ctx: &Context<'_>, slot: i32) -> async_graphql::Result<GqlInteraction> {
        let index = slot_index(slot)?;
        let mut lobby = lock(ctx)?;
        let event = lobby.slot_primary(index);
        Ok(GqlInteraction::new(event, &lobby))
    }

    async fn slot_secondary(
        &self,
        ctx: &Context<'_>,
        slot: i32,
    ) -> async_graphql::Result<GqlInteraction> {
        let index = slot_index(slot)?;
        let mut lobby = lock(ctx)?;
        let event = lobby.slot_secondary(index);
        Ok(GqlInteraction::new(event, &lobby))
    }

    /// Click at control coordinates; misses are ignored.
    async fn click_at(
        &self,
        ctx: &Context<'_>,
        x: i32,
        y: i32,
        button: GqlButton,
    ) -> async_graphql::Result<GqlInteraction> {
        let mut lobby = lock(ctx)?;
        let event = lobby.click_at(models::Point::new(x, y), button.into());
        Ok(GqlInteraction::new(event, &lobby))
    }

    /// Pick a 0-based entry of the open assignment menu.
    async fn menu_select(&self, ctx: &Context<'_>, index: i32) -> async_graphql::Result<GqlInteraction> {
        let mut lobby = lock(ctx)?;
        let event = usize::try_from(index)
            .ok()
            .and_then(|i| lobby.menu_select(i));
        Ok(GqlInteraction::new(event, &lobby))
    }

    async fn close_menu(&self, ctx: &Context<'_>) -> async_graphql::Result<GqlLobby> {
        let mut lobby = lock(ctx)?;
        lobby.close_menu();
        Ok(GqlLobby::from(&*lobby))
    }

    async fn save_setup(&self, ctx: &Context<'_>, name: String) -> async_graphql::Result<GqlSetup> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let now = chrono::Utc::now().to_rfc3339();
        let setup = lock(ctx)?.to_setup(name, now);
        storage.save_setup(&setup)?;
        tracing::info!(id = %setup.id, "Setup saved");
        Ok(GqlSetup::from(setup))
    }

    async fn load_setup(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<GqlLobby> {
        let storage = ctx.data::<Arc<Storage>>()?;
        let assets = ctx.data::<Arc<Assets>>()?;
        let setup = storage
            .get_setup(&id)?
            .ok_or_else(|| crate::error::LobbyError::SetupNotFound(id.to_string()))?;
        let map = match &setup.map_file_name {
            Some(name) => Some(
                assets
                    .find_map_by_file_name(name)
                    .cloned()
                    .ok_or_else(|| crate::error::LobbyError::UnknownMap(name.clone()))?,
            ),
            None => None,
        };
        let mut lobby = lock(ctx)?;
        lobby.apply_setup(setup, map);
        Ok(GqlLobby::from(&*lobby))
    }

    async fn delete_setup(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<bool> {
        let storage = ctx.data::<Arc<Storage>>()?;
        Ok(storage.delete_setup(&id)?)
    }
}

pub type Schema = async_graphql::Schema<QueryRoot, MutationRoot, async_graphql::EmptySubscription>;

pub fn build_schema(assets: Arc<Assets>, storage: Arc<Storage>, lobby: SharedLobby) -> Schema {
    async_graphql::Schema::build(QueryRoot, MutationRoot, async_graphql::EmptySubscription)
        .data(assets)
        .data(storage)
        .data(lobby)
        .finish()
}
