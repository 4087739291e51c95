//! Starting-location mapping and slot assignment for the skirmish lobby map preview.

pub mod assignment;
pub mod config;
pub mod letterbox;
pub mod menu;
pub mod models;
pub mod preview;
pub mod slots;
pub mod sync;

pub use config::PreviewConfig;
pub use models::{MapGeometry, Player, PreviewEvent, Roster, RosterRef, Viewport};
pub use preview::MapPreview;
