//! Rules for claiming and releasing starting locations.
//!
//! Slots are addressed by their 0-based index here; players store 1-based
//! slot numbers with 0 meaning "unassigned".

use crate::models::{PreviewEvent, Roster, RosterRef};
use crate::slots::MAX_STARTING_LOCATIONS;

/// 1-based slot number stored on players for a 0-based slot index.
pub fn slot_number(slot: usize) -> Option<u8> {
    if slot < MAX_STARTING_LOCATIONS {
        u8::try_from(slot + 1).ok()
    } else {
        None
    }
}

/// Direct mode, primary activation: the local player asks for `slot`.
///
/// The roster is not touched; the roster owner applies the returned request.
pub fn request_claim(roster: &Roster, slot: usize, enforce_max_players: bool) -> Option<PreviewEvent> {
    let number = slot_number(slot)?;
    if enforce_max_players && roster.is_occupied(number) {
        tracing::debug!(slot = number, "claim rejected, slot already taken");
        return None;
    }
    Some(PreviewEvent::LocalStartingLocationSelected(number))
}

/// Direct mode, secondary activation: only the local player can release
/// their own slot.
pub fn request_release(roster: &Roster, local_player: &str, slot: usize) -> Option<PreviewEvent> {
    let number = slot_number(slot)?;
    let player = roster.find_human(local_player)?;
    if player.starting_location != number {
        return None;
    }
    Some(PreviewEvent::LocalStartingLocationSelected(0))
}

/// Menu mode: put `who` on `slot`, evicting the current holder first when
/// only one player may hold a slot.
pub fn assign(
    roster: &mut Roster,
    slot: usize,
    who: RosterRef,
    enforce_max_players: bool,
) -> Option<PreviewEvent> {
    let number = slot_number(slot)?;
    match roster.get(who) {
        Some(player) if player.starting_location != number => {}
        _ => return None,
    }

    if enforce_max_players {
        for player in roster.iter_mut() {
            if player.starting_location == number {
                tracing::debug!(slot = number, player = %player.name, "evicted from slot");
                player.starting_location = 0;
            }
        }
    }

    let player = roster.get_mut(who)?;
    player.starting_location = number;
    tracing::debug!(slot = number, player = %player.name, "assigned to slot");
    Some(PreviewEvent::StartingLocationApplied)
}

/// Menu mode, secondary activation: release every holder of `slot`.
///
/// Releasing an empty slot changes nothing and raises nothing.
pub fn clear_slot(roster: &mut Roster, slot: usize) -> Option<PreviewEvent> {
    let number = slot_number(slot)?;
    let mut cleared = 0usize;
    for player in roster.iter_mut() {
        if player.starting_location == number {
            player.starting_location = 0;
            cleared += 1;
        }
    }
    if cleared == 0 {
        return None;
    }
    tracing::debug!(slot = number, cleared, "slot released");
    Some(PreviewEvent::StartingLocationApplied)
}
