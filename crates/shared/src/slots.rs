use serde::Serialize;

use crate::models::{Point, Roster, RosterRef};

/// Number of starting-location indicators a preview can show.
pub const MAX_STARTING_LOCATIONS: usize = 8;

/// One pre-allocated starting-location indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotIndicator {
    /// Control-space centre of the indicator.
    pub position: Point,
    pub enabled: bool,
    pub visible: bool,
    /// Players whose starting location is this slot, in roster order.
    pub occupants: Vec<RosterRef>,
    /// One text line per occupant.
    pub label: Vec<String>,
}

impl SlotIndicator {
    pub fn disable(&mut self) {
        self.enabled = false;
        self.visible = false;
    }
}

/// Fixed arena of indicators, addressed by 0-based slot index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRegistry {
    indicators: [SlotIndicator; MAX_STARTING_LOCATIONS],
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotRegistry {
    pub fn new() -> Self {
        SlotRegistry {
            indicators: std::array::from_fn(|_| SlotIndicator::default()),
        }
    }

    pub fn indicator(&self, slot: usize) -> Option<&SlotIndicator> {
        self.indicators.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotIndicator> {
        self.indicators.iter()
    }

    pub fn set_anchor_screen_position(&mut self, slot: usize, position: Point) {
        if let Some(indicator) = self.indicators.get_mut(slot) {
            indicator.position = position;
        }
    }

    /// Show and enable, or hide and disable, one indicator.
    pub fn set_visible(&mut self, slot: usize, visible: bool) {
        if let Some(indicator) = self.indicators.get_mut(slot) {
            indicator.enabled = visible;
            indicator.visible = visible;
        }
    }

    /// Disable every indicator from `start` onwards.
    pub fn disable_from(&mut self, start: usize) {
        for indicator in self.indicators.iter_mut().skip(start) {
            indicator.disable();
        }
    }

    pub fn is_enabled(&self, slot: usize) -> bool {
        self.indicators.get(slot).is_some_and(|i| i.enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.indicators.iter().filter(|i| i.enabled).count()
    }

    pub fn occupants(&self, slot: usize) -> &[RosterRef] {
        self.indicators
            .get(slot)
            .map(|i| i.occupants.as_slice())
            .unwrap_or(&[])
    }

    /// Clear every occupant list and refill them from a single roster pass.
    ///
    /// Starting locations beyond the arena capacity are ignored.
    pub fn rebuild_occupants(&mut self, roster: &Roster) {
        for indicator in self.indicators.iter_mut() {
            indicator.occupants.clear();
        }
        for (r, player) in roster.iter() {
            let Some(slot) = (player.starting_location as usize).checked_sub(1) else {
                continue;
            };
            if let Some(indicator) = self.indicators.get_mut(slot) {
                indicator.occupants.push(r);
            }
        }
    }

    pub(crate) fn indicators_mut(&mut self) -> impl Iterator<Item = &mut SlotIndicator> {
        self.indicators.iter_mut()
    }
}
