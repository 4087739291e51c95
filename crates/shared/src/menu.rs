use serde::Serialize;

use crate::models::{Point, Rect, Viewport};
use crate::sync::MenuItem;

/// Border added to the item rows.
const MENU_BORDER: i32 = 2;

/// The roster-wide assignment menu opened from a slot indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenu {
    pub items: Vec<MenuItem>,
    pub open: bool,
    /// 0-based slot the menu assigns to while open.
    pub slot: Option<usize>,
    pub position: Point,
}

impl ContextMenu {
    pub fn height(&self, item_height: i32) -> i32 {
        i32::try_from(self.items.len())
            .unwrap_or(i32::MAX)
            .saturating_mul(item_height)
            .saturating_add(MENU_BORDER)
    }

    pub fn open_at(&mut self, slot: usize, position: Point) {
        self.slot = Some(slot);
        self.position = position;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.slot = None;
    }

    /// The item at `index`, if the menu is open and the item can be picked.
    pub fn selection(&self, index: usize) -> Option<(usize, &MenuItem)> {
        if !self.open {
            return None;
        }
        let slot = self.slot?;
        let item = self.items.get(index)?;
        item.selectable.then_some((slot, item))
    }
}

/// Where to open a `width x height` menu next to `indicator`.
///
/// The menu opens to the right of the indicator, level with its top. If that
/// would overflow the right edge it opens to the left instead; if it would
/// overflow the bottom it is pushed up to end at the bottom edge.
pub fn place_menu(indicator: Rect, width: i32, height: i32, viewport: Viewport) -> Point {
    // Widened so that edges near the i32 limits still compare correctly.
    let (width, height) = (i64::from(width), i64::from(height));
    let mut x = i64::from(indicator.x) + i64::from(indicator.width);
    let mut y = i64::from(indicator.y);

    if x + width > i64::from(viewport.width) {
        x = i64::from(indicator.x) - width;
    }
    if y + height > i64::from(viewport.height) {
        y = i64::from(viewport.height) - height;
    }

    Point::new(to_screen(x), to_screen(y))
}

fn to_screen(v: i64) -> i32 {
    i32::try_from(v.max(0)).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rgb, RosterRef};

    fn item(selectable: bool) -> MenuItem {
        MenuItem {
            text: "1. Alice".to_string(),
            color: Rgb::WHITE,
            selectable,
            target: RosterRef::Human(0),
        }
    }

    #[test]
    fn test_place_menu_opens_right_and_down() {
        let p = place_menu(Rect::new(10, 10, 24, 24), 150, 60, Viewport::new(400, 300));
        assert_eq!(p, Point::new(34, 10));
    }

    #[test]
    fn test_place_menu_flips_left_on_right_overflow() {
        let p = place_menu(Rect::new(300, 10, 24, 24), 150, 60, Viewport::new(400, 300));
        assert_eq!(p, Point::new(150, 10));
    }

    #[test]
    fn test_place_menu_pushes_up_on_bottom_overflow() {
        let p = place_menu(Rect::new(10, 280, 24, 24), 150, 60, Viewport::new(400, 300));
        assert_eq!(p, Point::new(34, 240));
    }

    #[test]
    fn test_place_menu_never_negative() {
        let p = place_menu(Rect::new(50, 10, 24, 24), 150, 500, Viewport::new(160, 300));
        assert_eq!(p, Point::new(0, 0));
    }

    #[test]
    fn test_place_menu_at_i32_bounds() {
        let vp = Viewport::new(i32::MAX, i32::MAX);
        let p = place_menu(Rect::new(i32::MAX - 12, i32::MAX - 12, 24, 24), 150, 60, vp);
        assert_eq!(p, Point::new(i32::MAX - 162, i32::MAX - 60));

        let p = place_menu(Rect::new(i32::MIN, i32::MIN, 24, 24), i32::MAX, i32::MAX, Viewport::new(10, 10));
        assert_eq!(p, Point::new(0, 0));
    }

    #[test]
    fn test_height_counts_items_and_border() {
        let mut menu = ContextMenu::default();
        assert_eq!(menu.height(18), 2);
        menu.items = vec![item(true), item(false)];
        assert_eq!(menu.height(18), 38);
    }

    #[test]
    fn test_selection_requires_open_menu_and_selectable_item() {
        let mut menu = ContextMenu {
            items: vec![item(true), item(false)],
            ..Default::default()
        };
        assert!(menu.selection(0).is_none());

        menu.open_at(3, Point::new(0, 0));
        assert_eq!(menu.selection(0).map(|(slot, _)| slot), Some(3));
        assert!(menu.selection(1).is_none());
        assert!(menu.selection(2).is_none());

        menu.close();
        assert!(menu.selection(0).is_none());
    }
}
