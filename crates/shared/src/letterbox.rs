//! Aspect-preserving projection of preview-image pixels into the preview control.
//!
//! The control keeps a 1px border on every side, so the usable area is
//! `(width - 2) x (height - 2)`. The image is scaled uniformly to fit that area
//! and centred on the axis it does not fill.

use crate::models::{Point, Rect, Viewport};

/// Total border, both sides combined.
pub const INSET: i32 = 2;
/// Border on a single side.
pub const BORDER: i32 = INSET / 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f64,
    pub rect: Rect,
}

impl Letterbox {
    /// Fit a `preview_width x preview_height` image into `viewport`.
    ///
    /// Returns `None` when either side has no usable area, which callers treat
    /// as "nothing to show".
    pub fn compute(preview_width: u32, preview_height: u32, viewport: Viewport) -> Option<Self> {
        if preview_width == 0 || preview_height == 0 {
            return None;
        }
        let inner_w = viewport.width.checked_sub(INSET).filter(|w| *w > 0)?;
        let inner_h = viewport.height.checked_sub(INSET).filter(|h| *h > 0)?;

        let x_ratio = inner_w as f64 / preview_width as f64;
        let y_ratio = inner_h as f64 / preview_height as f64;

        let (scale, rect) = if x_ratio > y_ratio {
            // Height fills, width is centred.
            let width = ((preview_width as f64 * y_ratio).round() as i32).min(inner_w);
            let x = (inner_w - width) / 2 + BORDER;
            (y_ratio, Rect::new(x, BORDER, width, inner_h))
        } else {
            // Width fills, height is centred.
            let height = ((preview_height as f64 * x_ratio).round() as i32).min(inner_h);
            let y = (inner_h - height) / 2 + BORDER;
            (x_ratio, Rect::new(BORDER, y, inner_w, height))
        };

        Some(Letterbox { scale, rect })
    }

    /// Project a preview-image pixel into control coordinates.
    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.rect.x.saturating_add((p.x as f64 * self.scale).round() as i32),
            self.rect.y.saturating_add((p.y as f64 * self.scale).round() as i32),
        )
    }

    /// Project an overlay of the given size so that it is centred on `p`.
    pub fn map_centered(&self, p: Point, width: i32, height: i32) -> Point {
        let center = self.map_point(p);
        Point::new(
            center.x.saturating_sub(width / 2),
            center.y.saturating_sub(height / 2),
        )
    }
}
