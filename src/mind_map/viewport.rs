//! Viewport, scale and scrolling.
//!
//! Model space has its origin at the center of the display. The display is
//! the viewport divided by the scale; the renderer scales it back up.

use serde::{Deserialize, Serialize};

use super::MindMap;
use crate::geometry::{Point, Rect};
use crate::tree::{IdeaId, Margins};

/// Size of the element the map renders into, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl MindMap {
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Size of the display in model units.
    pub fn display_size(&self) -> Point {
        Point::new(self.viewport.width, self.viewport.height).divide(self.scale)
    }

    pub fn display_center(&self) -> Point {
        self.display_size().divide(2.0)
    }

    /// Convert a model position to display coordinates.
    pub fn to_display(&self, pos: Point) -> Point {
        pos.plus(self.display_center())
    }

    /// Convert a pointer position (viewport pixels) to model space.
    pub fn pointer_to_model(&self, pointer: Point) -> Point {
        pointer.divide(self.scale).minus(self.display_center())
    }

    /// Adopt a new viewport size. Redraws only if the size changed.
    pub fn sync_viewport(&mut self, width: f64, height: f64) -> bool {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.redraw();
        true
    }

    /// Set the scale, clamped to the configured minimum and rounded to two
    /// decimals.
    pub fn update_scale(&mut self, scale: f64) {
        self.scale = (scale.max(self.config.min_scale) * 100.0).round() / 100.0;
        self.redraw();
    }

    pub fn scale_up(&mut self) {
        self.update_scale(self.scale * self.config.scale_step);
    }

    pub fn scale_down(&mut self) {
        self.update_scale(self.scale / self.config.scale_step);
    }

    /// Translate every tree of the map.
    pub fn move_root_ideas(&mut self, distance: Point) {
        for root in self.store.roots() {
            self.store.move_by(root, distance);
        }
    }

    pub fn can_fit_to_container(&self) -> bool {
        !self.store.is_empty()
    }

    /// Center all ideas and scale them to fill the viewport.
    pub fn fit_to_container(&mut self) {
        let Some(rect) = self
            .store
            .ideas()
            .filter_map(|idea| self.store.rect(idea.id()))
            .reduce(|union, rect| union.union(&rect))
        else {
            return;
        };
        self.move_root_ideas(-rect.center());
        let padding = self.config.fit_padding;
        let scale = (self.viewport.width / (rect.width + padding))
            .min(self.viewport.height / (rect.height + padding));
        self.update_scale(scale);
    }

    /// Zoom by one wheel notch around the pointer.
    ///
    /// Returns false if the wheel turn was not meant for the map (ctrl not
    /// held while it is required).
    pub fn turn_wheel(&mut self, delta_y: f64, pointer: Point, ctrl: bool) -> bool {
        if self.config.force_ctrl_for_wheel && !ctrl {
            return false;
        }
        let step = if delta_y > 0.0 {
            -self.config.wheel_step
        } else {
            self.config.wheel_step
        };
        let scale = self.scale * (1.0 + step);
        let center_offset = self.pointer_to_model(pointer);
        let distance = center_offset
            .divide(scale / self.scale)
            .minus(center_offset);
        self.move_root_ideas(distance);
        self.update_scale(scale);
        true
    }

    /// Scroll the map so the idea and its margins are on screen.
    ///
    /// Returns whether anything moved.
    pub fn scroll_into_view(&mut self, id: IdeaId) -> bool {
        let (Some(rect), Some(idea)) = (self.store.rect(id), self.store.get(id)) else {
            return false;
        };
        let offset = scroll_offset(&rect, idea.margins(), self.display_center());
        if offset == Point::ZERO {
            return false;
        }
        self.move_root_ideas(offset);
        true
    }
}

fn scroll_offset(rect: &Rect, margins: Margins, center: Point) -> Point {
    let mut offset = Point::ZERO;
    if rect.right() + margins.right > center.x {
        offset.x = center.x - (rect.right() + margins.right);
    }
    if rect.left - margins.left < -center.x {
        offset.x = -center.x - (rect.left - margins.left);
    }
    if rect.bottom() + margins.bottom > center.y {
        offset.y = center.y - (rect.bottom() + margins.bottom);
    }
    if rect.top - margins.top < -center.y {
        offset.y = -center.y - (rect.top - margins.top);
    }
    offset
}
