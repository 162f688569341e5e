//! Render boundary.
//!
//! The renderer owns all DOM and SVG work. After every change it asks for a
//! [`RenderState`] describing where each idea's element goes and which
//! connection line links it to its parent.

use serde::Serialize;

use super::MindMap;
use crate::geometry::Point;
use crate::tree::IdeaId;

/// A straight connection between two anchors, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Everything the renderer needs to draw one idea.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaView {
    pub id: IdeaId,
    pub parent_id: Option<IdeaId>,
    pub level: u32,
    pub title: String,
    pub key: String,
    /// Element position (including margins) in display coordinates.
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub hidden: bool,
    pub selected: bool,
    pub marked: bool,
    pub collapsed: bool,
    /// Line from this idea to its parent; None for roots.
    pub connection: Option<Segment>,
}

/// A full frame for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderState {
    pub scale: f64,
    /// Size of the scaled display surface in model units.
    pub display_width: f64,
    pub display_height: f64,
    pub editing_idea: Option<IdeaId>,
    pub ideas: Vec<IdeaView>,
}

impl MindMap {
    /// Top-left corner of the idea's element, margins included, in display
    /// coordinates.
    pub fn element_pos(&self, id: IdeaId) -> Option<Point> {
        let idea = self.store.get(id)?;
        let rect = self.store.rect(id)?;
        let margins = idea.margins();
        Some(self.to_display(rect.left_top().minus(Point::new(margins.left, margins.top))))
    }

    /// The closest pair of anchors between an idea and its parent.
    pub fn connection(&self, id: IdeaId) -> Option<Segment> {
        let parent = self.store.parent(id)?;
        let own = self.store.connection_points(id);
        let theirs = self.store.connection_points(parent);

        let mut best: Option<(f64, Point, Point)> = None;
        for &p in &theirs {
            for &m in &own {
                let distance = p.distance(m);
                if best.is_none_or(|(closest, _, _)| distance < closest) {
                    best = Some((distance, m, p));
                }
            }
        }
        best.map(|(_, from, to)| Segment {
            from: self.to_display(from),
            to: self.to_display(to),
        })
    }

    /// Describe every idea for the renderer, ordered by id.
    pub fn render_state(&self) -> RenderState {
        let display = self.display_size();
        let ideas = self
            .store
            .ids()
            .into_iter()
            .filter_map(|id| {
                let idea = self.store.get(id)?;
                let pos = self.element_pos(id)?;
                Some(IdeaView {
                    id,
                    parent_id: self.store.parent(id),
                    level: self.store.level(id)?,
                    title: idea.title.clone(),
                    key: idea.key.clone(),
                    left: pos.x,
                    top: pos.y,
                    width: idea.width(),
                    height: idea.height(),
                    hidden: self.store.is_hidden(id),
                    selected: idea.selected,
                    marked: idea.marked,
                    collapsed: idea.collapsed,
                    connection: self.connection(id),
                })
            })
            .collect();

        RenderState {
            scale: self.scale,
            display_width: display.x,
            display_height: display.y,
            editing_idea: self.editing_idea(),
            ideas,
        }
    }
}
