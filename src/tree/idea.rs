//! Idea type and related structures.
//!
//! Ideas are the nodes of the mind map. Each idea has:
//! - A stable caller-assigned identifier
//! - A parent identifier (its own id for a root)
//! - Persisted content: title, key, offset to the parent, flags
//! - Transient measurements supplied by the rendering side after each
//!   structural change (size, margins, connection anchors)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Stable idea identifier.
///
/// Assigned by the caller and never reused while the idea exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaId(pub u32);

impl IdeaId {
    /// Create a new IdeaId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Idea({})", self.0)
    }
}

impl From<u32> for IdeaId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<IdeaId> for u32 {
    #[inline]
    fn from(id: IdeaId) -> Self {
        id.0
    }
}

/// The persisted form of an idea.
///
/// This is the unit of `save`/`load` and of every undo operation. Field names
/// follow the JSON format shared with the browser side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaRecord {
    pub id: IdeaId,
    pub parent_id: IdeaId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub marked: bool,
    #[serde(default)]
    pub collapsed: bool,
}

impl IdeaRecord {
    /// Create a record with empty content at offset (0, 0).
    pub fn new(id: IdeaId, parent_id: IdeaId) -> Self {
        Self {
            id,
            parent_id,
            title: String::new(),
            key: String::new(),
            x: 0.0,
            y: 0.0,
            selected: false,
            marked: false,
            collapsed: false,
        }
    }

    /// Create a root record (its parent is itself).
    pub fn root(id: IdeaId) -> Self {
        Self::new(id, id)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_pos(mut self, pos: Point) -> Self {
        self.x = pos.x;
        self.y = pos.y;
        self
    }

    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_marked(mut self, marked: bool) -> Self {
        self.marked = marked;
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    #[inline]
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Margins around an idea's box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(rename = "marginLeft", default)]
    pub left: f64,
    #[serde(rename = "marginRight", default)]
    pub right: f64,
    #[serde(rename = "marginTop", default)]
    pub top: f64,
    #[serde(rename = "marginBottom", default)]
    pub bottom: f64,
}

impl Margins {
    /// The same margin on every side.
    pub const fn uniform(margin: f64) -> Self {
        Self {
            left: margin,
            right: margin,
            top: margin,
            bottom: margin,
        }
    }
}

/// Size, margins and connection anchors of a rendered idea.
///
/// Anchor offsets are relative to the idea's center.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(flatten)]
    pub margins: Margins,
    #[serde(default)]
    pub connection_offsets: Vec<Point>,
}

impl Measure {
    /// A box with uniform margins and anchors at the midpoints of its left
    /// and right edges.
    pub fn boxed(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::uniform(margin),
            connection_offsets: vec![
                Point::new(-width / 2.0, 0.0),
                Point::new(width / 2.0, 0.0),
            ],
        }
    }
}

/// A node of the mind map.
#[derive(Debug, Clone)]
pub struct Idea {
    id: IdeaId,
    parent_id: IdeaId,
    pub title: String,
    pub key: String,
    /// Offset relative to the parent's position.
    pub pos: Point,
    pub selected: bool,
    pub marked: bool,
    pub collapsed: bool,
    measure: Measure,
    /// Level and title the current measurement was taken for.
    measured_for: Option<(u32, String)>,
}

impl Idea {
    /// Build an idea from its persisted record. The idea starts unmeasured.
    pub fn from_record(record: &IdeaRecord) -> Self {
        Self {
            id: record.id,
            parent_id: record.parent_id,
            title: record.title.clone(),
            key: record.key.clone(),
            pos: record.pos(),
            selected: record.selected,
            marked: record.marked,
            collapsed: record.collapsed,
            measure: Measure::default(),
            measured_for: None,
        }
    }

    /// The persisted form of this idea.
    pub fn to_record(&self) -> IdeaRecord {
        IdeaRecord {
            id: self.id,
            parent_id: self.parent_id,
            title: self.title.clone(),
            key: self.key.clone(),
            x: self.pos.x,
            y: self.pos.y,
            selected: self.selected,
            marked: self.marked,
            collapsed: self.collapsed,
        }
    }

    /// Overwrite every persisted field except the parent link, which the
    /// store maintains together with its children index.
    pub(crate) fn apply_content(&mut self, record: &IdeaRecord) {
        self.title = record.title.clone();
        self.key = record.key.clone();
        self.pos = record.pos();
        self.selected = record.selected;
        self.marked = record.marked;
        self.collapsed = record.collapsed;
    }

    #[inline]
    pub fn id(&self) -> IdeaId {
        self.id
    }

    #[inline]
    pub fn parent_id(&self) -> IdeaId {
        self.parent_id
    }

    #[inline]
    pub(crate) fn set_parent_id(&mut self, parent_id: IdeaId) {
        self.parent_id = parent_id;
    }

    /// Whether the parent link points back at the idea itself.
    #[inline]
    pub fn is_self_parented(&self) -> bool {
        self.id == self.parent_id
    }

    /// Translate the idea (and with it its whole subtree).
    #[inline]
    pub fn move_by(&mut self, distance: Point) {
        self.pos = self.pos.plus(distance);
    }

    #[inline]
    pub fn measure(&self) -> &Measure {
        &self.measure
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.measure.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.measure.height
    }

    #[inline]
    pub fn margins(&self) -> Margins {
        self.measure.margins
    }

    /// Whether the measurement is missing or was taken for a different level
    /// or title.
    pub fn needs_measure(&self, level: u32) -> bool {
        match &self.measured_for {
            Some((measured_level, measured_title)) => {
                *measured_level != level || *measured_title != self.title
            }
            None => true,
        }
    }

    /// Store a measurement taken at `level` for the current title.
    pub fn set_measure(&mut self, measure: Measure, level: u32) {
        self.measure = measure;
        self.measured_for = Some((level, self.title.clone()));
    }

    /// Force a new measurement on the next redraw.
    pub(crate) fn invalidate_measure(&mut self) {
        self.measured_for = None;
    }
}
