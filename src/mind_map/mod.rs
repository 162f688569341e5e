//! MindMap - the editor core.
//!
//! `MindMap` owns the idea store together with everything that reacts to it:
//! the undo history, the spatial index used for hit testing, the viewport
//! and the observer that is told about every visible change.
//!
//! Every undoable action runs through [`MindMap::transact`], which snapshots
//! all records, runs the action, redraws and records the difference between
//! the two snapshots as one undo group.

mod commands;
mod drag;
mod edit;
mod measure;
mod navigate;
mod render;
mod viewport;

pub use drag::{DragKind, DragPhase, DragSession};
pub use measure::Measurer;
pub use render::{IdeaView, RenderState, Segment};
pub use viewport::Viewport;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::config::MindMapConfig;
use crate::error::Result;
use crate::geometry::Rect;
use crate::history::{diff, UndoHistory};
use crate::layout::TreeLayout;
use crate::spatial::{IdeaBox, SpatialIndex};
use crate::tree::{IdeaId, IdeaRecord, IdeaStore, Measure};

use edit::EditSession;

/// What observers learn after each change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNotice {
    pub animate: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub idea_count: usize,
    pub selected_count: usize,
}

type ChangeObserver = Box<dyn FnMut(&ChangeNotice)>;

/// The mind map editor core.
pub struct MindMap {
    store: IdeaStore,
    history: UndoHistory,
    spatial: SpatialIndex,
    config: MindMapConfig,
    viewport: Viewport,
    scale: f64,
    /// Union of all subtree bounds from the last layout.
    bounds: Option<Rect>,
    measurer: Option<Box<dyn Measurer>>,
    on_changed: Option<ChangeObserver>,
    edit: Option<EditSession>,
    drag: Option<DragSession>,
}

impl MindMap {
    /// Create an empty mind map rendering into `viewport`.
    pub fn new(viewport: Viewport, config: MindMapConfig) -> Self {
        Self {
            store: IdeaStore::new(),
            history: UndoHistory::new(),
            spatial: SpatialIndex::new(),
            config,
            viewport,
            scale: 1.0,
            bounds: None,
            measurer: None,
            on_changed: None,
            edit: None,
            drag: None,
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn store(&self) -> &IdeaStore {
        &self.store
    }

    pub fn config(&self) -> &MindMapConfig {
        &self.config
    }

    /// Replace the configuration. Existing measurements are kept.
    pub fn set_config(&mut self, config: MindMapConfig) {
        self.config = config;
        self.update_scale(self.scale);
    }

    /// Bounds of everything laid out by the last redraw.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Install the observer called after every visible change.
    pub fn set_on_changed(&mut self, observer: impl FnMut(&ChangeNotice) + 'static) {
        self.on_changed = Some(Box::new(observer));
    }

    /// Install the measurer and re-measure every idea.
    pub fn set_measurer(&mut self, measurer: impl Measurer + 'static) {
        self.measurer = Some(Box::new(measurer));
        for idea in self.store.ideas_mut() {
            idea.invalidate_measure();
        }
        self.redraw();
    }

    /// Inject a measurement for one idea.
    pub fn set_measure(&mut self, id: IdeaId, measure: Measure) {
        let Some(level) = self.store.level(id) else {
            return;
        };
        if let Some(idea) = self.store.get_mut(id) {
            idea.set_measure(measure, level);
        }
        self.redraw();
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Run `f` as one undoable action.
    ///
    /// Records are snapshotted before and after; the difference becomes one
    /// undo group. An action that changes nothing records nothing.
    pub fn transact<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let snapshot = self.store.records();
        let result = f(self);
        self.redraw();
        self.record_since(&snapshot);
        self.notify(true);
        result
    }

    fn record_since(&mut self, snapshot: &[IdeaRecord]) {
        let changes = diff(snapshot, &self.store.records());
        let count = changes.len();
        if self.history.record(changes) {
            debug!(changes = count, "recorded undo group");
        } else {
            trace!("action changed nothing");
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the last action. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.commit_edit();
        match self.history.undo(&mut self.store) {
            Some(count) => {
                debug!(changes = count, "undo");
                self.changed(true);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone action. Returns false if there was nothing
    /// to redo.
    pub fn redo(&mut self) -> bool {
        self.commit_edit();
        match self.history.redo(&mut self.store) {
            Some(count) => {
                debug!(changes = count, "redo");
                self.changed(true);
                true
            }
            None => false,
        }
    }

    /// Forget all undo and redo history.
    pub fn clear_undo_redo(&mut self) {
        self.history.clear();
        self.notify(false);
    }

    // =========================================================================
    // Redraw
    // =========================================================================

    /// Measure stale ideas, lay out softly and refresh the spatial index.
    pub fn redraw(&mut self) {
        self.measure_stale();
        self.bounds = TreeLayout::new(&mut self.store, false).layout_all();
        self.rebuild_spatial();
    }

    /// Redraw and tell the observer.
    pub fn changed(&mut self, animate: bool) {
        self.redraw();
        self.notify(animate);
    }

    fn notify(&mut self, animate: bool) {
        let notice = ChangeNotice {
            animate,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            idea_count: self.store.len(),
            selected_count: self.store.selected().len(),
        };
        if let Some(observer) = self.on_changed.as_mut() {
            observer(&notice);
        }
    }

    fn measure_stale(&mut self) {
        let stale: Vec<(IdeaId, u32)> = self
            .store
            .ideas()
            .filter_map(|idea| {
                let level = self.store.level(idea.id())?;
                idea.needs_measure(level).then_some((idea.id(), level))
            })
            .collect();

        for (id, level) in stale {
            let measured = match (&self.measurer, self.store.get(id)) {
                (Some(measurer), Some(idea)) => measurer.measure(idea, level),
                _ => None,
            };
            let measure = measured.unwrap_or_else(|| self.config.default_measure.clone());
            if let Some(idea) = self.store.get_mut(id) {
                idea.set_measure(measure, level);
            }
        }
    }

    fn rebuild_spatial(&mut self) {
        let boxes: Vec<IdeaBox> = self
            .store
            .ideas()
            .map(|idea| idea.id())
            .filter(|&id| !self.store.is_hidden(id))
            .filter_map(|id| {
                let rect = self.store.rect(id)?;
                Some(IdeaBox::new(id, rect, rect.center()))
            })
            .collect();
        self.spatial.rebuild(boxes);
    }

    // =========================================================================
    // Load / save
    // =========================================================================

    /// Merge records from a JSON array into the map as one undoable action.
    pub fn load(&mut self, json: &str) -> Result<()> {
        let records: Vec<IdeaRecord> = serde_json::from_str(json).inspect_err(|error| {
            warn!(%error, "rejected malformed idea records");
        })?;
        self.from_records(records);
        Ok(())
    }

    /// Serialize all ideas to a JSON array ordered by id.
    pub fn save(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.store.records())?)
    }

    /// Add or replace ideas by id as one undoable action.
    pub fn from_records(&mut self, records: Vec<IdeaRecord>) {
        info!(records = records.len(), "loading ideas");
        self.transact(|map| {
            for record in &records {
                map.store.add(record);
            }
        });
    }

    /// All ideas as persisted records, ordered by id.
    pub fn to_records(&self) -> Vec<IdeaRecord> {
        self.store.records()
    }
}
