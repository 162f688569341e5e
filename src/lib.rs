//! Mind Map - WASM Module
//!
//! This module provides the editor core of the mind map: the idea tree, its
//! radial layout and the undo/redo history. It is compiled to WebAssembly
//! and exposes a JavaScript-friendly API via wasm-bindgen; rendering and
//! text measurement stay on the JavaScript side.
//!
//! # Architecture
//!
//! - `geometry`: Points and rectangles in model space
//! - `tree`: Idea records and the idea store built on petgraph's StableGraph
//! - `layout`: Radial tree layout (forced and soft)
//! - `history`: Snapshot diffs and the undo/redo stacks
//! - `spatial`: R-tree index for hit testing and directional navigation
//! - `mind_map`: The editor core tying everything together

use js_sys::Function;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod mind_map;
pub mod spatial;
pub mod tree;

use config::MindMapConfig;
use error::MindMapError;
use geometry::Point;
use mind_map::{DragKind, MindMap, Measurer, Viewport};
use tree::{Idea, IdeaId, IdeaRecord, Measure};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Mount a mind map onto `element`.
///
/// The element's size becomes the viewport. Fails if no element is given.
#[wasm_bindgen]
pub fn init(element: Option<web_sys::HtmlElement>) -> Result<MindMapWasm, JsError> {
    let element = element.ok_or(MindMapError::MissingMount)?;
    Ok(MindMapWasm::new(
        f64::from(element.offset_width()),
        f64::from(element.offset_height()),
    ))
}

/// Measures ideas by calling back into JavaScript.
///
/// The callback receives `(id, level, title)` and returns a measure object,
/// or anything else to use the default measurement.
struct JsMeasurer {
    callback: Function,
}

impl Measurer for JsMeasurer {
    fn measure(&self, idea: &Idea, level: u32) -> Option<Measure> {
        let value = self
            .callback
            .call3(
                &JsValue::NULL,
                &JsValue::from(idea.id().raw()),
                &JsValue::from(level),
                &JsValue::from_str(&idea.title),
            )
            .ok()?;
        serde_wasm_bindgen::from_value(value).ok()
    }
}

/// Main entry point for the mind map.
///
/// This struct wraps the internal MindMap and provides the public API
/// exposed to JavaScript. Callbacks must not call back into the same
/// instance.
#[wasm_bindgen]
pub struct MindMapWasm {
    map: MindMap,
}

#[wasm_bindgen]
impl MindMapWasm {
    /// Create an empty mind map for a viewport of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            map: MindMap::new(Viewport::new(width, height), MindMapConfig::default()),
        }
    }

    /// Replace the configuration with a plain object; missing fields take
    /// their defaults.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let config: MindMapConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| MindMapError::InvalidConfig(e.to_string()))?;
        self.map.set_config(config);
        Ok(())
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Merge a JSON array of idea records as one undoable action.
    pub fn load(&mut self, json: &str) -> Result<(), JsError> {
        self.map.load(json).map_err(|e| {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
            JsError::from(e)
        })
    }

    /// Serialize all ideas to a JSON array.
    pub fn save(&self) -> Result<String, JsError> {
        Ok(self.map.save()?)
    }

    /// Merge an array of record objects as one undoable action.
    #[wasm_bindgen(js_name = fromModels)]
    pub fn from_models(&mut self, records: JsValue) -> Result<(), JsError> {
        let records: Vec<IdeaRecord> = serde_wasm_bindgen::from_value(records)
            .map_err(|e| MindMapError::InvalidRecords(e.to_string()))?;
        self.map.from_records(records);
        Ok(())
    }

    /// All ideas as record objects, ordered by id.
    #[wasm_bindgen(js_name = toModels)]
    pub fn to_models(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.map.to_records()).unwrap_or(JsValue::NULL)
    }

    // =========================================================================
    // Undo / Redo
    // =========================================================================

    pub fn undo(&mut self) -> bool {
        self.map.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.map.redo()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.map.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.map.can_redo()
    }

    #[wasm_bindgen(js_name = clearUndoRedo)]
    pub fn clear_undo_redo(&mut self) {
        self.map.clear_undo_redo();
    }

    // =========================================================================
    // Commands
    // =========================================================================

    #[wasm_bindgen(js_name = nextId)]
    pub fn next_id(&self) -> u32 {
        self.map.next_id().raw()
    }

    pub fn collapse(&mut self) {
        self.map.collapse();
    }

    #[wasm_bindgen(js_name = canCollapse)]
    pub fn can_collapse(&self) -> bool {
        self.map.can_collapse()
    }

    pub fn expand(&mut self) {
        self.map.expand();
    }

    #[wasm_bindgen(js_name = canExpand)]
    pub fn can_expand(&self) -> bool {
        self.map.can_expand()
    }

    pub fn mark(&mut self) {
        self.map.mark();
    }

    #[wasm_bindgen(js_name = canMark)]
    pub fn can_mark(&self) -> bool {
        self.map.can_mark()
    }

    /// Lay out the selected subtrees, or the whole map if nothing is
    /// selected. `force` discards manual positions.
    pub fn layout(&mut self, force: bool) {
        self.map.layout(force);
    }

    #[wasm_bindgen(js_name = canLayout)]
    pub fn can_layout(&self) -> bool {
        self.map.can_layout()
    }

    /// Add a child to the selected idea. Returns the new idea's id.
    #[wasm_bindgen(js_name = addChild)]
    pub fn add_child(&mut self) -> Option<u32> {
        self.map.add_child().map(IdeaId::raw)
    }

    #[wasm_bindgen(js_name = canAddChild)]
    pub fn can_add_child(&self) -> bool {
        self.map.can_add_child()
    }

    /// Add a sibling below the selected idea. Returns the new idea's id.
    #[wasm_bindgen(js_name = addSibling)]
    pub fn add_sibling(&mut self) -> Option<u32> {
        self.map.add_sibling().map(IdeaId::raw)
    }

    #[wasm_bindgen(js_name = canAddSibling)]
    pub fn can_add_sibling(&self) -> bool {
        self.map.can_add_sibling()
    }

    #[wasm_bindgen(js_name = removeSelected)]
    pub fn remove_selected(&mut self) {
        self.map.remove_selected();
    }

    #[wasm_bindgen(js_name = canRemove)]
    pub fn can_remove(&self) -> bool {
        self.map.can_remove()
    }

    // =========================================================================
    // Selection and Navigation
    // =========================================================================

    /// Selected idea ids in ascending order.
    pub fn selected(&self) -> Vec<u32> {
        self.map.selected().into_iter().map(IdeaId::raw).collect()
    }

    #[wasm_bindgen(js_name = selectOnly)]
    pub fn select_only(&mut self, id: u32) {
        self.map.select_only(IdeaId(id));
    }

    #[wasm_bindgen(js_name = clickIdea)]
    pub fn click_idea(&mut self, id: u32, toggle: bool) {
        self.map.click_idea(IdeaId(id), toggle);
    }

    #[wasm_bindgen(js_name = clickBackground)]
    pub fn click_background(&mut self) {
        self.map.click_background();
    }

    #[wasm_bindgen(js_name = arrowUp)]
    pub fn arrow_up(&mut self) -> Option<u32> {
        self.map.arrow_up().map(IdeaId::raw)
    }

    #[wasm_bindgen(js_name = arrowDown)]
    pub fn arrow_down(&mut self) -> Option<u32> {
        self.map.arrow_down().map(IdeaId::raw)
    }

    #[wasm_bindgen(js_name = arrowLeft)]
    pub fn arrow_left(&mut self) -> Option<u32> {
        self.map.arrow_left().map(IdeaId::raw)
    }

    #[wasm_bindgen(js_name = arrowRight)]
    pub fn arrow_right(&mut self) -> Option<u32> {
        self.map.arrow_right().map(IdeaId::raw)
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    pub fn scale(&self) -> f64 {
        self.map.scale()
    }

    #[wasm_bindgen(js_name = scaleUp)]
    pub fn scale_up(&mut self) {
        self.map.scale_up();
    }

    #[wasm_bindgen(js_name = scaleDown)]
    pub fn scale_down(&mut self) {
        self.map.scale_down();
    }

    #[wasm_bindgen(js_name = fitToContainer)]
    pub fn fit_to_container(&mut self) {
        self.map.fit_to_container();
    }

    /// Zoom around the pointer. Returns false if the event should be left
    /// to the page.
    #[wasm_bindgen(js_name = turnWheel)]
    pub fn turn_wheel(&mut self, delta_y: f64, x: f64, y: f64, ctrl: bool) -> bool {
        self.map.turn_wheel(delta_y, Point::new(x, y), ctrl)
    }

    /// Adopt the mount element's current size.
    #[wasm_bindgen(js_name = syncViewport)]
    pub fn sync_viewport(&mut self, width: f64, height: f64) -> bool {
        self.map.sync_viewport(width, height)
    }

    /// Get the bounding box of the laid out map.
    ///
    /// Returns [left, top, right, bottom], or None if the map is empty.
    pub fn bounds(&self) -> Option<Vec<f64>> {
        self.map
            .bounds()
            .map(|rect| vec![rect.left, rect.top, rect.right(), rect.bottom()])
    }

    // =========================================================================
    // Dragging
    // =========================================================================

    /// Start a press at viewport pixel (x, y).
    ///
    /// Returns the id of the idea under the pointer, or None when the press
    /// pans the map.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<u32> {
        match self.map.pointer_down(Point::new(x, y)) {
            DragKind::Idea(id) => Some(id.raw()),
            DragKind::Pan => None,
        }
    }

    /// Returns [x, y] of the dragged idea's ghost in display coordinates.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<Vec<f64>> {
        self.map
            .pointer_move(Point::new(x, y))
            .map(|ghost| vec![ghost.x, ghost.y])
    }

    /// Returns true if the press turned into a drag (and was not a click).
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.map.pointer_up(Point::new(x, y))
    }

    #[wasm_bindgen(js_name = cancelDrag)]
    pub fn cancel_drag(&mut self) {
        self.map.cancel_drag();
    }

    // =========================================================================
    // Title Editing
    // =========================================================================

    #[wasm_bindgen(js_name = editingIdea)]
    pub fn editing_idea(&self) -> Option<u32> {
        self.map.editing_idea().map(IdeaId::raw)
    }

    #[wasm_bindgen(js_name = beginEdit)]
    pub fn begin_edit(&mut self, id: u32) -> bool {
        self.map.begin_edit(IdeaId(id))
    }

    #[wasm_bindgen(js_name = editTitle)]
    pub fn edit_title(&mut self, title: &str) {
        self.map.edit_title(title);
    }

    #[wasm_bindgen(js_name = commitEdit)]
    pub fn commit_edit(&mut self) -> bool {
        self.map.commit_edit()
    }

    #[wasm_bindgen(js_name = cancelEdit)]
    pub fn cancel_edit(&mut self) {
        self.map.cancel_edit();
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Install the measuring callback `(id, level, title) => measure`.
    #[wasm_bindgen(js_name = setMeasurer)]
    pub fn set_measurer(&mut self, callback: Function) {
        self.map.set_measurer(JsMeasurer { callback });
    }

    /// Inject the measurement of one idea.
    #[wasm_bindgen(js_name = setMeasure)]
    pub fn set_measure(&mut self, id: u32, measure: JsValue) -> Result<(), JsError> {
        let measure: Measure = serde_wasm_bindgen::from_value(measure)
            .map_err(|e| MindMapError::InvalidConfig(e.to_string()))?;
        self.map.set_measure(IdeaId(id), measure);
        Ok(())
    }

    /// Install the callback invoked with a change notice after every
    /// visible change.
    #[wasm_bindgen(js_name = setOnChanged)]
    pub fn set_on_changed(&mut self, callback: Function) {
        self.map.set_on_changed(move |notice| {
            if let Ok(value) = serde_wasm_bindgen::to_value(notice) {
                if let Err(error) = callback.call1(&JsValue::NULL, &value) {
                    web_sys::console::error_1(&error);
                }
            }
        });
    }

    /// Everything the renderer needs for the next frame.
    #[wasm_bindgen(js_name = renderState)]
    pub fn render_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.map.render_state()).unwrap_or(JsValue::NULL)
    }
}

#[cfg(test)]
mod integration_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::history::{diff, Change};
    use crate::tree::IdeaStore;

    fn map_of(records: Vec<IdeaRecord>) -> MindMap {
        let mut map = MindMap::new(Viewport::new(1000.0, 800.0), MindMapConfig::default());
        map.from_records(records);
        map.clear_undo_redo();
        map
    }

    /// Two left children of one root, boxes 100x20 with margins of 10,
    /// stack with exactly one margin between them around the root.
    #[test]
    fn test_forced_layout_stacks_left_children() {
        let mut map = map_of(vec![
            IdeaRecord::root(IdeaId(1)),
            IdeaRecord::new(IdeaId(2), IdeaId(1)).with_pos(Point::new(-300.0, -70.0)),
            IdeaRecord::new(IdeaId(3), IdeaId(1)).with_pos(Point::new(-200.0, 90.0)),
        ]);
        map.set_measurer(|_: &Idea, _: u32| Some(Measure::boxed(100.0, 20.0, 10.0)));
        map.layout(true);

        let store = map.store();
        let upper = store.rect(IdeaId(2)).unwrap();
        let lower = store.rect(IdeaId(3)).unwrap();
        let root = store.rect(IdeaId(1)).unwrap();

        assert!(store.is_left(IdeaId(2)) && store.is_left(IdeaId(3)));
        assert_eq!(lower.top - upper.bottom(), 10.0);
        assert_eq!((upper.top + lower.bottom()) / 2.0, root.center().y);
        assert_eq!(upper.right() + 10.0, root.left);
    }

    #[test]
    fn test_forced_layout_twice_is_stable() {
        let mut map = map_of(vec![
            IdeaRecord::root(IdeaId(1)),
            IdeaRecord::new(IdeaId(2), IdeaId(1)).with_pos(Point::new(80.0, 30.0)),
            IdeaRecord::new(IdeaId(3), IdeaId(1)).with_pos(Point::new(90.0, 10.0)),
            IdeaRecord::new(IdeaId(4), IdeaId(3)).with_pos(Point::new(10.0, 0.0)),
            IdeaRecord::new(IdeaId(5), IdeaId(1)).with_pos(Point::new(-60.0, 0.0)),
        ]);
        map.layout(true);
        let once = map.to_records();
        map.layout(true);
        assert_eq!(map.to_records(), once);
    }

    #[test]
    fn test_title_change_is_minimal_undo_group() {
        let mut map = map_of(
            (1..=6)
                .map(|i| {
                    if i == 1 {
                        IdeaRecord::root(IdeaId(1))
                    } else {
                        IdeaRecord::new(IdeaId(i), IdeaId(1))
                            .with_pos(Point::new(150.0, f64::from(i) * 60.0))
                    }
                })
                .collect(),
        );
        let before = map.to_records();
        map.begin_edit(IdeaId(5));
        map.edit_title("five");
        assert!(map.commit_edit());

        let changes = diff(&before, &map.to_records());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].id(), IdeaId(5));
        assert!(matches!(changes[0], Change::Updated { .. }));

        assert!(map.undo());
        assert!(map.can_redo());
        assert!(map.redo());
        assert_eq!(map.store().get(IdeaId(5)).unwrap().title, "five");
    }

    #[test]
    fn test_remove_subtree_selects_parent() {
        let mut map = map_of(vec![
            IdeaRecord::root(IdeaId(1)),
            IdeaRecord::new(IdeaId(2), IdeaId(1)).with_pos(Point::new(150.0, 0.0)),
            IdeaRecord::new(IdeaId(3), IdeaId(2)).with_pos(Point::new(150.0, 0.0)),
            IdeaRecord::new(IdeaId(4), IdeaId(3)).with_pos(Point::new(150.0, 0.0)),
        ]);
        map.select_only(IdeaId(2));
        map.remove_selected();

        assert_eq!(map.store().ids(), vec![IdeaId(1)]);
        assert_eq!(map.selected(), vec![IdeaId(1)]);
        assert!(map.undo());
        assert!(!map.can_undo());
        assert_eq!(map.store().len(), 4);
    }

    #[test]
    fn test_undo_redo_tracks_stacks() {
        let mut map = map_of(vec![IdeaRecord::root(IdeaId(1))]);
        assert!(!map.redo());
        map.select_only(IdeaId(1));
        map.add_child();
        map.add_child();
        assert!(map.can_undo() && !map.can_redo());

        assert!(map.undo());
        assert!(map.can_undo() && map.can_redo());
        assert!(map.undo());
        assert!(!map.can_undo() && map.can_redo());
        assert_eq!(map.store().len(), 1);

        map.select_only(IdeaId(1));
        map.mark();
        assert!(!map.can_redo());
    }

    fn arb_tree() -> impl Strategy<Value = Vec<IdeaRecord>> {
        prop::collection::vec(
            (0usize..100, "[a-z ]{0,6}", -200i32..200, -200i32..200, any::<(bool, bool, bool)>()),
            1..24,
        )
        .prop_map(|entries| {
            entries
                .into_iter()
                .enumerate()
                .map(|(index, (parent, title, x, y, (selected, marked, collapsed)))| {
                    let id = IdeaId(index as u32 + 1);
                    let record = if index == 0 {
                        IdeaRecord::root(id)
                    } else {
                        IdeaRecord::new(id, IdeaId((parent % index) as u32 + 1))
                    };
                    record
                        .with_title(title)
                        .with_key(format!("k{index}"))
                        .with_pos(Point::new(f64::from(x), f64::from(y)))
                        .with_selected(selected)
                        .with_marked(marked)
                        .with_collapsed(collapsed)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn test_save_load_save_is_identity(records in arb_tree()) {
            let mut store = IdeaStore::new();
            for record in &records {
                store.add(record);
            }
            let saved = serde_json::to_string(&store.records()).unwrap();

            let loaded: Vec<IdeaRecord> = serde_json::from_str(&saved).unwrap();
            let mut copy = IdeaStore::new();
            for record in loaded.iter().rev() {
                copy.add(record);
            }
            prop_assert_eq!(copy.records(), store.records());
            prop_assert_eq!(serde_json::to_string(&copy.records()).unwrap(), saved);
        }
    }
}
