#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Function, Reflect};
use mindmap_wasm::{init, MindMapWasm};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SAMPLE: &str = r#"[
    {"id": 1, "parentId": 1, "title": "root"},
    {"id": 2, "parentId": 1, "x": 150, "y": -40},
    {"id": 3, "parentId": 1, "x": 150, "y": 40},
    {"id": 4, "parentId": 3, "x": 150}
]"#;

fn sample() -> MindMapWasm {
    let mut map = MindMapWasm::new(1000.0, 800.0);
    map.load(SAMPLE).map_err(JsValue::from).unwrap();
    map.clear_undo_redo();
    map
}

#[wasm_bindgen_test]
fn init_without_element_fails() {
    assert!(init(None).is_err());
}

#[wasm_bindgen_test]
fn load_save_round_trip() {
    let map = sample();
    let saved = map.save().map_err(JsValue::from).unwrap();

    let mut copy = MindMapWasm::new(1000.0, 800.0);
    copy.load(&saved).map_err(JsValue::from).unwrap();
    assert_eq!(copy.save().map_err(JsValue::from).unwrap(), saved);
}

#[wasm_bindgen_test]
fn malformed_load_is_rejected() {
    let mut map = sample();
    assert!(map.load("[{\"id\": ").is_err());
    assert!(!map.can_undo());
}

#[wasm_bindgen_test]
fn commands_are_undoable() {
    let mut map = sample();
    map.select_only(3);
    assert_eq!(map.add_child(), Some(5));
    assert_eq!(map.selected(), vec![5]);

    assert!(map.undo());
    assert_eq!(map.selected(), vec![3]);
    assert!(map.can_redo());

    map.remove_selected();
    assert_eq!(map.selected(), vec![1]);
    assert!(!map.can_redo());
}

#[wasm_bindgen_test]
fn models_round_trip_through_js_values() {
    let map = sample();
    let models = map.to_models();
    assert_eq!(Array::from(&models).length(), 4);

    let mut copy = MindMapWasm::new(1000.0, 800.0);
    copy.from_models(models).map_err(JsValue::from).unwrap();
    assert_eq!(copy.save().map_err(JsValue::from).unwrap(), map.save().map_err(JsValue::from).unwrap());
    assert!(copy.from_models(JsValue::from_str("nope")).is_err());
}

#[wasm_bindgen_test]
fn config_object_is_read() {
    let mut map = sample();
    let config = js_sys::Object::new();
    Reflect::set(&config, &"editing".into(), &JsValue::FALSE).unwrap();
    map.set_config(config.into()).map_err(JsValue::from).unwrap();

    map.select_only(3);
    assert!(!map.can_add_child());
    assert!(map.set_config(JsValue::from_f64(1.0)).is_err());
}

#[wasm_bindgen_test]
fn js_measurer_sets_sizes() {
    let mut map = sample();
    let measurer = Function::new_with_args(
        "id, level, title",
        "return { width: 40 * level, height: 20, marginLeft: 5, marginRight: 5, \
         marginTop: 5, marginBottom: 5, connectionOffsets: [] };",
    );
    map.set_measurer(measurer);

    let state = map.render_state();
    let ideas = Array::from(&Reflect::get(&state, &"ideas".into()).unwrap());
    let root = ideas.get(0);
    assert_eq!(
        Reflect::get(&root, &"width".into()).unwrap().as_f64(),
        Some(40.0)
    );
    let child = ideas.get(1);
    assert_eq!(
        Reflect::get(&child, &"width".into()).unwrap().as_f64(),
        Some(80.0)
    );
}

#[wasm_bindgen_test]
fn observer_receives_notices() {
    let mut map = sample();
    let seen = Array::new();
    let global = js_sys::global();
    Reflect::set(&global, &"__mindMapNotices".into(), &seen).unwrap();
    map.set_on_changed(Function::new_with_args(
        "notice",
        "globalThis.__mindMapNotices.push(notice);",
    ));

    map.select_only(2);
    map.mark();
    assert!(seen.length() >= 2);
    let last = seen.get(seen.length() - 1);
    assert_eq!(
        Reflect::get(&last, &"canUndo".into()).unwrap().as_bool(),
        Some(true)
    );
}
