use serde_json::{json, Value};
use smelter_core::recipe::patch::{flag_byproducts, verify_byproducts};
use smelter_core::SmeltError;

#[test]
fn flags_every_entry_in_both_lists() {
    let mut doc = json!({
        "name": "Steam",
        "input": [{"item": "Water", "amount": 60}],
        "output": [{"item": "Steam"}, {"item": "Sludge", "byproduct": true}],
    });

    let stats = flag_byproducts(&mut doc).expect("patch");
    assert_eq!(stats.flagged, 3);
    assert_eq!(stats.overwritten, 1);

    assert_eq!(doc["input"][0]["byproduct"], Value::Bool(false));
    assert_eq!(doc["output"][0]["byproduct"], Value::Bool(false));
    assert_eq!(doc["output"][1]["byproduct"], Value::Bool(false), "prior value must be overwritten");
    assert_eq!(doc["input"][0]["amount"], json!(60), "unrelated keys must survive");
}

#[test]
fn water_steam_documents_gain_the_flag() {
    let mut doc: Value =
        serde_json::from_str(r#"{"input": [{"item": "Water"}], "output": [{"item": "Steam"}]}"#)
            .expect("parse");
    flag_byproducts(&mut doc).expect("patch");

    // Key order is preserved; the new flag lands at the end of each entry.
    assert_eq!(
        serde_json::to_string(&doc).expect("serialize"),
        r#"{"input":[{"item":"Water","byproduct":false}],"output":[{"item":"Steam","byproduct":false}]}"#
    );
}

#[test]
fn patching_is_idempotent() {
    let mut doc = json!({"input": [{"item": "Ore"}], "output": [{"item": "Ingot"}]});
    flag_byproducts(&mut doc).expect("first pass");
    let once = serde_json::to_string(&doc).expect("serialize");

    let stats = flag_byproducts(&mut doc).expect("second pass");
    assert_eq!(serde_json::to_string(&doc).expect("serialize"), once);
    assert_eq!(stats.overwritten, 2, "second pass overwrites the flags it planted");
}

#[test]
fn empty_lists_are_fine() {
    let mut doc = json!({"input": [], "output": []});
    let stats = flag_byproducts(&mut doc).expect("patch");
    assert_eq!(stats.flagged, 0);
}

#[test]
fn missing_lists_abort() {
    let mut doc = json!({"output": []});
    let err = flag_byproducts(&mut doc).unwrap_err();
    assert!(matches!(err, SmeltError::RecipeDoc(_)));
    assert!(err.to_string().contains("input"));

    let mut doc = json!({"input": []});
    let err = flag_byproducts(&mut doc).unwrap_err();
    assert!(err.to_string().contains("output"));
}

#[test]
fn non_object_shapes_abort() {
    let mut doc = json!(["not", "an", "object"]);
    assert!(flag_byproducts(&mut doc).is_err());

    let mut doc = json!({"input": {"item": "Water"}, "output": []});
    assert!(flag_byproducts(&mut doc).is_err(), "lists must be arrays");

    let mut doc = json!({"input": ["Water"], "output": []});
    assert!(flag_byproducts(&mut doc).is_err(), "list entries must be objects");
}

#[test]
fn verify_reports_missing_and_non_bool() {
    let doc = json!({
        "input": [{"item": "A", "byproduct": false}, {"item": "B"}],
        "output": [{"item": "C", "byproduct": "no"}],
    });

    let stats = verify_byproducts(&doc).expect("verify");
    assert_eq!(stats.entries, 3);
    assert_eq!(stats.missing, 1);
    assert_eq!(stats.non_bool, 1);
    assert!(!stats.is_clean());
}

#[test]
fn verify_accepts_a_patched_document() {
    let mut doc = json!({
        "input": [{"item": "Iron Ore"}],
        "output": [{"item": "Iron Ingot"}, {"item": "Slag"}],
    });
    flag_byproducts(&mut doc).expect("patch");

    let stats = verify_byproducts(&doc).expect("verify");
    assert_eq!(stats.entries, 3);
    assert!(stats.is_clean());
}
