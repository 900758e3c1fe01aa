//! Unroll and flatten behavior, including the module/items scenario the
//! whole pipeline is shaped around.

use flatbed_engine::{EngineError, flatten_map, unroll_list};
use flatbed_model::Table;
use serde_json::{Value, json};

fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
    Table::from_rows(
        columns.iter().map(|name| (*name).to_string()).collect(),
        rows,
    )
    .expect("build table")
}

#[test]
fn modules_with_items_unroll_then_flatten() {
    let modules = table(
        &["id", "name", "items"],
        vec![vec![
            json!(1),
            json!("Mod A"),
            json!([
                {"id": 10, "title": "Page"},
                {"id": 11, "title": "Quiz"}
            ]),
        ]],
    );

    let unrolled = unroll_list(&modules, "items").expect("unroll");
    assert_eq!(unrolled.height(), 2);

    let flattened = flatten_map(&unrolled, "items", "items_").expect("flatten");
    assert_eq!(flattened.columns(), ["id", "name", "items_id", "items_title"]);
    assert_eq!(flattened.cell(0, "items_id"), Some(&json!("10")));
    assert_eq!(flattened.cell(0, "items_title"), Some(&json!("Page")));
    assert_eq!(flattened.cell(1, "items_id"), Some(&json!("11")));
    assert_eq!(flattened.cell(1, "items_title"), Some(&json!("Quiz")));
    assert_eq!(flattened.cell(1, "name"), Some(&json!("Mod A")));
}

#[test]
fn unroll_row_count_is_the_sum_of_sequence_lengths() {
    let input = table(
        &["id", "items"],
        vec![
            vec![json!(1), json!(["a", "b", "c"])],
            vec![json!(2), json!([])],
            vec![json!(3), Value::Null],
            vec![json!(4), json!(["d"])],
        ],
    );
    let unrolled = unroll_list(&input, "items").expect("unroll");
    // 3 + 0 + 0 + 1: empty and null sequences drop their source row.
    assert_eq!(unrolled.height(), 4);
    assert_eq!(unrolled.cell(0, "items"), Some(&json!("a")));
    assert_eq!(unrolled.cell(3, "id"), Some(&json!(4)));
}

#[test]
fn unroll_preserves_element_and_row_order() {
    let input = table(
        &["id", "items"],
        vec![
            vec![json!(1), json!([1, 2])],
            vec![json!(2), json!([3])],
        ],
    );
    let unrolled = unroll_list(&input, "items").expect("unroll");
    let observed: Vec<&Value> = (0..unrolled.height())
        .filter_map(|row| unrolled.cell(row, "items"))
        .collect();
    assert_eq!(observed, vec![&json!(1), &json!(2), &json!(3)]);
}

#[test]
fn unroll_treats_a_scalar_cell_as_a_singleton() {
    let input = table(&["id", "items"], vec![vec![json!(1), json!("only")]]);
    let unrolled = unroll_list(&input, "items").expect("unroll");
    assert_eq!(unrolled.height(), 1);
    assert_eq!(unrolled.cell(0, "items"), Some(&json!("only")));
}

#[test]
fn unroll_of_a_missing_column_is_reported_as_such() {
    let input = table(&["id"], vec![vec![json!(1)]]);
    let error = unroll_list(&input, "items").expect_err("missing column");
    assert!(error.is_missing_column());
}

#[test]
fn flatten_decodes_text_encoded_mappings() {
    let input = table(
        &["id", "completion_requirement"],
        vec![
            vec![json!(1), json!(r#"{"type": "must_view", "completed": true}"#)],
            vec![json!(2), Value::Null],
        ],
    );
    let flattened = flatten_map(&input, "completion_requirement", "req_").expect("flatten");
    assert_eq!(flattened.columns(), ["id", "req_type", "req_completed"]);
    assert_eq!(flattened.cell(0, "req_type"), Some(&json!("must_view")));
    assert_eq!(flattened.cell(0, "req_completed"), Some(&json!("true")));
    // A null cell contributes null to every derived column.
    assert_eq!(flattened.cell(1, "req_type"), Some(&Value::Null));
    assert_eq!(flattened.cell(1, "req_completed"), Some(&Value::Null));
}

#[test]
fn flatten_does_not_double_an_existing_prefix() {
    let input = table(
        &["id", "items"],
        vec![vec![json!(1), json!({"items_id": 10, "title": "Page"})]],
    );
    let flattened = flatten_map(&input, "items", "items_").expect("flatten");
    assert_eq!(flattened.columns(), ["id", "items_id", "items_title"]);
}

#[test]
fn flatten_collects_keys_across_rows_in_first_seen_order() {
    let input = table(
        &["id", "grades"],
        vec![
            vec![json!(1), json!({"current_score": 91})],
            vec![json!(2), json!({"current_score": 72, "final_score": 70})],
        ],
    );
    let flattened = flatten_map(&input, "grades", "grades_").expect("flatten");
    assert_eq!(
        flattened.columns(),
        ["id", "grades_current_score", "grades_final_score"]
    );
    // Row 1 never observed final_score, so its derived cell is null.
    assert_eq!(flattened.cell(0, "grades_final_score"), Some(&Value::Null));
    assert_eq!(flattened.cell(1, "grades_final_score"), Some(&json!("70")));
}

#[test]
fn flatten_stringifies_nested_values() {
    let input = table(
        &["id", "meta"],
        vec![vec![json!(1), json!({"tags": ["a", "b"], "score": 9.0})]],
    );
    let flattened = flatten_map(&input, "meta", "meta_").expect("flatten");
    assert_eq!(flattened.cell(0, "meta_tags"), Some(&json!("[\"a\",\"b\"]")));
    assert_eq!(flattened.cell(0, "meta_score"), Some(&json!("9")));
}

#[test]
fn colliding_derived_names_are_ambiguous_not_overwritten() {
    // "id" derives "items_id", and the literal key "items_id" keeps its
    // name; the two must not be merged silently.
    let input = table(
        &["row", "items"],
        vec![vec![json!(1), json!({"id": 10, "items_id": 11})]],
    );
    let error = flatten_map(&input, "items", "items_").expect_err("collision");
    match error {
        EngineError::AmbiguousFlattening { derived, .. } => {
            assert_eq!(derived, "items_id");
        }
        other => panic!("expected AmbiguousFlattening, got {other}"),
    }
}

#[test]
fn derived_name_shadowing_a_kept_column_is_rejected() {
    let input = table(
        &["items_id", "items"],
        vec![vec![json!(1), json!({"id": 2})]],
    );
    assert!(flatten_map(&input, "items", "items_").is_err());
}

#[test]
fn non_mapping_cells_are_invalid() {
    let input = table(&["id", "items"], vec![vec![json!(1), json!(42)]]);
    let error = flatten_map(&input, "items", "items_").expect_err("bad cell");
    assert!(matches!(error, EngineError::InvalidMapCell { row: 0, .. }));

    let text = table(&["id", "items"], vec![vec![json!(1), json!("not json")]]);
    assert!(flatten_map(&text, "items", "items_").is_err());
}

#[test]
fn flatten_of_a_missing_column_is_reported_as_such() {
    let input = table(&["id"], vec![vec![json!(1)]]);
    let error = flatten_map(&input, "items", "items_").expect_err("missing column");
    assert!(error.is_missing_column());
}
