//! Schema normalization under both keep-rest and drop-rest policies.

use flatbed_engine::normalize_schema;
use flatbed_model::{Disposition, RenameMap, RenameRule, Table};
use serde_json::{Value, json};

fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
    Table::from_rows(
        columns.iter().map(|name| (*name).to_string()).collect(),
        rows,
    )
    .expect("build table")
}

fn rename(rules: &[(&str, &str)]) -> RenameMap {
    RenameMap::new(
        rules
            .iter()
            .map(|(source, target)| RenameRule::new(*source, *target))
            .collect(),
    )
}

#[test]
fn empty_map_under_keep_rest_is_the_identity() {
    let input = table(
        &["id", "name", "extra"],
        vec![vec![json!(1), json!("Mod A"), Value::Null]],
    );
    let normalized = normalize_schema(&input, &RenameMap::empty(), false).expect("normalize");
    assert_eq!(normalized.table, input);
    assert!(
        normalized
            .ledger
            .records
            .iter()
            .all(|record| record.disposition == Disposition::Unchanged)
    );
}

#[test]
fn drop_rest_projects_to_the_target_columns_in_rule_order() {
    let input = table(
        &["id", "name", "extra"],
        vec![
            vec![json!(1), json!("Mod A"), json!("x")],
            vec![json!(2), json!("Mod B"), json!("y")],
        ],
    );
    let map = rename(&[("name", "module_name"), ("id", "module_id")]);
    let normalized = normalize_schema(&input, &map, true).expect("normalize");
    // Rule order, not table order.
    assert_eq!(normalized.table.columns(), ["module_name", "module_id"]);
    assert_eq!(normalized.table.cell(1, "module_id"), Some(&json!(2)));
    assert!(!normalized.table.has_column("extra"));
}

#[test]
fn drop_rest_records_unlisted_columns_as_deleted() {
    let input = table(
        &["id", "name", "extra"],
        vec![vec![json!(1), json!("Mod A"), json!("x")]],
    );
    let map = rename(&[("id", "module_id"), ("name", "module_name")]);
    let normalized = normalize_schema(&input, &map, true).expect("normalize");
    assert_eq!(normalized.table.columns(), ["module_id", "module_name"]);

    let extra = normalized
        .ledger
        .records
        .iter()
        .find(|record| record.original == "extra")
        .expect("ledger entry for extra");
    assert_eq!(extra.disposition, Disposition::Deleted);
    assert_eq!(extra.current, None);
    assert_eq!(normalized.ledger.deleted_count(), 1);
    assert_eq!(normalized.ledger.renamed_count(), 2);
}

#[test]
fn keep_rest_passes_unlisted_columns_through_in_place() {
    let input = table(
        &["id", "name", "extra"],
        vec![vec![json!(1), json!("Mod A"), json!("x")]],
    );
    let map = rename(&[("id", "module_id")]);
    let normalized = normalize_schema(&input, &map, false).expect("normalize");
    assert_eq!(normalized.table.columns(), ["module_id", "name", "extra"]);
    assert_eq!(normalized.table.cell(0, "extra"), Some(&json!("x")));

    let dispositions: Vec<Disposition> = normalized
        .ledger
        .records
        .iter()
        .map(|record| record.disposition)
        .collect();
    assert_eq!(
        dispositions,
        vec![
            Disposition::Renamed,
            Disposition::Unchanged,
            Disposition::Unchanged
        ]
    );
}

#[test]
fn identity_rules_are_recorded_as_unchanged() {
    let input = table(&["id"], vec![vec![json!(1)]]);
    let map = rename(&[("id", "id")]);
    let normalized = normalize_schema(&input, &map, true).expect("normalize");
    assert_eq!(normalized.table.columns(), ["id"]);
    assert_eq!(
        normalized.ledger.records[0].disposition,
        Disposition::Unchanged
    );
}

#[test]
fn rules_for_absent_columns_are_inert() {
    let input = table(&["id"], vec![vec![json!(1)]]);
    let map = rename(&[("id", "module_id"), ("ghost", "phantom")]);

    let dropped = normalize_schema(&input, &map, true).expect("drop-rest");
    assert_eq!(dropped.table.columns(), ["module_id"]);

    let kept = normalize_schema(&input, &map, false).expect("keep-rest");
    assert_eq!(kept.table.columns(), ["module_id"]);
    assert!(!kept.table.has_column("phantom"));
}

#[test]
fn a_rename_colliding_with_a_kept_column_is_an_error() {
    let input = table(&["id", "module_id"], vec![vec![json!(1), json!(2)]]);
    let map = rename(&[("id", "module_id")]);
    assert!(normalize_schema(&input, &map, false).is_err());
}
