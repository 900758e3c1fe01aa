use flatbed_model::{ChangeLedger, ChangeRecord, RenameMap, Table};

use crate::error::Result;

/// A normalized table together with the per-column disposition ledger.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub table: Table,
    pub ledger: ChangeLedger,
}

/// Apply a declarative rename map under one of two policies.
///
/// Drop-rest (`drop_unlisted = true`): only columns named by a rule
/// survive, renamed, in rule order; every unlisted column is recorded as
/// deleted. Keep-rest: unlisted columns pass through unchanged in their
/// original order and listed columns are renamed in place. Rules whose
/// source is absent from the table are inert. Renaming with an empty map
/// under keep-rest is the identity transform.
pub fn normalize_schema(
    table: &Table,
    rename: &RenameMap,
    drop_unlisted: bool,
) -> Result<NormalizedTable> {
    let mut ledger = ChangeLedger::default();
    for name in table.columns() {
        match rename.target_for(name) {
            Some(target) if target != name => ledger.push(ChangeRecord::renamed(name, target)),
            Some(_) => ledger.push(ChangeRecord::unchanged(name)),
            None if drop_unlisted => ledger.push(ChangeRecord::deleted(name)),
            None => ledger.push(ChangeRecord::unchanged(name)),
        }
    }

    let table = if drop_unlisted {
        let surviving: Vec<(usize, &str)> = rename
            .rules()
            .iter()
            .filter_map(|rule| {
                table
                    .column_index(&rule.source)
                    .map(|index| (index, rule.target.as_str()))
            })
            .collect();
        let columns = surviving
            .iter()
            .map(|(_, target)| (*target).to_string())
            .collect();
        let mut projected = Table::new(columns)?;
        for row in table.rows() {
            projected.push_row(
                surviving
                    .iter()
                    .map(|(index, _)| row[*index].clone())
                    .collect(),
            )?;
        }
        projected
    } else {
        let columns = table
            .columns()
            .iter()
            .map(|name| {
                rename
                    .target_for(name)
                    .map(str::to_string)
                    .unwrap_or_else(|| name.clone())
            })
            .collect();
        let mut renamed = Table::new(columns)?;
        for row in table.rows() {
            renamed.push_row(row.clone())?;
        }
        renamed
    };

    Ok(NormalizedTable { table, ledger })
}
