//! Registry presentation: implementation listings.

use super::to_json;
use crate::error::ApiError;
use crate::registry::ImplementationEntry;
use comfy_table::Table;

pub fn format_registry_list_text(entries: &[ImplementationEntry]) -> String {
    if entries.is_empty() {
        return "No implementations registered.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Implementation", "Contract Type", "Version", "Status"]);
    for entry in entries {
        let (contract_type, version) = match entry.kind {
            Some(kind) => (kind.type_name(), kind.version.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        let status = if entry.approved { "approved" } else { "revoked" };
        table.add_row(vec![
            entry.address.to_string(),
            contract_type,
            version,
            status.to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_registry_list_json(entries: &[ImplementationEntry]) -> Result<String, ApiError> {
    let rows: Vec<serde_json::Value> = entries
        .iter()
        .map(|e| {
            serde_json::json!({
                "implementation": e.address.to_string(),
                "contract_type": e.kind.map(|k| k.type_name()),
                "version": e.kind.map(|k| k.version),
                "approved": e.approved,
            })
        })
        .collect();
    to_json(&serde_json::Value::Array(rows))
}
