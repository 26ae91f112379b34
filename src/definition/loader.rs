use std::path::Path;

use crate::category::PiiCategory;
use crate::error::{PiiError, Result};

use super::TaskSpec;

/// Read a definition batch (task file) from disk.
///
/// `.yaml`/`.yml` files are parsed as YAML, anything else as JSON. The file
/// must hold a list of records, and every record must name a known
/// category; the rest of the validation happens when the batch is added.
pub fn read_taskfile(path: &Path) -> Result<Vec<TaskSpec>> {
    let contents = std::fs::read_to_string(path).map_err(|e| PiiError::InvalidDefinition {
        reason: format!("cannot read taskfile '{}': {e}", path.display()),
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    parse_batch(&contents, is_yaml).map_err(|e| PiiError::InvalidDefinition {
        reason: format!("invalid task spec file {}: {e}", path.display()),
    })
}

/// Parse a batch from text, JSON or YAML.
pub fn parse_batch(contents: &str, yaml: bool) -> std::result::Result<Vec<TaskSpec>, String> {
    let batch: Vec<TaskSpec> = if yaml {
        serde_yaml::from_str(contents).map_err(|e| e.to_string())?
    } else {
        serde_json::from_str(contents).map_err(|e| e.to_string())?
    };
    for (i, spec) in batch.iter().enumerate() {
        match spec.category.as_deref() {
            None => return Err(format!("missing 'category' field in record #{i}")),
            Some(name) => {
                name.parse::<PiiCategory>()
                    .map_err(|e| format!("record #{i}: {e}"))?;
            }
        }
    }
    Ok(batch)
}
