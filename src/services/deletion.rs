use serde::Serialize;
use tracing::info;

use crate::error::{DictError, Result};
use crate::model::ObjectId;
use crate::store::{Filter, Store};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletion {
    pub definition_node: ObjectId,
    pub deleted: usize,
}

/// Removes every entry sharing the definition node of `entry_id`, as one unit.
pub async fn delete_node(store: &Store, entry_id: &str) -> Result<Deletion> {
    let id: ObjectId = entry_id
        .parse()
        .map_err(|_| DictError::NotFound(format!("Entry {entry_id}")))?;

    let mut tx = store.begin().await;

    let entry = tx
        .find_one(&Filter::by_id(id))
        .ok_or_else(|| DictError::NotFound(format!("Entry {entry_id}")))?;

    let deleted = tx.delete_by_definition_node(&entry.definition_node);
    tx.commit().await?;

    info!(node = %entry.definition_node, deleted, "definition node deleted");

    Ok(Deletion {
        definition_node: entry.definition_node,
        deleted,
    })
}
