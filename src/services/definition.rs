use serde::Serialize;

use crate::error::{DictError, Result};
use crate::model::{Entry, ObjectId, User};
use crate::store::{Filter, Store};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub definition_node: ObjectId,
    pub entries: Vec<Entry>,
    pub author: Option<User>,
}

/// Entries of one definition node with the author of its first entry.
pub async fn definition(store: &Store, node_id: &str) -> Result<Definition> {
    let not_found = || DictError::NotFound(format!("Definition {node_id}"));

    let node: ObjectId = node_id.parse().map_err(|_| not_found())?;
    let entries = store.find(&Filter::by_node(node.clone())).await?;

    let first = entries.first().ok_or_else(not_found)?;
    let author = store.find_user(&first.author).await?;

    Ok(Definition {
        definition_node: node,
        entries,
        author,
    })
}
