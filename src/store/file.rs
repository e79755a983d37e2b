use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;
use crate::model::{Entry, User};

/// On-disk form of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub entries: Vec<Entry>,

    #[serde(default)]
    pub users: Vec<User>,
}

pub async fn load(path: &Path) -> Result<Document> {
    if !fs::try_exists(path).await? {
        info!(path = %path.display(), "no store file yet, starting empty");
        return Ok(Document::default());
    }

    let data = fs::read_to_string(path).await?;
    let doc: Document = serde_json::from_str(&data)?;

    info!(
        path = %path.display(),
        entries = doc.entries.len(),
        users = doc.users.len(),
        "store loaded"
    );

    Ok(doc)
}

pub async fn save(path: &Path, mut doc: Document) -> Result<()> {
    sort_document(&mut doc);

    let json = serde_json::to_string_pretty(&doc)?;
    write_atomic(path, json.as_bytes()).await?;

    debug!(path = %path.display(), entries = doc.entries.len(), "store saved");
    Ok(())
}

fn sort_document(doc: &mut Document) {
    doc.entries.sort_by(|a, b| {
        (a.definition_node.as_str(), a.id.as_str()).cmp(&(b.definition_node.as_str(), b.id.as_str()))
    });
    doc.users.sort_by(|a, b| a.id.cmp(&b.id));
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent).await?;
    }

    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "store".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
