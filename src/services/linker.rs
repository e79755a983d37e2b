//! Node linker: find-or-create of a translation pair.
//!
//! A submission is `"<text>@<language>"`. The entry and its optional mirror
//! are parsed, cross-linked, and then looked up and (if new) inserted inside
//! a single store transaction, so two identical submissions racing each other
//! still end up sharing one definition node.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DictError, Result};
use crate::model::{Entry, ObjectId};
use crate::parsers::submission;
use crate::store::{Filter, Store};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A matching node already existed; nothing was written.
    Tenured,
    New,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Tenured => "Node already exists",
            Outcome::New => "Node made",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Linked {
    pub entry: Entry,
    pub mirror: Option<Entry>,
    pub definition_node: ObjectId,
    pub outcome: Outcome,
}

pub async fn link(
    store: &Store,
    user: Option<&ObjectId>,
    entry_submission: Option<&str>,
    mirror_submission: Option<&str>,
) -> Result<Linked> {
    let (mut entry_draft, mirror_draft) =
        submission::parse_pair(entry_submission, mirror_submission)?;

    let mut tx = store.begin().await;

    let author = user
        .and_then(|id| tx.find_user(id))
        .ok_or(DictError::UserNotFound)?;

    let mut lookup = Filter::default();
    lookup.index = Some(entry_draft.index.clone());
    lookup.language = entry_draft.language;
    lookup.mirror = entry_draft.mirror.clone();
    lookup.mirror_language = entry_draft.mirror_language;

    if let Some(entry) = tx.find_one(&lookup) {
        let node = entry.definition_node.clone();
        let mirror = tx
            .find(&Filter::by_node(node.clone()))
            .into_iter()
            .find(|e| e.mirrors(&entry));

        tx.commit().await?;
        debug!(%node, index = %entry.index, "submission matched existing node");

        return Ok(Linked {
            entry,
            mirror,
            definition_node: node,
            outcome: Outcome::Tenured,
        });
    }

    let node = ObjectId::new();

    entry_draft.author = Some(author.id.clone());
    entry_draft.definition_node = Some(node.clone());
    let mut drafts = vec![entry_draft];

    if let Some(mut m) = mirror_draft {
        m.author = Some(author.id.clone());
        m.definition_node = Some(node.clone());
        drafts.push(m);
    }

    let mut created = tx.insert_many(drafts)?.into_iter();
    tx.commit().await?;

    let entry = created
        .next()
        .ok_or_else(|| DictError::Infrastructure("insert returned no records".into()))?;
    let mirror = created.next();

    info!(
        %node,
        author = %author.id,
        entry = %entry.index,
        mirror = mirror.as_ref().map(|m| m.index.as_str()),
        "definition node created"
    );

    Ok(Linked {
        entry,
        mirror,
        definition_node: node,
        outcome: Outcome::New,
    })
}
