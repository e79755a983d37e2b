use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::{DictError, Result};
use crate::model::{Entry, Language};
use crate::parsers::submission::split_language;
use crate::store::{Filter, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub term: String,
    pub language: Option<Language>,
}

/// Parses `term[@language]`. Returns `None` when there is nothing to look for,
/// which includes a language no entry can carry.
pub fn parse_query(q: &str) -> Option<Query> {
    let (term, lang) = split_language(q);
    if term.is_empty() {
        return None;
    }

    let language = match lang.filter(|l| !l.is_empty()) {
        Some(l) => match l.parse::<Language>() {
            Ok(language) => Some(language),
            Err(_) => {
                debug!(language = l, "search language not recognized");
                return None;
            }
        },
        None => None,
    };

    Some(Query {
        term: term.to_string(),
        language,
    })
}

/// Case-insensitive whole-word match on the term, which is taken literally.
pub fn whole_word(term: &str) -> Result<Regex> {
    RegexBuilder::new(&format!(r"(^|\s){}($|\s)", regex::escape(term)))
        .case_insensitive(true)
        .build()
        .map_err(|e| DictError::invalid(e.to_string()))
}

pub async fn search(store: &Store, q: Option<&str>) -> Result<Vec<Entry>> {
    let query = match q.and_then(parse_query) {
        Some(query) => query,
        None => return Ok(Vec::new()),
    };

    let mut filter = Filter::matching(whole_word(&query.term)?);
    if let Some(language) = query.language {
        filter = filter.with_language(language);
    }

    let entries = store.find(&filter).await?;
    debug!(term = %query.term, language = ?query.language, hits = entries.len(), "search");
    Ok(entries)
}
