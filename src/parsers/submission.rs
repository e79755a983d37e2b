use crate::error::{DictError, Result};
use crate::model::{EntryDraft, Language};

/// Separates a term from its language, e.g. `casa@spanish`.
pub const LANGUAGE_DELIMITER: char = '@';

/// Which side of a pair a submission belongs to; only used for messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Entry,
    Mirror,
}

impl Side {
    fn label(self) -> &'static str {
        match self {
            Side::Entry => "entry",
            Side::Mirror => "mirror",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub index: String,
    pub language: Language,
}

/// Splits on the first delimiter and trims both halves.
/// The language half is `None` when no delimiter is present.
pub fn split_language(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once(LANGUAGE_DELIMITER) {
        Some((text, lang)) => (text.trim(), Some(lang.trim())),
        None => (raw.trim(), None),
    }
}

pub fn parse(raw: &str, side: Side) -> Result<Submission> {
    let (text, lang) = split_language(raw);

    let lang = lang.ok_or_else(|| {
        DictError::invalid(format!("Blank {} language submission", side.label()))
    })?;

    if text.is_empty() {
        return Err(DictError::invalid(format!("Blank {} text submission", side.label())));
    }
    if lang.is_empty() {
        return Err(DictError::invalid(format!("Blank {} language submission", side.label())));
    }

    let language = lang.parse::<Language>().map_err(DictError::InvalidSubmission)?;

    Ok(Submission {
        index: text.to_string(),
        language,
    })
}

/// Parses both halves of a submission and cross-links them.
///
/// The mirror is optional here; a lone entry still parses, and it is the
/// store's schema that later refuses to persist it without a mirror.
pub fn parse_pair(
    entry_submission: Option<&str>,
    mirror_submission: Option<&str>,
) -> Result<(EntryDraft, Option<EntryDraft>)> {
    let entry_raw = entry_submission
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DictError::invalid("Blank data submission"))?;

    let entry = parse(entry_raw, Side::Entry)?;
    // any non-empty mirror counts as submitted, whitespace included
    let mirror = match mirror_submission.filter(|s| !s.is_empty()) {
        Some(raw) => Some(parse(raw, Side::Mirror)?),
        None => None,
    };

    let mut entry_draft = EntryDraft::new(entry.index.clone(), entry.language);

    let mirror_draft = mirror.map(|m| {
        entry_draft = entry_draft.clone().with_mirror(m.index.clone(), m.language);
        EntryDraft::new(m.index, m.language).with_mirror(entry.index, entry.language)
    });

    Ok((entry_draft, mirror_draft))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_message(r: Result<impl std::fmt::Debug>) -> String {
        match r {
            Err(DictError::InvalidSubmission(m)) => m,
            other => panic!("expected InvalidSubmission, got {other:?}"),
        }
    }

    #[test]
    fn parses_and_trims() {
        let s = parse("  la casa  @ Spanish ", Side::Entry).unwrap();
        assert_eq!(s.index, "la casa");
        assert_eq!(s.language, Language::Spanish);
    }

    #[test]
    fn missing_delimiter() {
        let m = invalid_message(parse("casa", Side::Entry));
        assert_eq!(m, "Blank entry language submission");
        let m = invalid_message(parse("house", Side::Mirror));
        assert_eq!(m, "Blank mirror language submission");
    }

    #[test]
    fn blank_text() {
        let m = invalid_message(parse("@spanish", Side::Entry));
        assert_eq!(m, "Blank entry text submission");
        invalid_message(parse("   @ spanish", Side::Entry));
    }

    #[test]
    fn unknown_language() {
        let m = invalid_message(parse("casa@klingon", Side::Entry));
        assert!(m.contains("klingon"));
        invalid_message(parse("casa@", Side::Entry));
    }

    #[test]
    fn split_keeps_rest_after_first_delimiter() {
        assert_eq!(split_language("a@b@c"), ("a", Some("b@c")));
        assert_eq!(split_language(" casa "), ("casa", None));
    }

    #[test]
    fn pair_is_cross_linked() {
        let (entry, mirror) = parse_pair(Some("casa@spanish"), Some("house@english")).unwrap();
        let mirror = mirror.unwrap();
        assert_eq!(entry.mirror.as_deref(), Some("house"));
        assert_eq!(entry.mirror_language, Some(Language::English));
        assert_eq!(mirror.index, "house");
        assert_eq!(mirror.mirror.as_deref(), Some("casa"));
        assert_eq!(mirror.mirror_language, Some(Language::Spanish));
    }

    #[test]
    fn pair_without_mirror() {
        let (entry, mirror) = parse_pair(Some("casa@spanish"), None).unwrap();
        assert!(mirror.is_none());
        assert!(entry.mirror.is_none());

        let (_, mirror) = parse_pair(Some("casa@spanish"), Some("")).unwrap();
        assert!(mirror.is_none());
    }

    #[test]
    fn whitespace_mirror_is_submitted_and_rejected() {
        assert_eq!(
            invalid_message(parse_pair(Some("casa@spanish"), Some("   "))),
            "Blank mirror language submission"
        );
    }

    #[test]
    fn pair_requires_entry() {
        assert_eq!(invalid_message(parse_pair(None, Some("house@english"))), "Blank data submission");
        assert_eq!(invalid_message(parse_pair(Some(" "), None)), "Blank data submission");
        invalid_message(parse_pair(Some("casa@spanish"), Some("house")));
    }
}
