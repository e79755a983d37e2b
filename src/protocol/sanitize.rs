/// Characters that never belong in dictionary text.
const STRIPPED: [char; 8] = ['$', '<', '>', '{', '}', '`', '"', '\\'];

/// Removes control and markup/operator characters from free-text input.
pub fn clean(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() && !STRIPPED.contains(c))
        .collect()
}

pub fn clean_opt(text: Option<&str>) -> Option<String> {
    text.map(clean)
}
