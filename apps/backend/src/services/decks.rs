//! Deck name handling.

/// Separator between deck name components.
pub const SEPARATOR: &str = "::";

/// Trim each component and drop empty ones. Returns `None` if nothing is left.
pub fn normalize_deck_name(name: &str) -> Option<String> {
    let parts: Vec<&str> = name
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(SEPARATOR))
    }
}

/// Names of all ancestors, nearest first.
pub fn parent_names(name: &str) -> Vec<String> {
    let parts: Vec<&str> = name.split(SEPARATOR).collect();
    (1..parts.len())
        .rev()
        .map(|len| parts[..len].join(SEPARATOR))
        .collect()
}

/// Last component of a deck name.
pub fn base_name(name: &str) -> &str {
    name.rsplit(SEPARATOR).next().unwrap_or(name)
}

/// `name` with its leading `old` prefix swapped for `new`. `name` must be
/// `old` itself or one of its descendants.
pub fn replace_prefix(name: &str, old: &str, new: &str) -> String {
    format!("{}{}", new, &name[old.len()..])
}

/// True if `name` is strictly below `ancestor`.
pub fn is_descendant(name: &str, ancestor: &str) -> bool {
    name.len() > ancestor.len() + SEPARATOR.len()
        && name.starts_with(ancestor)
        && name[ancestor.len()..].starts_with(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_trims_components() {
        assert_eq!(
            normalize_deck_name(" Lang :: Spanish ::"),
            Some("Lang::Spanish".to_string())
        );
    }

    #[test]
    fn normalize_rejects_blank() {
        assert_eq!(normalize_deck_name(" :: "), None);
        assert_eq!(normalize_deck_name(""), None);
    }

    #[test]
    fn parent_names_nearest_first() {
        assert_eq!(parent_names("A::B::C"), vec!["A::B".to_string(), "A".to_string()]);
        assert!(parent_names("Top").is_empty());
    }

    #[test]
    fn base_name_is_last_component() {
        assert_eq!(base_name("A::B::C"), "C");
        assert_eq!(base_name("Top"), "Top");
    }

    #[test]
    fn replace_prefix_keeps_tail() {
        assert_eq!(replace_prefix("A::B::C", "A::B", "X"), "X::C");
        assert_eq!(replace_prefix("A::B", "A::B", "Y::Z"), "Y::Z");
    }

    #[test]
    fn descendant_requires_separator() {
        assert!(is_descendant("A::B", "A"));
        assert!(is_descendant("A::B::C", "A"));
        assert!(!is_descendant("AB", "A"));
        assert!(!is_descendant("A", "A"));
        assert!(!is_descendant("B::A", "A"));
    }
}
