//! Ordering between two matching wildcard patterns.

use std::cmp::Ordering;

/// Compare two normalized pattern keys by specificity.
///
/// `Ordering::Greater` means `a` is more specific. Ranks by static prefix
/// length, then exact over wildcard, then total key length. Keys that tie
/// compare `Equal`; callers keep the first-declared one.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    static_prefix(a)
        .len()
        .cmp(&static_prefix(b).len())
        .then_with(|| is_exact(a).cmp(&is_exact(b)))
        .then_with(|| a.len().cmp(&b.len()))
}

/// The part of a key before its first wildcard.
#[must_use]
pub fn static_prefix(key: &str) -> &str {
    key.find('*').map_or(key, |star| &key[..star])
}

fn is_exact(key: &str) -> bool {
    !key.contains('*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_prefix_wins() {
        assert_eq!(compare("./foo/bar/*", "./foo/*"), Ordering::Greater);
        assert_eq!(compare("./*", "./foo/*"), Ordering::Less);
    }

    #[test]
    fn test_exact_beats_wildcard_at_same_prefix() {
        assert_eq!(compare("./foo/", "./foo/*"), Ordering::Greater);
    }

    #[test]
    fn test_longer_key_breaks_prefix_tie() {
        assert_eq!(compare("./*.js", "./*"), Ordering::Greater);
        assert_eq!(compare("./*", "./*.js"), Ordering::Less);
    }

    #[test]
    fn test_identical_shape_is_equal() {
        assert_eq!(compare("./*.js", "./*.ts"), Ordering::Equal);
    }

    #[test]
    fn test_static_prefix() {
        assert_eq!(static_prefix("./foo/*.js"), "./foo/");
        assert_eq!(static_prefix("./foo"), "./foo");
        assert_eq!(static_prefix("./*"), "./");
    }
}
