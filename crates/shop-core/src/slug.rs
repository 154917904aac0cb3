//! Slug derivation for categories and products.

/// Derive a URL slug from a display name.
///
/// Lower-cases the name and collapses every run of non-alphanumeric
/// characters into a single hyphen, with no leading or trailing hyphen.
/// `"Tea & Spices"` becomes `"tea-spices"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Green Tea"), "green-tea");
    }

    #[test]
    fn test_collapses_symbol_runs() {
        assert_eq!(slugify("Tea & Spices"), "tea-spices");
        assert_eq!(slugify("One -- Two"), "one-two");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(slugify("  Chai!  "), "chai");
        assert_eq!(slugify("--edge--"), "edge");
    }

    #[test]
    fn test_already_slug() {
        assert_eq!(slugify("earl-grey"), "earl-grey");
    }

    #[test]
    fn test_empty_and_symbols_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("&&&"), "");
    }
}
