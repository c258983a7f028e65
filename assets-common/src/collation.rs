//! Locale-aware name ordering
//!
//! Packed blobs order names with the root-locale collation of a
//! browser (`String.prototype.localeCompare`), not by byte value. The
//! differences show up as soon as names mix case or punctuation:
//!
//! ```text
//! byte order:    "B.bin" < "_a.bin" < "a.bin"
//! collated:      "_a.bin" < "a.bin" < "B.bin"
//! ```
//!
//! [`locale_cmp`] uses the CLDR root collation at tertiary strength:
//! accents are secondary to base letters and case is tertiary, with
//! lowercase first. Control characters are ignorable, so two names that
//! differ only by one compare equal and a stable sort keeps their insertion
//! order.

use std::cmp::Ordering;
use std::fmt;

use icu_collator::options::{CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed};

thread_local! {
    static ROOT_COLLATOR: Option<CollatorBorrowed<'static>> = root_collator();
}

fn root_collator() -> Option<CollatorBorrowed<'static>> {
    let mut options = CollatorOptions::default();
    options.strength = Some(Strength::Tertiary);

    match Collator::try_new(Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(err) => {
            tracing::warn!("Root collation unavailable ({}), ordering names by code point", err);
            None
        }
    }
}

/// Compare two names in root-locale collation order
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    ROOT_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.cmp(b),
    })
}

/// A name ordered by [`locale_cmp`], then by code point
///
/// The code point tiebreak keeps `Ord` consistent with `Eq`. Used as the key of ordered maps so iteration order is already the order
/// names are written to a blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollatedName(String);

impl CollatedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Ord for CollatedName {
    fn cmp(&self, other: &Self) -> Ordering {
        locale_cmp(&self.0, &other.0).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for CollatedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<&str> for CollatedName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for CollatedName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for CollatedName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollatedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| locale_cmp(a, b));
        v
    }

    #[test]
    fn test_plain_ascii_matches_byte_order() {
        assert_eq!(locale_cmp("png", "txt"), Ordering::Less);
        assert_eq!(locale_cmp("wn9_data", "wn9_index"), Ordering::Less);
        assert_eq!(locale_cmp("abc", "abc"), Ordering::Equal);
        assert_eq!(locale_cmp("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn test_case_is_secondary_to_letters() {
        assert_eq!(sorted(&["b", "B", "a", "A"]), vec!["a", "A", "b", "B"]);
        assert_eq!(sorted(&["Zebra", "apple"]), vec!["apple", "Zebra"]);
    }

    #[test]
    fn test_punctuation_before_digits_before_letters() {
        assert_eq!(
            sorted(&["a.bin", "1.bin", "_a.bin", "B.bin"]),
            vec!["_a.bin", "1.bin", "a.bin", "B.bin"]
        );
        assert_eq!(locale_cmp("_MODEL_INFO_", "wn9_data"), Ordering::Less);
        assert_eq!(locale_cmp("a_b", "a-b"), Ordering::Less);
    }

    #[test]
    fn test_accents_sort_with_base_letter() {
        assert_eq!(locale_cmp("é", "f"), Ordering::Less);
        assert_eq!(locale_cmp("e", "é"), Ordering::Less);
        assert_eq!(locale_cmp("café", "cafz"), Ordering::Less);
        assert_eq!(
            sorted(&["cafz.png", "café.png", "cafe.png"]),
            vec!["cafe.png", "café.png", "cafz.png"]
        );
    }

    #[test]
    fn test_full_width_punctuation_before_digits() {
        assert_eq!(locale_cmp("（", "1"), Ordering::Less);
        assert_eq!(locale_cmp("（a）", "a"), Ordering::Less);
    }

    #[test]
    fn test_han_after_latin() {
        assert_eq!(locale_cmp("z", "字"), Ordering::Less);
        assert_eq!(locale_cmp("字", "字a"), Ordering::Less);
    }

    #[test]
    fn test_control_characters_are_ignorable() {
        assert_eq!(locale_cmp("a\u{1}", "a"), Ordering::Equal);
        assert_eq!(sorted(&["b\u{1}", "a", "b"]), vec!["a", "b\u{1}", "b"]);
    }

    #[test]
    fn test_collated_name_breaks_ties_by_code_point() {
        let plain = CollatedName::from("a");
        let marked = CollatedName::from("a\u{1}");
        assert_ne!(plain, marked);
        assert_eq!(plain.cmp(&marked), Ordering::Less);
        assert_eq!(marked.cmp(&plain), Ordering::Greater);
    }

    #[test]
    fn test_collated_name_orders_btree() {
        use std::collections::BTreeSet;
        let set: BTreeSet<CollatedName> = ["wn9_index", "_MODEL_INFO_", "Wn9_data", "wn9_data"]
            .into_iter()
            .map(CollatedName::from)
            .collect();
        let names: Vec<&str> = set.iter().map(CollatedName::as_str).collect();
        assert_eq!(names, vec!["_MODEL_INFO_", "wn9_data", "Wn9_data", "wn9_index"]);
    }
}
