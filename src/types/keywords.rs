use std::collections::HashSet;

use crate::normalize;
use crate::{DiagnosticSink, InputError};

/// An ordered, deduplicated keyword collection.
///
/// Built once from raw input: every string is normalized (invisible
/// characters stripped, whitespace trimmed), empties are dropped, and
/// duplicates keep their first occurrence. Immutable afterwards, so a
/// classification call can share it freely across worker threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords {
    items: Vec<String>,
}

impl Keywords {
    /// Normalize and deduplicate raw keyword strings.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::EmptyKeywords`] if nothing survives
    /// normalization.
    pub fn new<I, S>(raw: I, sink: &dyn DiagnosticSink) -> Result<Self, InputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for keyword in raw {
            let cleaned = normalize::clean(keyword.as_ref(), sink);
            if cleaned.is_empty() {
                continue;
            }
            if seen.insert(cleaned.clone()) {
                items.push(cleaned);
            }
        }
        if items.is_empty() {
            return Err(InputError::EmptyKeywords);
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`: construction rejects empty collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullSink;

    #[test]
    fn dedup_preserves_first_occurrence() {
        let kws = Keywords::new(["a", "b", "a"], &NullSink).unwrap();
        assert_eq!(kws.as_slice(), ["a", "b"]);
    }

    #[test]
    fn trims_and_drops_empties() {
        let kws = Keywords::new(["  英语  ", "", "   ", "数学"], &NullSink).unwrap();
        assert_eq!(kws.as_slice(), ["英语", "数学"]);
    }

    #[test]
    fn normalization_can_collapse_duplicates() {
        // The same keyword with and without a zero-width space is one entry.
        let kws = Keywords::new(["英语", "英\u{200B}语"], &NullSink).unwrap();
        assert_eq!(kws.len(), 1);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            Keywords::new(Vec::<&str>::new(), &NullSink),
            Err(InputError::EmptyKeywords)
        ));
        assert!(matches!(
            Keywords::new(["   ", "\u{200B}"], &NullSink),
            Err(InputError::EmptyKeywords)
        ));
    }

    #[test]
    fn iter_yields_in_order() {
        let kws = Keywords::new(["c", "a", "b"], &NullSink).unwrap();
        let collected: Vec<&str> = kws.iter().collect();
        assert_eq!(collected, ["c", "a", "b"]);
    }
}
