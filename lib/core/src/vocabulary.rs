use ahash::AHashMap;
use serde::Serialize;

/// Term to column index mapping, indices assigned in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vocabulary {
    terms: Vec<String>,
    #[serde(skip)]
    index: AHashMap<String, usize>,
}

impl Vocabulary {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `term`, inserting it at the end if unseen
    pub fn intern(&mut self, term: &str) -> usize {
        if let Some(&idx) = self.index.get(term) {
            return idx;
        }
        let idx = self.terms.len();
        self.terms.push(term.to_string());
        self.index.insert(term.to_string(), idx);
        idx
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    #[inline]
    pub fn term(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(String::as_str)
    }

    /// Terms in index order
    #[inline]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut vocabulary = Self::new();
        for term in iter {
            vocabulary.intern(term.as_ref());
        }
        vocabulary
    }
}
