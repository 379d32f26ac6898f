use regex::Regex;

use crate::error::{Error, Result};

/// A single element of a [`Pattern`].
#[derive(Debug, Clone)]
pub enum PatternElement {
    /// Matches exactly this symbol.
    Literal(char),
    /// Matches any symbol the expression finds a match in.
    Regex(Regex),
}

impl PatternElement {
    /// Compile `source` into a regex element.
    pub fn regex(source: &str) -> Result<Self> {
        Regex::new(source)
            .map(PatternElement::Regex)
            .map_err(|source_err| Error::InvalidRegex {
                pattern: source.to_owned(),
                source: source_err,
            })
    }

    pub fn matches(&self, symbol: char) -> bool {
        match self {
            PatternElement::Literal(c) => *c == symbol,
            PatternElement::Regex(re) => {
                let mut tmp = [0u8; 4];
                re.is_match(symbol.encode_utf8(&mut tmp))
            },
        }
    }
}

impl PartialEq for PatternElement {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PatternElement::Literal(a), PatternElement::Literal(b)) => a == b,
            (PatternElement::Regex(a), PatternElement::Regex(b)) => {
                a.as_str() == b.as_str()
            },
            _ => false,
        }
    }
}

impl From<char> for PatternElement {
    fn from(symbol: char) -> Self {
        PatternElement::Literal(symbol)
    }
}

/// Ordered sequence of elements a state requires, symbol by symbol, to be
/// entered or left.
///
/// An empty pattern never matches: a state with an empty entry can only be
/// reached as the root or through a miss handler, and a state with an empty
/// leave is never popped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pattern {
    elements: Vec<PatternElement>,
}

impl Pattern {
    pub fn new(elements: impl IntoIterator<Item = PatternElement>) -> Self {
        Self {
            elements: elements.into_iter().collect(),
        }
    }

    /// One literal element per char of `text`.
    pub fn literal(text: &str) -> Self {
        text.chars().map(PatternElement::Literal).collect()
    }

    /// Append an element, builder style.
    #[must_use]
    pub fn then(mut self, element: impl Into<PatternElement>) -> Self {
        self.elements.push(element.into());
        self
    }

    pub fn elements(&self) -> &[PatternElement] {
        &self.elements
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `symbol` matches the element at `position`.
    ///
    /// Fails closed: positions past the end, and every position of an empty
    /// pattern, never match.
    #[inline]
    pub fn matches(&self, position: usize, symbol: char) -> bool {
        self.elements
            .get(position)
            .is_some_and(|element| element.matches(symbol))
    }

    /// Scan the already matched positions `progress - 1 ..= 0`, closest
    /// first, for one the newest `symbol` would match instead.
    ///
    /// This lets a run like `a a b` keep progressing on pattern `a b` after
    /// the second `a` failed to extend the match.
    pub fn checkback(&self, progress: usize, symbol: char) -> Option<usize> {
        (0..progress).rev().find(|&position| self.matches(position, symbol))
    }
}

impl FromIterator<PatternElement> for Pattern {
    fn from_iter<I: IntoIterator<Item = PatternElement>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<PatternElement>> for Pattern {
    fn from(elements: Vec<PatternElement>) -> Self {
        Self { elements }
    }
}

impl From<&str> for Pattern {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

impl From<char> for Pattern {
    fn from(symbol: char) -> Self {
        Self::new([PatternElement::Literal(symbol)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digit() -> PatternElement {
        PatternElement::regex("[0-9]").unwrap()
    }

    #[test]
    fn literal_splits_text_into_elements() {
        let pattern = Pattern::literal("<!--");
        assert_eq!(pattern.len(), 4);
        assert_eq!(pattern.elements()[1], PatternElement::Literal('!'));
    }

    #[test]
    fn literal_matches_by_equality() {
        let pattern = Pattern::literal("ab");
        assert!(pattern.matches(0, 'a'));
        assert!(pattern.matches(1, 'b'));
        assert!(!pattern.matches(0, 'b'));
    }

    #[test]
    fn regex_element_tests_the_symbol() {
        let pattern = Pattern::default().then('#').then(digit());
        assert!(pattern.matches(1, '7'));
        assert!(!pattern.matches(1, 'x'));
    }

    #[test]
    fn regex_element_matches_multibyte_symbols() {
        let pattern = Pattern::new([PatternElement::regex(r"\p{Cyrillic}").unwrap()]);
        assert!(pattern.matches(0, 'ж'));
        assert!(!pattern.matches(0, 'z'));
    }

    #[test]
    fn matches_fails_closed() {
        assert!(!Pattern::default().matches(0, 'a'));
        assert!(!Pattern::literal("a").matches(1, 'a'));
        assert!(!Pattern::literal("a").matches(usize::MAX, 'a'));
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = PatternElement::regex("[0-").unwrap_err();
        assert!(matches!(err, Error::InvalidRegex { ref pattern, .. } if pattern == "[0-"));
    }

    #[test]
    fn checkback_without_progress_finds_nothing() {
        assert_eq!(Pattern::literal("ab").checkback(0, 'a'), None);
        assert_eq!(Pattern::default().checkback(3, 'a'), None);
    }

    #[test]
    fn checkback_restarts_the_pattern() {
        // `a` failed to extend `a b` at position 1, but it restarts it.
        assert_eq!(Pattern::literal("ab").checkback(1, 'a'), Some(0));
        assert_eq!(Pattern::literal("ab").checkback(1, 'c'), None);
    }

    #[test]
    fn checkback_prefers_the_closest_position() {
        let pattern = Pattern::literal("xaxab");
        assert_eq!(pattern.checkback(4, 'a'), Some(3));
        assert_eq!(pattern.checkback(3, 'a'), Some(1));
        assert_eq!(pattern.checkback(4, 'x'), Some(2));
    }

    #[test]
    fn checkback_uses_regex_elements() {
        let pattern = Pattern::new([digit(), PatternElement::Literal('.')]);
        assert_eq!(pattern.checkback(1, '4'), Some(0));
    }
}
