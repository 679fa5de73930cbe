//! Shell-style matching of a single path component.
//!
//! Implements the POSIX `fnmatch` dialect used for remote paths:
//! - `*` matches zero or more characters (leading dots included)
//! - `?` matches exactly one character
//! - `[abc]` matches any character in the set
//! - `[a-z]` matches any character in the range
//! - `[!abc]` matches any character NOT in the set
//!
//! Matching is case-sensitive. A `[` without a closing `]` is a literal
//! character, and backslash has no special meaning.

/// Whether a pattern component needs actual matching, or can be looked up
/// directly as a name.
///
/// ```
/// use spimio_glob::is_wildcard_pattern;
/// assert!(is_wildcard_pattern("*.h5"));
/// assert!(is_wildcard_pattern("chunk-[0-9]"));
/// assert!(!is_wildcard_pattern("sub-01"));
/// ```
pub fn is_wildcard_pattern(s: &str) -> bool {
    s.contains('*') || s.contains('?') || s.contains('[')
}

/// Match a single name against a pattern.
///
/// The pattern must match the entire name.
///
/// ```
/// use spimio_glob::fnmatch;
///
/// assert!(fnmatch("*.h5", "sample-1_chunk-2.h5"));
/// assert!(fnmatch("ses-?", "ses-1"));
/// assert!(fnmatch("[!a]*", "b.json"));
/// assert!(!fnmatch("*.json", "a.h5"));
/// ```
pub fn fnmatch(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern).matches(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    Any,
    Star,
    Class { negate: bool, items: Vec<ClassItem> },
}

impl Token {
    fn matches_char(&self, c: char) -> bool {
        match self {
            Token::Literal(l) => *l == c,
            Token::Any => true,
            Token::Star => true,
            Token::Class { negate, items } => {
                let hit = items.iter().any(|item| match *item {
                    ClassItem::Char(x) => x == c,
                    ClassItem::Range(lo, hi) => lo <= c && c <= hi,
                });
                hit != *negate
            }
        }
    }
}

/// A compiled component pattern.
///
/// Compiling once and matching many names is what wildcard selectors do:
/// the pattern text is fixed for the selector's lifetime, the names come
/// from directory listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    tokens: Vec<Token>,
}

impl Pattern {
    /// Compile a component pattern. Every string is a valid pattern.
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::with_capacity(chars.len());
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '*' => {
                    // Consecutive stars collapse
                    if tokens.last() != Some(&Token::Star) {
                        tokens.push(Token::Star);
                    }
                    i += 1;
                }
                '?' => {
                    tokens.push(Token::Any);
                    i += 1;
                }
                '[' => match parse_class(&chars, i) {
                    Some((token, next)) => {
                        tokens.push(token);
                        i = next;
                    }
                    None => {
                        tokens.push(Token::Literal('['));
                        i += 1;
                    }
                },
                c => {
                    tokens.push(Token::Literal(c));
                    i += 1;
                }
            }
        }

        Self { tokens }
    }

    /// Test a name against the pattern.
    ///
    /// Runs in O(pattern × name): on mismatch only the most recent `*` is
    /// retried, which is sufficient because later stars subsume earlier ones.
    pub fn matches(&self, name: &str) -> bool {
        let input: Vec<char> = name.chars().collect();
        let tokens = &self.tokens;

        let mut ti = 0;
        let mut ii = 0;
        // (token index after the star, input index the star resumed at)
        let mut backtrack: Option<(usize, usize)> = None;

        while ii < input.len() {
            match tokens.get(ti) {
                Some(Token::Star) => {
                    backtrack = Some((ti + 1, ii));
                    ti += 1;
                }
                Some(token) if token.matches_char(input[ii]) => {
                    ti += 1;
                    ii += 1;
                }
                _ => match backtrack {
                    Some((star_next, star_ii)) => {
                        ti = star_next;
                        ii = star_ii + 1;
                        backtrack = Some((star_next, star_ii + 1));
                    }
                    None => return false,
                },
            }
        }

        // Trailing stars match the empty rest
        tokens[ti..].iter().all(|t| *t == Token::Star)
    }
}

/// Parse a character class starting at `chars[start] == '['`.
///
/// Returns the token and the index just past the closing `]`, or `None`
/// when the class is unterminated (the `[` is then a literal).
fn parse_class(chars: &[char], start: usize) -> Option<(Token, usize)> {
    let mut i = start + 1;
    let mut negate = false;

    if chars.get(i) == Some(&'!') {
        negate = true;
        i += 1;
    }

    // `]` right after `[` or `[!` is a literal member
    let first = i;
    let mut items = Vec::new();

    loop {
        let c = *chars.get(i)?;
        if c == ']' && i > first {
            return Some((Token::Class { negate, items }, i + 1));
        }

        if chars.get(i + 1) == Some(&'-')
            && let Some(&hi) = chars.get(i + 2)
            && hi != ']'
        {
            // Reversed ranges are empty
            if c <= hi {
                items.push(ClassItem::Range(c, hi));
            }
            i += 3;
            continue;
        }

        items.push(ClassItem::Char(c));
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn literal_matches() {
        assert!(fnmatch("a.h5", "a.h5"));
        assert!(fnmatch("", ""));
        assert!(!fnmatch("a.h5", "a.h"));
        assert!(!fnmatch("a.h5", "a.h55"));
    }

    #[rstest]
    #[case::star_empty("*", "", true)]
    #[case::star_any("*", "anything", true)]
    #[case::star_dotfile("*", ".hidden", true)]
    #[case::star_suffix("*.h5", "x.h5", true)]
    #[case::star_suffix_miss("*.h5", "x.json", false)]
    #[case::star_middle("sub-*_chunk", "sub-01_sample-2_chunk", true)]
    #[case::two_stars("*_*.json", "a_b.json", true)]
    #[case::two_stars_miss("*_*.json", "ab.json", false)]
    #[case::question("ses-?", "ses-1", true)]
    #[case::question_short("ses-?", "ses-", false)]
    #[case::question_long("ses-?", "ses-12", false)]
    fn wildcards(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        assert_eq!(fnmatch(pattern, name), expected, "{pattern} vs {name}");
    }

    #[rstest]
    #[case::set("[abc]", "b", true)]
    #[case::set_miss("[abc]", "d", false)]
    #[case::range("chunk-[0-9]", "chunk-7", true)]
    #[case::range_miss("chunk-[0-9]", "chunk-x", false)]
    #[case::negated("[!abc]", "d", true)]
    #[case::negated_miss("[!abc]", "a", false)]
    #[case::bracket_first("[]a]", "]", true)]
    #[case::dash_last("[a-]", "-", true)]
    #[case::reversed_range("[z-a]", "m", false)]
    #[case::unclosed("[abc", "[abc", true)]
    #[case::unclosed_no_class("[abc", "a", false)]
    #[case::caret_is_literal("[^a]", "^", true)]
    fn classes(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        assert_eq!(fnmatch(pattern, name), expected, "{pattern} vs {name}");
    }

    #[test]
    fn backslash_is_literal() {
        assert!(fnmatch(r"a\*", r"a\bc"));
        assert!(!fnmatch(r"a\*", "a*"));
    }

    #[test]
    fn case_sensitive() {
        assert!(!fnmatch("*.H5", "a.h5"));
    }

    #[test]
    fn star_heavy_pattern_is_linearish() {
        let pattern = "*a".repeat(30) + "b";
        let name = "a".repeat(200);
        assert!(!fnmatch(&pattern, &name));
    }

    #[test]
    fn wildcard_detection() {
        assert!(is_wildcard_pattern("*"));
        assert!(is_wildcard_pattern("a?"));
        assert!(is_wildcard_pattern("[ab]"));
        assert!(!is_wildcard_pattern("plain.h5"));
        assert!(!is_wildcard_pattern("{a,b}"));
    }
}
