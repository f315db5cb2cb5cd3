//! Subject-family keyword tables used by the teacher-course matcher (C3) and
//! the conflict detector's subject-mismatch pass (C4 category 9).
//!
//! Matching is whole-word: "literature" must not match the Arts family
//! (spec.md §4.2, §8) even though "visual-art" is itself in the Arts list.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const SCIENCE: &[&str] = &[
    "science",
    "biology",
    "chemistry",
    "physics",
    "earth-science",
    "life-science",
    "physical-science",
];

pub const MATH: &[&str] = &[
    "math",
    "algebra",
    "geometry",
    "calculus",
    "trigonometry",
    "pre-calculus",
    "pre-algebra",
];

pub const ENGLISH: &[&str] = &[
    "english",
    "literature",
    "language-arts",
    "writing",
    "reading",
    "composition",
];

pub const SOCIAL_STUDIES: &[&str] = &[
    "history",
    "geography",
    "civics",
    "government",
    "economics",
    "social-studies",
    "world-history",
    "us-history",
    "american-history",
];

pub const PE: &[&str] = &[
    "physical-education",
    "pe",
    "health",
    "athletics",
    "fitness",
    "gym",
    "gymnastics",
];

pub const ARTS: &[&str] = &[
    "art",
    "music",
    "drama",
    "theater",
    "theatre",
    "band",
    "chorus",
    "orchestra",
    "choir",
    "painting",
    "drawing",
    "visual-art",
];

pub const LANGUAGES: &[&str] = &[
    "spanish",
    "french",
    "german",
    "latin",
    "chinese",
    "japanese",
    "italian",
    "foreign-language",
];

pub const COMPUTING: &[&str] = &[
    "computer",
    "programming",
    "coding",
    "technology",
    "information-technology",
];

pub const FAMILIES: &[(&str, &[&str])] = &[
    ("Science", SCIENCE),
    ("Math", MATH),
    ("English", ENGLISH),
    ("Social-Studies", SOCIAL_STUDIES),
    ("PE", PE),
    ("Arts", ARTS),
    ("Languages", LANGUAGES),
    ("Computing", COMPUTING),
];

/// Lazily-built reverse index: normalized keyword -> family name. Built once
/// per process, matching the "singletons become process-wide immutable
/// values" re-architecture note in spec.md §9.
static KEYWORD_TO_FAMILY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (family, keywords) in FAMILIES {
        for kw in *keywords {
            map.insert(*kw, *family);
        }
    }
    map
});

/// Normalize a subject/certification string into whole-word tokens for
/// family lookups: lowercase, split on anything that isn't alphanumeric or a
/// hyphen (so "visual art" and "visual-art" both tokenize to a match).
fn normalize_tokens(s: &str) -> Vec<String> {
    s.to_lowercase()
        .replace(' ', "-")
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Family name for a subject string, if any keyword matches a whole token.
pub fn family_of(subject: &str) -> Option<&'static str> {
    for token in normalize_tokens(subject) {
        if let Some(family) = KEYWORD_TO_FAMILY.get(token.as_str()) {
            return Some(family);
        }
    }
    None
}

/// True when `subject` and `target` share a family keyword.
pub fn matches_family(subject: &str, target_family: &str) -> bool {
    normalize_tokens(subject).iter().any(|token| {
        KEYWORD_TO_FAMILY
            .get(token.as_str())
            .is_some_and(|f| f.eq_ignore_ascii_case(target_family))
    })
}

/// Certification semantics from spec.md §4.2: exact (case-insensitive) match,
/// else family match, else none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificationMatch {
    Exact,
    Family,
    None,
}

pub fn certification_match(certification: &str, course_subject: &str) -> CertificationMatch {
    if certification.eq_ignore_ascii_case(course_subject) {
        return CertificationMatch::Exact;
    }
    match (family_of(certification), family_of(course_subject)) {
        (Some(a), Some(b)) if a == b => CertificationMatch::Family,
        _ => CertificationMatch::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literature_does_not_match_arts() {
        assert!(!matches_family("literature", "Arts"));
    }

    #[test]
    fn visual_art_matches_arts() {
        assert!(matches_family("visual art", "Arts"));
    }

    #[test]
    fn exact_certification_match() {
        assert_eq!(
            certification_match("Biology", "biology"),
            CertificationMatch::Exact
        );
    }

    #[test]
    fn family_certification_match() {
        assert_eq!(
            certification_match("Chemistry", "physics"),
            CertificationMatch::Family
        );
    }

    #[test]
    fn no_match_across_unrelated_families() {
        assert_eq!(
            certification_match("history", "algebra"),
            CertificationMatch::None
        );
    }
}
