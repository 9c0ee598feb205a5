//! Field extraction from free-text chat messages.
//!
//! All matching is case-insensitive. Phrase tables are matched on word
//! boundaries against a normalized form of the message (lowercase,
//! punctuation folded to single spaces), so "women" never matches "men"
//! and "don't" matches "dont".

use once_cell::sync::Lazy;
use regex::Regex;

use super::session::{Pincode, ShoeSize};
use crate::domain::catalog::{Category, Gender, Product};

/// Ordered synonym table. The first category with a matching phrase wins.
const CATEGORY_SYNONYMS: &[(Category, &[&str])] = &[
    (
        Category::Formal,
        &[
            "formal", "oxford", "oxfords", "office", "business", "derby", "derbies", "brogue",
            "brogues", "party wear", "wedding",
        ],
    ),
    (
        Category::Sports,
        &[
            "sports", "sport", "running", "runner", "gym", "athletic", "training", "jogging",
            "workout", "trainers",
        ],
    ),
    (
        Category::Casual,
        &[
            "casual", "sneaker", "sneakers", "everyday", "loafer", "loafers", "canvas",
            "daily wear",
        ],
    ),
    (
        Category::Sandals,
        &[
            "sandal", "sandals", "slipper", "slippers", "flip flop", "flip flops", "slides",
            "chappal", "chappals", "floaters",
        ],
    ),
    (
        Category::Boots,
        &["boot", "boots", "hiking", "trekking", "chelsea"],
    ),
];

/// Ordered gender buckets: masculine, feminine, then self-reference.
const GENDER_SYNONYMS: &[(Gender, &[&str])] = &[
    (
        Gender::Men,
        &[
            "men", "man", "mens", "male", "boy", "boys", "gents", "gentleman", "gentlemen", "him",
            "his", "husband", "son", "father", "dad", "brother", "guy", "guys",
        ],
    ),
    (
        Gender::Women,
        &[
            "women", "woman", "womens", "female", "girl", "girls", "ladies", "lady", "her",
            "wife", "daughter", "mother", "mom", "mum", "sister",
        ],
    ),
    (
        Gender::Unisex,
        &["for me", "for myself", "myself", "self", "mine"],
    ),
];

const AFFIRMATIVE: &[&str] = &[
    "yes", "y", "yeah", "yep", "yup", "sure", "ok", "okay", "confirm", "confirmed", "go ahead",
    "place order", "place the order", "proceed", "do it", "correct",
];

const NEGATIVE: &[&str] = &[
    "no", "n", "nope", "nah", "cancel", "stop", "don't", "dont", "not now", "never mind",
    "nevermind", "abort",
];

const MORE_PHRASES: &[&str] = &[
    "more", "show more", "next", "see more", "other options", "more options", "anything else",
    "load more",
];

const RESTART_COMMANDS: &[&str] = &["restart", "/restart", "/start", "start over", "reset", "/reset"];

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{1,2})(?:[^0-9]|$)").expect("size pattern is valid"));

static PINCODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{6})(?:[^0-9]|$)").expect("pincode pattern is valid"));

static SELECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:option|number|item|no\.?|#)\s*)?([0-9]{1,2})\.?$")
        .expect("selection pattern is valid")
});

/// Reading of a yes/no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Affirmative,
    Negative,
    /// Matched neither list, or matched both.
    Unrecognized,
}

/// Lowercases, folds every non-alphanumeric run into one space and pads
/// both ends with a space so phrases can be matched as `" phrase "`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.ends_with(' ') {
            out.push(' ');
        }
    }
    if !out.ends_with(' ') {
        out.push(' ');
    }
    out
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    let needle = normalize(phrase);
    !needle.trim().is_empty() && normalized.contains(&needle)
}

fn contains_any(normalized: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(normalized, p))
}

/// First canonical category, in table order, with a phrase in `text`.
pub fn extract_category(text: &str) -> Option<Category> {
    let normalized = normalize(text);
    CATEGORY_SYNONYMS
        .iter()
        .find(|(_, phrases)| contains_any(&normalized, phrases))
        .map(|(category, _)| *category)
}

/// First gender bucket with a phrase in `text`. Self-references map to
/// `Unisex`.
pub fn extract_gender(text: &str) -> Option<Gender> {
    let normalized = normalize(text);
    GENDER_SYNONYMS
        .iter()
        .find(|(_, phrases)| contains_any(&normalized, phrases))
        .map(|(gender, _)| *gender)
}

pub fn extract_confirmation(text: &str) -> Confirmation {
    let normalized = normalize(text);
    match (
        contains_any(&normalized, AFFIRMATIVE),
        contains_any(&normalized, NEGATIVE),
    ) {
        (true, false) => Confirmation::Affirmative,
        (false, true) => Confirmation::Negative,
        _ => Confirmation::Unrecognized,
    }
}

/// First standalone run of one or two digits. No range check.
pub fn extract_size(text: &str) -> Option<ShoeSize> {
    SIZE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| ShoeSize::parse(m.as_str()).ok())
}

/// First standalone run of exactly six digits, kept verbatim.
pub fn extract_pincode(text: &str) -> Option<Pincode> {
    PINCODE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| Pincode::parse(m.as_str()).ok())
}

/// Resolves a product pick against the page the shopper is looking at.
///
/// A bare number (optionally "option 2", "#2") is a 1-based index; out of
/// range is unresolved and does not fall back to name matching. Anything
/// else is matched against product names in display order. Returns the
/// zero-based position.
pub fn resolve_selection(text: &str, shown: &[Product]) -> Option<usize> {
    let trimmed = text.trim().to_lowercase();
    if let Some(caps) = SELECTION_RE.captures(&trimmed) {
        let position: usize = caps.get(1)?.as_str().parse().ok()?;
        return (1..=shown.len()).contains(&position).then(|| position - 1);
    }

    let normalized = normalize(text);
    if normalized.trim().is_empty() {
        return None;
    }
    shown.iter().position(|product| {
        let name = normalize(&product.name);
        normalized.contains(&name) || name.contains(&normalized)
    })
}

/// Position of the first shown product whose full name appears in `text`.
pub fn names_shown_product(text: &str, shown: &[Product]) -> Option<usize> {
    let normalized = normalize(text);
    shown.iter().position(|product| {
        let name = normalize(&product.name);
        !name.trim().is_empty() && normalized.contains(&name)
    })
}

pub fn is_more_request(text: &str) -> bool {
    contains_any(&normalize(text), MORE_PHRASES)
}

/// Exact match after trimming and lowercasing; restart words inside a
/// longer sentence do not count.
pub fn is_restart_command(text: &str) -> bool {
    let trimmed = text.trim().to_lowercase();
    RESTART_COMMANDS.contains(&trimmed.as_str())
}
