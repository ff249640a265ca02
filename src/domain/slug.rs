//! URL slugs and display-case helpers
//!
//! Every function here is pure: the same input always yields the same output,
//! which is what lets a re-published note overwrite its previous output file.

use regex::Regex;
use std::sync::OnceLock;

fn separator_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[^a-z0-9_-]+").unwrap())
}

fn repeated_dash_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"-{2,}").unwrap())
}

/// Words kept lowercase by [`titlecase`] unless they open or close the title.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or", "the",
    "to", "v", "via", "vs",
];

/// Map a lowercase Latin letter with diacritics to its closest ASCII spelling.
fn transliterate(ch: char) -> Option<&'static str> {
    let mapped = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ß' => "ss",
        'ś' | 'š' | 'ş' => "s",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(mapped)
}

/// Convert arbitrary text into a URL-safe slug.
///
/// Lowercases, transliterates common accented letters, replaces every run of
/// characters outside `[a-z0-9_-]` with a single `-`, collapses repeated
/// dashes and trims dashes from both ends.
///
/// # Examples
///
/// ```
/// use notepress::domain::slugify;
///
/// assert_eq!(slugify("Another Note"), "another-note");
/// assert_eq!(slugify("C++ & Rust: a Café"), "c-rust-a-cafe");
/// ```
pub fn slugify(text: &str) -> String {
    let mut ascii = String::with_capacity(text.len());
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii() {
            ascii.push(ch);
        } else if let Some(mapped) = transliterate(ch) {
            ascii.push_str(mapped);
        } else {
            ascii.push(' ');
        }
    }

    let dashed = separator_regex().replace_all(&ascii, "-");
    let collapsed = repeated_dash_regex().replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Humanize a tag segment: `probability-statistics` becomes `Probability Statistics`.
pub fn titleize(segment: &str) -> String {
    segment
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce an English plural to its singular form.
///
/// Covers the regular suffix rules plus a few irregular nouns; words that are
/// already singular (or uncountable) come back unchanged.
pub fn singularize(word: &str) -> String {
    const UNCOUNTABLE: &[&str] = &[
        "equipment",
        "information",
        "money",
        "news",
        "rice",
        "series",
        "sheep",
        "species",
    ];
    const IRREGULAR: &[(&str, &str)] = &[
        ("children", "child"),
        ("men", "man"),
        ("people", "person"),
        ("women", "woman"),
    ];

    let lower = word.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return (*singular).to_string();
    }

    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ["sses", "xes", "ches", "shes", "zzes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return word[..word.len() - 2].to_string();
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

fn has_inner_capital(word: &str) -> bool {
    word.chars().skip(1).any(char::is_uppercase)
}

fn capitalize_first_alpha(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut done = false;
    for ch in word.chars() {
        if !done && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
            done = true;
        } else {
            out.push(ch);
        }
    }
    out
}

fn titlecase_word(word: &str, is_edge: bool) -> String {
    if has_inner_capital(word) {
        return word.to_string();
    }

    let bare = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if !is_edge && SMALL_WORDS.contains(&bare.as_str()) {
        return word.to_lowercase();
    }

    word.split('-')
        .map(capitalize_first_alpha)
        .collect::<Vec<_>>()
        .join("-")
}

/// Title-case a display title.
///
/// Small words stay lowercase unless they start or end the title (or follow a
/// colon); acronyms and words with interior capitals such as `GraphQL` are
/// left alone.
pub fn titlecase(title: &str) -> String {
    let words: Vec<&str> = title.split(' ').collect();
    let last = words.len().saturating_sub(1);
    let mut after_colon = false;

    words
        .iter()
        .enumerate()
        .map(|(idx, word)| {
            let is_edge = idx == 0 || idx == last || after_colon;
            after_colon = word.ends_with(':');
            if word.is_empty() {
                String::new()
            } else {
                titlecase_word(word, is_edge)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
