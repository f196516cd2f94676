//! Slugs for fuzzy title matching
//!
//! Storefront URLs carry a Latin slug of the product title
//! (`/tproduct/782957961992-novie-freski-altamira`). Titles in the catalog are
//! often Cyrillic, so both sides are reduced to the same form: lower-case,
//! transliterated, non-alphanumeric runs collapsed to single hyphens.

use percent_encoding::percent_decode_str;

/// Latin spelling of a lower-case Cyrillic letter; `None` for anything else
pub const fn transliterate_char(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' | 'ы' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Lower-case, transliterate, then collapse every run of characters outside
/// `[a-z0-9]` into one `-`. Leading and trailing hyphens are dropped.
pub fn slugify(text: &str) -> String {
    let mut latin = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        match transliterate_char(c) {
            Some(mapped) => latin.push_str(mapped),
            None => latin.push(c),
        }
    }

    let mut slug = String::with_capacity(latin.len());
    let mut pending_hyphen = false;
    for c in latin.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Text after the first `-` of the last non-empty path segment.
///
/// `/tproduct/782957961992-novie-freski` gives `novie-freski`; segments
/// without a hyphen give nothing. The segment is percent-decoded first, so
/// Cyrillic slugs from `Url::path()` come back as Cyrillic.
pub fn slug_hint_from_path(path: &str) -> Option<String> {
    let segment = path.split('/').rev().find(|segment| !segment.is_empty())?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded
        .split_once('-')
        .map(|(_, rest)| rest.to_string())
        .filter(|rest| !rest.is_empty())
}
