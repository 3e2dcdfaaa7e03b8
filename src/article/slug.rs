/*!
 * Slug generation for taxonomy terms and article identifiers.
 *
 * Slugs are lowercase, hyphen-separated ASCII. Diacritics from the supported
 * target languages are transliterated through a fixed character map rather
 * than a Unicode decomposition, so the output is stable across platforms.
 */

/// Default maximum slug length
pub const DEFAULT_SLUG_MAX_LENGTH: usize = 60;

/// Transliterate a single lowercase character, if it has a mapping
fn transliterate(c: char) -> Option<&'static str> {
    let mapped = match c {
        // Slovak / Czech
        'á' | 'ä' => "a",
        'č' => "c",
        'ď' => "d",
        'é' | 'ě' => "e",
        'í' => "i",
        'ĺ' | 'ľ' => "l",
        'ň' => "n",
        'ó' | 'ô' => "o",
        'ŕ' | 'ř' => "r",
        'š' => "s",
        'ť' => "t",
        'ú' | 'ů' => "u",
        'ý' => "y",
        'ž' => "z",
        // German
        'ö' | 'ő' => "o",
        'ü' | 'ű' => "u",
        'ß' => "ss",
        // French / Spanish
        'à' | 'â' => "a",
        'ç' => "c",
        'è' | 'ê' | 'ë' => "e",
        'î' | 'ï' => "i",
        'ñ' => "n",
        // Polish
        'ą' => "a",
        'ć' => "c",
        'ę' => "e",
        'ł' => "l",
        'ń' => "n",
        'ś' => "s",
        'ź' | 'ż' => "z",
        _ => return None,
    };
    Some(mapped)
}

/// Generate a URL-safe slug from a human-readable string.
///
/// The text is lowercased, transliterated, every run of characters outside
/// `[a-z0-9]` becomes a single hyphen and leading/trailing hyphens are removed.
/// Slugs longer than `max_length` are cut on a hyphen boundary.
pub fn generate_slug(text: &str, max_length: usize) -> String {
    let mut transliterated = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        match transliterate(c) {
            Some(mapped) => transliterated.push_str(mapped),
            None => transliterated.push(c),
        }
    }

    let mut slug = String::with_capacity(transliterated.len());
    let mut pending_hyphen = false;
    for c in transliterated.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    // slug is pure ASCII here, so byte offsets are char offsets
    if slug.len() > max_length {
        slug.truncate(max_length);
        if let Some(last_hyphen) = slug.rfind('-') {
            if last_hyphen > 0 {
                slug.truncate(last_hyphen);
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// Turn a slug back into natural-language text by replacing hyphens with spaces
pub fn humanize_slug(slug: &str) -> String {
    slug.replace('-', " ")
}
