/*!
 * Front matter codec.
 *
 * Articles start with a header block delimited by two `---` lines. The header
 * is a shallow YAML subset: top-level `key: value` scalars plus two nested
 * blocks (`taxonomy` and `custom_fields`). Only the fields this crate knows
 * about are modelled; the raw header text is kept for everything else.
 */

use regex::Regex;

/// Delimiter line that opens and closes the header block
pub const DELIMITER: &str = "---";

const NESTED_INDENT: &str = "    ";
const ITEM_INDENT: &str = "        ";

/// A document split into its raw header and its body
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDocument {
    /// Header text between the delimiters, without the delimiter lines
    pub yaml: String,
    /// Everything after the closing delimiter line
    pub body: String,
}

/// Provenance markers written into translated documents
#[derive(Debug, Clone, PartialEq)]
pub struct Provenance {
    /// Identifier of the source document (its slug)
    pub translation_group: String,
    /// Directory-style code of the language this document is written in
    pub translation_lang: String,
}

/// Header fields emitted by [`FrontMatter::serialize`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatterFields {
    pub title: String,
    pub post_status: String,
    pub post_date: String,
    pub excerpt: String,
    pub featured_image: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub provenance: Option<Provenance>,
}

/// Front matter parsing and serialization
pub struct FrontMatter;

impl FrontMatter {
    /// Split a raw document into header and body.
    ///
    /// Returns `None` when the document does not open with a delimiter line
    /// or the header is never closed. CRLF line endings are normalised.
    pub fn split(raw: &str) -> Option<SplitDocument> {
        let normalized = raw.replace("\r\n", "\n");
        let rest = normalized.strip_prefix("---\n")?;

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            let content = line.strip_suffix('\n').unwrap_or(line);
            if content.trim_end() == DELIMITER {
                let header = &rest[..offset];
                let yaml = header.strip_suffix('\n').unwrap_or(header);
                let body = &rest[offset + line.len()..];
                return Some(SplitDocument {
                    yaml: yaml.to_string(),
                    body: body.to_string(),
                });
            }
            offset += line.len();
        }

        None
    }

    /// Read a top-level scalar field. Missing fields read as an empty string.
    pub fn scalar(yaml: &str, field: &str) -> String {
        let pattern = format!(r"(?m)^{}:[ \t]*(.*)$", regex::escape(field));
        let Ok(re) = Regex::new(&pattern) else {
            return String::new();
        };

        re.captures(yaml)
            .and_then(|caps| caps.get(1))
            .map(|m| unquote(m.as_str().trim()))
            .unwrap_or_default()
    }

    /// Read the `category` and `post_tag` lists from the taxonomy block
    pub fn taxonomy(yaml: &str) -> (Vec<String>, Vec<String>) {
        (list_items(yaml, "category"), list_items(yaml, "post_tag"))
    }

    /// Serialize header fields into a complete delimited header block,
    /// including the trailing newline after the closing delimiter.
    pub fn serialize(fields: &FrontMatterFields) -> String {
        let mut lines = vec![DELIMITER.to_string()];

        lines.push(format!("title: {}", quote_scalar(&fields.title)));
        lines.push(format!("post_status: {}", fields.post_status));
        if !fields.post_date.is_empty() {
            lines.push(format!("post_date: {}", fields.post_date));
        }
        if !fields.excerpt.is_empty() {
            lines.push(format!("post_excerpt: {}", quote_scalar(&fields.excerpt)));
        }
        if !fields.featured_image.is_empty() {
            lines.push(format!("featured_image: {}", fields.featured_image));
        }

        if !fields.categories.is_empty() || !fields.tags.is_empty() {
            lines.push("taxonomy:".to_string());
            if !fields.categories.is_empty() {
                lines.push(format!("{}category:", NESTED_INDENT));
                for category in &fields.categories {
                    lines.push(format!("{}- {}", ITEM_INDENT, category));
                }
            }
            if !fields.tags.is_empty() {
                lines.push(format!("{}post_tag:", NESTED_INDENT));
                for tag in &fields.tags {
                    lines.push(format!("{}- {}", ITEM_INDENT, tag));
                }
            }
        }

        if let Some(provenance) = &fields.provenance {
            lines.push("custom_fields:".to_string());
            lines.push(format!("{}_translation_group: {}", NESTED_INDENT, provenance.translation_group));
            lines.push(format!("{}_translation_lang: {}", NESTED_INDENT, provenance.translation_lang));
        }

        lines.push(DELIMITER.to_string());
        lines.join("\n") + "\n"
    }
}

/// Collect `- item` lines directly following a `key:` line
fn list_items(yaml: &str, key: &str) -> Vec<String> {
    let header = format!("{}:", key);
    let mut items = Vec::new();
    let mut lines = yaml.lines();

    while let Some(line) = lines.next() {
        if line.trim() != header {
            continue;
        }
        for item_line in lines.by_ref() {
            let is_indented = item_line.starts_with(' ') || item_line.starts_with('\t');
            let Some(item) = item_line.trim_start().strip_prefix('-') else {
                break;
            };
            if !is_indented || !item.starts_with([' ', '\t']) || item.trim().is_empty() {
                break;
            }
            items.push(item.trim().to_string());
        }
        break;
    }

    items
}

/// Wrap a scalar in double quotes when it would not read back verbatim
fn quote_scalar(value: &str) -> String {
    // the header is line-based, so embedded newlines cannot survive
    let single_line = value.replace(['\r', '\n'], " ");
    let needs_quotes = single_line.contains([':', '#', '"', '\\'])
        || single_line.starts_with('\'')
        || single_line != single_line.trim();

    if !needs_quotes {
        return single_line;
    }

    let escaped = single_line.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Strip surrounding quotes, undoing the escaping done by `quote_scalar`
fn unquote(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        let inner = &value[1..value.len() - 1];
        let mut result = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    Some(escaped) => result.push(escaped),
                    None => result.push('\\'),
                }
            } else {
                result.push(c);
            }
        }
        return result;
    }

    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        return value[1..value.len() - 1].to_string();
    }

    value.to_string()
}
