/*!
 * Markdown body protection and paragraph segmentation.
 *
 * Image references are swapped for positional placeholder tokens before the
 * body is translated, and the body is cut into paragraph-sized units. Fenced
 * code blocks are never cut, even when they contain blank lines, and images
 * inside them are left as written.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

/// Markdown image syntax: `![alt](path "title")`, title optional
static IMAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)]+?)(?:\s+"([^"]*)")?\)"#).unwrap()
});

/// Token prefix used when the body does not already contain it
const DEFAULT_TOKEN_PREFIX: &str = "__IMG_";

const FENCE: &str = "```";

/// An image reference found in a markdown body
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub alt: String,
    pub path: String,
    /// Empty when the reference has no title
    pub title: String,
}

impl ImageRef {
    fn from_captures(caps: &Captures) -> Self {
        Self {
            alt: caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
            path: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            title: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
        }
    }

    /// Render as markdown image syntax
    pub fn to_markdown(&self) -> String {
        if self.title.is_empty() {
            format!("![{}]({})", self.alt, self.path)
        } else {
            format!("![{}]({} \"{}\")", self.alt, self.path, self.title)
        }
    }
}

/// Scan a markdown body for image references in document order.
/// References inside fenced code blocks are code, not images.
pub fn scan_images(body: &str) -> Vec<ImageRef> {
    let fences = fenced_ranges(body);
    IMAGE_REGEX.captures_iter(body)
        .filter(|caps| !is_fenced(&fences, caps.get(0).map_or(0, |m| m.start())))
        .map(|caps| ImageRef::from_captures(&caps))
        .collect()
}

/// Byte ranges of fenced code blocks, fence lines included.
/// An unclosed fence runs to the end of the body.
fn fenced_ranges(body: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<usize> = None;
    let mut offset = 0;

    for line in body.split('\n') {
        let end = offset + line.len();
        if line.trim().starts_with(FENCE) {
            match open.take() {
                Some(start) => ranges.push(start..end),
                None => open = Some(offset),
            }
        }
        offset = end + 1;
    }

    if let Some(start) = open {
        ranges.push(start..body.len());
    }
    ranges
}

fn is_fenced(fences: &[Range<usize>], position: usize) -> bool {
    fences.iter().any(|range| range.contains(&position))
}

/// Pick a token prefix that never occurs in `body`, so literal text such as
/// `__IMG_0__` in the prose cannot be mistaken for a placeholder
fn token_prefix(body: &str) -> String {
    let mut prefix = DEFAULT_TOKEN_PREFIX.to_string();
    while body.contains(&prefix) {
        prefix.insert(prefix.len() - 1, 'X');
    }
    prefix
}

/// One stripped image and where its translatable texts live
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSlot {
    /// Placeholder token standing in for the image
    pub token: String,
    /// The original reference; its path is never translated
    pub image: ImageRef,
    /// Position of this image's alt text among the non-empty alt texts
    pub alt_index: Option<usize>,
    /// Position of this image's title among the non-empty titles
    pub title_index: Option<usize>,
}

/// A markdown body with every image replaced by a placeholder token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProtectedBody {
    /// Body text with placeholders
    pub text: String,
    /// Stripped images, indexed by the number in their token
    pub slots: Vec<ImageSlot>,
}

impl ProtectedBody {
    /// Replace every image reference outside code fences, left to right,
    /// with `__IMG_<n>__`. When the body already contains `__IMG_`, the
    /// prefix is widened (`__IMGX_`, `__IMGXX_`, ...) until it is unique.
    pub fn strip(body: &str) -> Self {
        let mut slots: Vec<ImageSlot> = Vec::new();
        let mut alt_count = 0;
        let mut title_count = 0;
        let fences = fenced_ranges(body);
        let prefix = token_prefix(body);

        let text = IMAGE_REGEX.replace_all(body, |caps: &Captures| {
            if is_fenced(&fences, caps.get(0).map_or(0, |m| m.start())) {
                return caps[0].to_string();
            }

            let image = ImageRef::from_captures(caps);
            let token = placeholder(&prefix, slots.len());

            let alt_index = (!image.alt.is_empty()).then(|| {
                alt_count += 1;
                alt_count - 1
            });
            let title_index = (!image.title.is_empty()).then(|| {
                title_count += 1;
                title_count - 1
            });

            slots.push(ImageSlot {
                token: token.clone(),
                image,
                alt_index,
                title_index,
            });
            token
        });

        Self {
            text: text.into_owned(),
            slots,
        }
    }

    /// Put the images back into `text`, using translated alt texts and
    /// titles where available and the original ones otherwise.
    ///
    /// Tokens that do not refer to a known slot are left as they are.
    pub fn reinsert(&self, text: &str, alts: &[String], titles: &[String]) -> String {
        let mut restored = text.to_string();

        for slot in &self.slots {
            if !restored.contains(&slot.token) {
                continue;
            }

            let alt = pick_translated(slot.alt_index, alts, &slot.image.alt);
            let title = pick_translated(slot.title_index, titles, &slot.image.title);
            let markdown = ImageRef {
                alt,
                path: slot.image.path.clone(),
                title,
            }.to_markdown();

            restored = restored.replace(&slot.token, &markdown);
        }

        restored
    }
}

// The trailing `__` keeps `__IMG_1__` from matching inside `__IMG_10__`
fn placeholder(prefix: &str, index: usize) -> String {
    format!("{}{}__", prefix, index)
}

fn pick_translated(index: Option<usize>, translated: &[String], original: &str) -> String {
    index.and_then(|i| translated.get(i))
        .filter(|text| !text.is_empty())
        .cloned()
        .unwrap_or_else(|| original.to_string())
}

/// Split a markdown body into paragraph chunks at blank lines.
///
/// A line starting with a code fence toggles fenced mode; while fenced, blank
/// lines stay inside the current chunk. Whitespace-only chunks are dropped.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_fence = false;

    for line in body.split('\n') {
        let trimmed = line.trim();
        if trimmed.starts_with(FENCE) {
            in_fence = !in_fence;
            append_line(&mut current, line);
        } else if !in_fence && trimmed.is_empty() {
            if !current.trim().is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current.clear();
        } else {
            append_line(&mut current, line);
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }

    chunks
}

fn append_line(chunk: &mut String, line: &str) {
    if !chunk.is_empty() {
        chunk.push('\n');
    }
    chunk.push_str(line);
}
