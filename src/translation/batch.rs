/*!
 * Batch building.
 *
 * All translatable strings of an article are flattened into one ordered list
 * so a single provider call serves a whole target language. The index map
 * records where each field landed; it is the only way to read fields back.
 */

use log::{debug, warn};
use std::ops::Range;

use crate::article::{ProtectedBody, Segments, humanize_slug, split_paragraphs};

/// Positions of each article field inside a batch.
///
/// Fields are appended in a fixed order: title, excerpt, body, categories,
/// tags, image alts, image titles. `None` means the field contributed no
/// entries and must be taken from the original article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchIndex {
    pub title: Option<usize>,
    pub excerpt: Option<usize>,
    pub body: Option<Range<usize>>,
    pub categories: Option<Range<usize>>,
    pub tags: Option<Range<usize>>,
    pub image_alts: Option<Range<usize>>,
    pub image_titles: Option<Range<usize>>,
}

impl BatchIndex {
    /// Number of batch entries covered by all fields together
    pub fn total_len(&self) -> usize {
        let offsets = [self.title, self.excerpt].iter().filter(|o| o.is_some()).count();
        let ranges: usize = [&self.body, &self.categories, &self.tags, &self.image_alts, &self.image_titles]
            .iter()
            .filter_map(|range| range.as_ref())
            .map(|range| range.len())
            .sum();
        offsets + ranges
    }

    /// Read a single-offset field
    pub fn get<'a>(offset: Option<usize>, texts: &'a [String]) -> Option<&'a str> {
        offset.and_then(|idx| texts.get(idx)).map(|s| s.as_str())
    }

    /// Read a range field; absent or out-of-bounds ranges read as empty
    pub fn slice<'a>(range: &Option<Range<usize>>, texts: &'a [String]) -> &'a [String] {
        range.as_ref()
            .and_then(|r| texts.get(r.clone()))
            .unwrap_or(&[])
    }
}

/// One ordered list of strings for a provider call, with its index map
#[derive(Debug, Clone, Default)]
pub struct Batch {
    /// Strings to translate, in index order
    pub texts: Vec<String>,
    /// Where each field lives in `texts`
    pub index: BatchIndex,
    /// The image-stripped body the body chunks were cut from
    pub body: ProtectedBody,
}

impl Batch {
    /// Build the batch for an article. Pure: the same segments always give
    /// the same batch.
    pub fn build(segments: &Segments) -> Self {
        let mut texts = Vec::new();
        let mut index = BatchIndex::default();

        if !segments.title.is_empty() {
            index.title = Some(texts.len());
            texts.push(segments.title.clone());
        }

        if !segments.excerpt.is_empty() {
            index.excerpt = Some(texts.len());
            texts.push(segments.excerpt.clone());
        }

        let body = ProtectedBody::strip(&segments.body);
        index.body = append_range(&mut texts, split_paragraphs(&body.text));
        index.categories = append_range(&mut texts, segments.categories.iter().map(|c| humanize_slug(c)));
        index.tags = append_range(&mut texts, segments.tags.iter().map(|t| humanize_slug(t)));
        index.image_alts = append_range(&mut texts, segments.image_alts.iter().cloned());
        index.image_titles = append_range(&mut texts, segments.image_titles.iter().cloned());

        debug!("Built batch of {} strings ({} images protected)", texts.len(), body.slots.len());

        Self { texts, index, body }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Line the provider output up with the batch.
    ///
    /// The result always has exactly `self.len()` entries. Entries the
    /// provider did not return are filled with the source string at the same
    /// position; surplus entries are dropped.
    pub fn align(&self, translated: Vec<String>) -> Vec<String> {
        if translated.len() != self.texts.len() {
            warn!(
                "Provider returned {} strings for a batch of {}, falling back to source text for the gap",
                translated.len(),
                self.texts.len()
            );
        }

        let mut translated = translated.into_iter();
        self.texts.iter()
            .map(|source| translated.next().unwrap_or_else(|| source.clone()))
            .collect()
    }
}

/// Append items and return their range, or `None` when nothing was appended
fn append_range(texts: &mut Vec<String>, items: impl IntoIterator<Item = String>) -> Option<Range<usize>> {
    let start = texts.len();
    texts.extend(items);
    let end = texts.len();
    (end > start).then_some(start..end)
}
