/*!
 * Reassembly of translated articles.
 *
 * Provider output is mapped back through the batch index, images are put
 * back into the body and the header is re-serialized with provenance
 * markers. Nothing here can fail: missing translations fall back to the
 * original text.
 */

use crate::article::{FrontMatter, FrontMatterFields, Provenance, Segments, generate_slug};

use super::batch::{Batch, BatchIndex};

/// Separator placed between translated body chunks
const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Translated counterpart of [`Segments`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedSegments {
    pub title: String,
    pub excerpt: String,
    /// Rejoined body with images reinserted
    pub body: String,
    /// Slugs regenerated from the translated category names
    pub categories: Vec<String>,
    /// Slugs regenerated from the translated tag names
    pub tags: Vec<String>,
    pub image_alts: Vec<String>,
    pub image_titles: Vec<String>,
}

impl TranslatedSegments {
    /// Map provider output back onto the article fields
    pub fn from_batch(original: &Segments, batch: &Batch, translated: Vec<String>, slug_max_length: usize) -> Self {
        let texts = batch.align(translated);
        let index = &batch.index;

        let title = BatchIndex::get(index.title, &texts)
            .map(str::to_string)
            .unwrap_or_else(|| original.title.clone());
        let excerpt = BatchIndex::get(index.excerpt, &texts)
            .map(str::to_string)
            .unwrap_or_else(|| original.excerpt.clone());

        let image_alts = BatchIndex::slice(&index.image_alts, &texts).to_vec();
        let image_titles = BatchIndex::slice(&index.image_titles, &texts).to_vec();

        let body = match index.body {
            Some(_) => {
                let joined = BatchIndex::slice(&index.body, &texts).join(PARAGRAPH_SEPARATOR);
                batch.body.reinsert(&joined, &image_alts, &image_titles)
            }
            None => original.body.clone(),
        };

        let categories = reslug(&index.categories, &texts, &original.categories, slug_max_length);
        let tags = reslug(&index.tags, &texts, &original.tags, slug_max_length);

        Self {
            title,
            excerpt,
            body,
            categories,
            tags,
            image_alts,
            image_titles,
        }
    }
}

/// Regenerate slugs from translated terms, or keep the originals when the
/// field was not part of the batch
fn reslug(range: &Option<std::ops::Range<usize>>, texts: &[String], original: &[String], max_length: usize) -> Vec<String> {
    if range.is_none() {
        return original.to_vec();
    }

    BatchIndex::slice(range, texts)
        .iter()
        .zip(original)
        .map(|(term, fallback)| {
            let slug = generate_slug(term, max_length);
            if slug.is_empty() { fallback.clone() } else { slug }
        })
        .collect()
}

/// Build the complete translated document.
///
/// Status, date and featured image come from the original; title, excerpt,
/// taxonomy and body from the translation. The header gains provenance
/// markers naming the source document and the target language.
pub fn reassemble(
    original: &Segments,
    translated: &TranslatedSegments,
    target_lang_dir: &str,
    source_id: &str,
) -> String {
    let header = FrontMatter::serialize(&FrontMatterFields {
        title: translated.title.clone(),
        post_status: original.post_status.clone(),
        post_date: original.post_date.clone(),
        excerpt: translated.excerpt.clone(),
        featured_image: original.featured_image.clone(),
        categories: translated.categories.clone(),
        tags: translated.tags.clone(),
        provenance: Some(Provenance {
            translation_group: source_id.to_string(),
            translation_lang: target_lang_dir.to_string(),
        }),
    });

    format!("{}\n{}", header, translated.body)
}
