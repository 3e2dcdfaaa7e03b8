/*!
 * Translatable segment extraction.
 */

use serde::Serialize;

use super::body::scan_images;
use super::frontmatter::{FrontMatter, SplitDocument};

/// Post status assumed when the header does not set one
pub const DEFAULT_POST_STATUS: &str = "publish";

/// Every translatable string of an article plus the opaque fields that are
/// carried through translation unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segments {
    pub title: String,
    /// Empty when the article has no excerpt
    pub excerpt: String,
    /// Raw markdown body
    pub body: String,
    /// Category slugs
    pub categories: Vec<String>,
    /// Tag slugs
    pub tags: Vec<String>,
    /// Non-empty image alt texts in document order
    pub image_alts: Vec<String>,
    /// Non-empty image titles in document order
    pub image_titles: Vec<String>,
    pub featured_image: String,
    pub post_status: String,
    pub post_date: String,
    /// Raw header block
    #[serde(skip)]
    pub yaml: String,
}

impl Segments {
    /// Extract segments from a full document. Returns `None` when the
    /// document has no front matter header.
    pub fn extract(raw: &str) -> Option<Self> {
        let SplitDocument { yaml, body } = FrontMatter::split(raw)?;
        Some(Self::from_parts(yaml, body))
    }

    /// Extract segments from an already split header and body
    pub fn from_parts(yaml: String, body: String) -> Self {
        let title = FrontMatter::scalar(&yaml, "title");
        let excerpt = FrontMatter::scalar(&yaml, "post_excerpt");
        let featured_image = FrontMatter::scalar(&yaml, "featured_image");
        let post_date = FrontMatter::scalar(&yaml, "post_date");
        let mut post_status = FrontMatter::scalar(&yaml, "post_status");
        if post_status.is_empty() {
            post_status = DEFAULT_POST_STATUS.to_string();
        }
        let (categories, tags) = FrontMatter::taxonomy(&yaml);

        let images = scan_images(&body);
        let image_alts = images.iter()
            .filter(|image| !image.alt.is_empty())
            .map(|image| image.alt.clone())
            .collect();
        let image_titles = images.iter()
            .filter(|image| !image.title.is_empty())
            .map(|image| image.title.clone())
            .collect();

        Self {
            title,
            excerpt,
            body,
            categories,
            tags,
            image_alts,
            image_titles,
            featured_image,
            post_status,
            post_date,
            yaml,
        }
    }

    /// Whether the article contains any string worth sending to a provider
    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.excerpt.is_empty()
            && self.body.trim().is_empty()
            && self.categories.is_empty()
            && self.tags.is_empty()
            && self.image_alts.is_empty()
            && self.image_titles.is_empty()
    }
}
