/*!
 * Article model: front matter codec, segment extraction and body handling.
 *
 * - `frontmatter`: Header block parsing and serialization
 * - `segments`: Extraction of every translatable string of an article
 * - `body`: Image protection and paragraph segmentation of the markdown body
 * - `slug`: Slug generation and humanization
 */

pub use self::body::{ImageRef, ImageSlot, ProtectedBody, scan_images, split_paragraphs};
pub use self::frontmatter::{FrontMatter, FrontMatterFields, Provenance, SplitDocument};
pub use self::segments::Segments;
pub use self::slug::{DEFAULT_SLUG_MAX_LENGTH, generate_slug, humanize_slug};

pub mod body;
pub mod frontmatter;
pub mod segments;
pub mod slug;
