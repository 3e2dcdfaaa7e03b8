use anyhow::{Result, Context, anyhow};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: Article file layout and file system operations

static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());
static LANG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]{2,5}$").unwrap());

/// Extension of article files
pub const ARTICLE_EXTENSION: &str = "md";

/// What happened to a translation handed to `save_translation`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was written
    Written(PathBuf),
    /// A translation already existed and overwriting was not requested
    Skipped(PathBuf),
}

impl SaveOutcome {
    pub fn path(&self) -> &Path {
        match self {
            SaveOutcome::Written(path) | SaveOutcome::Skipped(path) => path,
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @returns: Last modification time, `None` if the file is missing
    pub fn modified_time<P: AsRef<Path>>(path: P) -> Option<DateTime<Utc>> {
        fs::metadata(path.as_ref())
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @validates: Article slug, lowercase letters, digits and hyphens
    pub fn validate_slug(slug: &str) -> Result<()> {
        if SLUG_REGEX.is_match(slug) {
            Ok(())
        } else {
            Err(anyhow!("Invalid article slug: {:?}", slug))
        }
    }

    // @validates: Language directory code, 2 to 5 lowercase letters
    pub fn validate_lang(lang: &str) -> Result<()> {
        if LANG_REGEX.is_match(lang) {
            Ok(())
        } else {
            Err(anyhow!("Invalid language directory: {:?}", lang))
        }
    }

    // @generates: Path of a source article
    // @params: blog_dir, slug
    pub fn source_article_path<P: AsRef<Path>>(blog_dir: P, slug: &str) -> PathBuf {
        blog_dir.as_ref().join(format!("{}.{}", slug, ARTICLE_EXTENSION))
    }

    // @generates: Path of a translated article
    // @params: blog_dir, lang, slug
    pub fn translation_output_path<P: AsRef<Path>>(blog_dir: P, lang: &str, slug: &str) -> PathBuf {
        blog_dir.as_ref().join(lang).join(format!("{}.{}", slug, ARTICLE_EXTENSION))
    }

    /// Find the slugs of all source articles directly inside the blog directory.
    ///
    /// Language subdirectories are not descended into, and files whose stem is
    /// not a valid slug are ignored. The result is sorted.
    pub fn find_articles<P: AsRef<Path>>(blog_dir: P) -> Result<Vec<String>> {
        let mut slugs = Vec::new();

        for entry in WalkDir::new(blog_dir.as_ref()).min_depth(1).max_depth(1) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }
            let is_article = path.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(ARTICLE_EXTENSION));
            if !is_article {
                continue;
            }

            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
                continue;
            };
            if Self::validate_slug(&stem).is_ok() {
                slugs.push(stem);
            } else {
                debug!("Skipping {:?}: not a valid slug", path);
            }
        }

        slugs.sort();
        Ok(slugs)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a source article by slug
    pub fn read_article<P: AsRef<Path>>(blog_dir: P, slug: &str) -> Result<String> {
        Self::validate_slug(slug)?;
        let path = Self::source_article_path(blog_dir, slug);
        if !Self::file_exists(&path) {
            return Err(anyhow!("Article not found: {:?}", path));
        }
        Self::read_to_string(path)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Save a translated article to `<blog_dir>/<lang>/<slug>.md`.
    ///
    /// An existing translation is left alone unless `force_overwrite` is set.
    pub fn save_translation<P: AsRef<Path>>(
        blog_dir: P,
        lang: &str,
        slug: &str,
        content: &str,
        force_overwrite: bool,
    ) -> Result<SaveOutcome> {
        Self::validate_slug(slug)?;
        Self::validate_lang(lang)?;
        if content.trim().is_empty() {
            return Err(anyhow!("Refusing to save an empty translation for {}/{}", lang, slug));
        }

        let path = Self::translation_output_path(blog_dir, lang, slug);
        if Self::file_exists(&path) && !force_overwrite {
            warn!("Translation already exists, skipping: {:?}", path);
            return Ok(SaveOutcome::Skipped(path));
        }

        Self::write_to_file(&path, content)?;
        debug!("Saved translation to {:?}", path);
        Ok(SaveOutcome::Written(path))
    }
}
