//! Tag store implementation using lofty
use crate::error::{MetadataError, Result};
use crate::keys::{item_key, key_name};
use lofty::{ItemValue, Probe, Tag, TagExt, TagItem, TaggedFileExt};
use segue_core::{MixError, TagReader, TagValue, TagWriter, Tags, WriteReport};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Reads and writes the supported key set through lofty
///
/// Reading uses the file's primary tag, falling back to the first tag present.
/// Writing goes into the primary tag for the file type, creating it when the
/// file has none.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    /// Create a new tag store
    pub fn new() -> Self {
        Self
    }

    /// Read supported tags from `path`
    ///
    /// A key present several times becomes a `TagValue::List`.
    pub fn read(path: &Path) -> Result<Tags> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.to_path_buf()));
        }

        let tagged_file = lofty::read_from_path(path)?;

        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            debug!(path = %path.display(), "No tags found");
            return Ok(Tags::new());
        };

        let mut collected: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for item in tag.items() {
            let (Some(name), Some(text)) = (key_name(item.key()), item.value().text()) else {
                continue;
            };
            collected
                .entry(name.to_string())
                .or_default()
                .push(text.to_string());
        }

        let tags: Tags = collected
            .into_iter()
            .map(|(name, mut values)| {
                let value = if values.len() == 1 {
                    TagValue::Text(values.remove(0))
                } else {
                    TagValue::List(values)
                };
                (name, value)
            })
            .collect();

        debug!(path = %path.display(), keys = tags.len(), "Read tags");
        Ok(tags)
    }

    /// Write `tags` into `path`, key by key
    ///
    /// Unsupported keys are skipped. Keys the file's tag format cannot hold
    /// are recorded as failed. Only a file-level failure (unreadable file,
    /// save error) is returned as an error.
    pub fn write(path: &Path, tags: &Tags) -> Result<WriteReport> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.to_path_buf()));
        }

        let mut tagged_file = Probe::open(path)?.read()?;

        // Get or create the primary tag
        let tag_type = tagged_file.primary_tag_type();
        if tagged_file.tag(tag_type).is_none() {
            tagged_file.insert_tag(Tag::new(tag_type));
        }
        let tag = tagged_file.tag_mut(tag_type).ok_or_else(|| {
            MetadataError::WriteError(format!("could not create {:?} tag", tag_type))
        })?;

        let mut report = WriteReport::default();
        for (name, value) in tags {
            let Some(key) = item_key(name) else {
                debug!(key = %name, "Skipping unsupported tag key");
                report.skipped.push(name.clone());
                continue;
            };

            tag.remove_key(&key);
            let mut stored = 0;
            for text in value.values() {
                if tag.push(TagItem::new(key.clone(), ItemValue::Text(text.to_string()))) {
                    stored += 1;
                }
            }

            if stored == 0 {
                let reason = format!("{:?} tags cannot hold this key", tag_type);
                warn!(key = %name, reason = %reason, "Tag not written");
                report.failed.push((name.clone(), reason));
            } else {
                report.written.push(name.clone());
            }
        }

        if !report.written.is_empty() {
            tag.save_to_path(path)
                .map_err(|e: lofty::error::LoftyError| MetadataError::WriteError(e.to_string()))?;
        }

        debug!(
            path = %path.display(),
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Wrote tags"
        );

        Ok(report)
    }
}

impl TagReader for LoftyTagStore {
    fn read_tags(&self, path: &Path) -> segue_core::Result<Tags> {
        Ok(Self::read(path)?)
    }
}

impl TagWriter for LoftyTagStore {
    fn write_tags(&self, path: &Path, tags: &Tags) -> segue_core::Result<WriteReport> {
        Self::write(path, tags).map_err(|e| MixError::TagWrite(e.to_string()))
    }
}
