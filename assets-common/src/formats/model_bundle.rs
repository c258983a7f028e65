//! WakeNet model bundle (`srmodels.bin`)
//!
//! Packs wake-word models (each a group of named files) for the ESP-SR
//! model partition.
//!
//! # Layout
//! ```text
//! model_count u32
//! per model (sorted by name):
//!     model_name  [u8; 32]
//!     file_count  u32
//!     per file (sorted by name):
//!         file_name   [u8; 32]
//!         start       u32      (absolute, from start of blob)
//!         length      u32
//! file data, same order, contiguous, no padding
//! ```
//!
//! Names are packed one byte per UTF-16 code unit (see
//! [`pack_name_latin1`]). All integers are little-endian.

use std::collections::BTreeMap;

use crate::PackError;
use crate::collation::CollatedName;
use crate::packing::{NAME_FIELD_LEN, pack_name_latin1, to_u32_field};
use crate::source::ModelSource;
use crate::wakenet::SHARE_MODEL_FILES;

/// Size of the model_count field
pub const MODEL_COUNT_SIZE: usize = 4;

/// Size of a model entry before its file entries (name + file count)
pub const MODEL_ENTRY_SIZE: usize = NAME_FIELD_LEN + 4;

/// Size of one file entry (name + start + length)
pub const FILE_ENTRY_SIZE: usize = NAME_FIELD_LEN + 4 + 4;

/// Named files making up one model
#[derive(Debug, Clone, Default)]
pub struct ModelGroup {
    files: BTreeMap<CollatedName, Vec<u8>>,
}

impl ModelGroup {
    /// Files in packing order
    pub fn files(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.files
            .iter()
            .map(|(name, data)| (name.as_str(), data.as_slice()))
    }

    pub fn get(&self, file_name: &str) -> Option<&[u8]> {
        self.files
            .get(&CollatedName::from(file_name))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_size(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }
}

/// Summary of the registered models
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelStats {
    pub model_count: usize,
    pub file_count: usize,
    pub total_size: u64,
    /// Model names in packing order
    pub models: Vec<String>,
}

/// Builds `srmodels.bin` blobs
#[derive(Debug, Clone, Default)]
pub struct ModelBundleEncoder {
    models: BTreeMap<CollatedName, ModelGroup>,
}

impl ModelBundleEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) one file of a model, creating the model on first use.
    ///
    /// Names are not length checked; anything past 32 code units is dropped
    /// when packed.
    pub fn add_model_file(
        &mut self,
        model_name: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) {
        self.models
            .entry(CollatedName::new(model_name))
            .or_default()
            .files
            .insert(CollatedName::new(file_name), data.into());
    }

    /// Fetch the standard WakeNet files of `model_name` from `source`.
    ///
    /// Files are fetched one after another. A file that fails is logged and
    /// skipped; whatever was fetched stays registered. Returns `true` only if
    /// every file was fetched.
    pub async fn load_model_from_share<S: ModelSource>(
        &mut self,
        source: &S,
        model_name: &str,
    ) -> bool {
        let mut loaded = 0;

        for &file_name in SHARE_MODEL_FILES {
            match source.fetch(model_name, file_name).await {
                Ok(data) => {
                    tracing::debug!("Loaded {}/{} ({} bytes)", model_name, file_name, data.len());
                    self.add_model_file(model_name, file_name, data);
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}/{}: {}", model_name, file_name, e);
                }
            }
        }

        loaded == SHARE_MODEL_FILES.len()
    }

    /// Registered models in packing order
    pub fn models(&self) -> impl Iterator<Item = (&str, &ModelGroup)> {
        self.models
            .iter()
            .map(|(name, group)| (name.as_str(), group))
    }

    pub fn model(&self, model_name: &str) -> Option<&ModelGroup> {
        self.models.get(&CollatedName::from(model_name))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Size of the header (model count + all model and file entries)
    pub fn header_len(&self) -> usize {
        MODEL_COUNT_SIZE
            + self
                .models
                .values()
                .map(|group| MODEL_ENTRY_SIZE + group.len() * FILE_ENTRY_SIZE)
                .sum::<usize>()
    }

    /// Build the blob
    pub fn pack_models(&self) -> Result<Vec<u8>, PackError> {
        if self.models.is_empty() {
            return Err(PackError::EmptyInput("models"));
        }

        let header_len = self.header_len();
        let data_len: usize = self.models.values().map(ModelGroup::total_size).sum();
        let total_len = header_len + data_len;
        // Validates every start offset up front
        to_u32_field(total_len, "bundle size")?;

        let mut out = Vec::with_capacity(total_len);
        out.extend_from_slice(&to_u32_field(self.models.len(), "model count")?.to_le_bytes());

        let mut data_offset = header_len;
        for (model_name, group) in &self.models {
            out.extend_from_slice(&pack_name_latin1(model_name.as_str()));
            out.extend_from_slice(&to_u32_field(group.len(), "file count")?.to_le_bytes());

            for (file_name, data) in &group.files {
                out.extend_from_slice(&pack_name_latin1(file_name.as_str()));
                out.extend_from_slice(&to_u32_field(data_offset, "file start")?.to_le_bytes());
                out.extend_from_slice(&to_u32_field(data.len(), "file length")?.to_le_bytes());
                data_offset += data.len();
            }
        }

        debug_assert_eq!(out.len(), header_len);

        for group in self.models.values() {
            for data in group.files.values() {
                out.extend_from_slice(data);
            }
        }

        tracing::debug!(
            "Packed {} models ({} header + {} data bytes)",
            self.models.len(),
            header_len,
            data_len
        );

        Ok(out)
    }

    /// Summarise the registered models
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            model_count: self.models.len(),
            file_count: self.models.values().map(ModelGroup::len).sum(),
            total_size: self
                .models
                .values()
                .map(|group| group.total_size() as u64)
                .sum(),
            models: self
                .models
                .keys()
                .map(|name| name.as_str().to_string())
                .collect(),
        }
    }

    /// Forget all registered models
    pub fn clear(&mut self) {
        self.models.clear();
    }
}
