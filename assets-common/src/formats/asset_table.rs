//! SPIFFS asset image (`assets.bin`)
//!
//! Packs named files into a single blob that the firmware memory-maps from
//! its assets partition.
//!
//! # Layout
//! ```text
//! 0x00: file_count u32
//! 0x04: checksum u32            (u16 sum of table + payload, widened)
//! 0x08: combined_length u32     (table size + payload size)
//! 0x0C: table[file_count]       (44 bytes each)
//!         name      [u8; 32]    (UTF-8, zero padded)
//!         size      u32
//!         offset    u32         (into payload, points at the marker)
//!         width     u16
//!         height    u16
//! ....: payload[file_count]
//!         marker    [0x5A, 0x5A]
//!         data      [u8; size]
//! ```
//!
//! All integers are little-endian. Files are ordered by extension, then by
//! base name, with locale-aware comparison.

use std::collections::BTreeMap;

use crate::PackError;
use crate::collation::locale_cmp;
use crate::formats::asset_kind::sniff_dimensions;
use crate::packing::{NAME_FIELD_LEN, checksum16, exceeds_name_field, pack_name_utf8, to_u32_field};
use crate::progress::{NoProgress, ProgressObserver, ProgressStage};

/// Size of the outer header (count + checksum + combined length)
pub const ASSET_HEADER_SIZE: usize = 12;

/// Size of one metadata table record
pub const ASSET_RECORD_SIZE: usize = NAME_FIELD_LEN + 4 + 4 + 2 + 2;

/// Tag written before every file in the payload section
pub const ASSET_MARKER: [u8; 2] = [0x5A, 0x5A];

/// Optional caller-provided image dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileOptions {
    pub width: Option<u16>,
    pub height: Option<u16>,
}

impl FileOptions {
    pub fn with_dimensions(width: u16, height: u16) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// A file registered for packing
#[derive(Debug, Clone)]
pub struct FileEntry {
    name: String,
    data: Vec<u8>,
    width: u16,
    height: u16,
}

impl FileEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Width as given by the caller (0 if not given)
    pub fn declared_width(&self) -> u16 {
        self.width
    }

    /// Height as given by the caller (0 if not given)
    pub fn declared_height(&self) -> u16 {
        self.height
    }

    /// Extension used for ordering: everything after the last `.`, or the
    /// whole name if there is none.
    pub fn extension(&self) -> &str {
        split_extension(&self.name).1
    }

    /// Name used for ordering: a trailing `.ext` removed, where `ext` is
    /// non-empty and contains no `/`.
    pub fn base_name(&self) -> &str {
        split_extension(&self.name).0
    }
}

/// A file with its final position and dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFileInfo<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
    pub size: u32,
    pub offset: u32,
    pub width: u16,
    pub height: u16,
}

impl ResolvedFileInfo<'_> {
    /// Encode this file's metadata table record
    pub fn to_record(&self) -> [u8; ASSET_RECORD_SIZE] {
        let mut record = [0u8; ASSET_RECORD_SIZE];
        record[0..32].copy_from_slice(&pack_name_utf8(self.name));
        record[32..36].copy_from_slice(&self.size.to_le_bytes());
        record[36..40].copy_from_slice(&self.offset.to_le_bytes());
        record[40..42].copy_from_slice(&self.width.to_le_bytes());
        record[42..44].copy_from_slice(&self.height.to_le_bytes());
        record
    }
}

/// Summary of the registered files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub file_count: usize,
    pub total_size: u64,
    /// Lowercase extension → number of files
    pub file_types: BTreeMap<String, usize>,
    /// Mean file size, rounded half up
    pub average_file_size: u64,
}

/// Builds `assets.bin` blobs
#[derive(Debug, Clone, Default)]
pub struct AssetTableEncoder {
    files: Vec<FileEntry>,
}

impl AssetTableEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file.
    ///
    /// Names longer than 32 bytes are accepted and truncated when packed.
    /// Names are not deduplicated: adding a name twice packs it twice.
    pub fn add_file(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>, options: FileOptions) {
        let name = name.into();
        if exceeds_name_field(&name) {
            tracing::warn!(
                "File name \"{}\" is {} bytes, will be truncated to {}",
                name,
                name.len(),
                NAME_FIELD_LEN
            );
        }

        self.files.push(FileEntry {
            name,
            data: data.into(),
            width: options.width.unwrap_or(0),
            height: options.height.unwrap_or(0),
        });
    }

    /// Registered files, in insertion order
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files in packing order
    pub fn sorted_files(&self) -> Vec<&FileEntry> {
        let mut sorted: Vec<&FileEntry> = self.files.iter().collect();
        sorted.sort_by(|a, b| {
            locale_cmp(a.extension(), b.extension())
                .then_with(|| locale_cmp(a.base_name(), b.base_name()))
        });
        sorted
    }

    /// Build the blob without progress reporting
    pub fn generate(&self) -> Result<Vec<u8>, PackError> {
        self.generate_with_progress(&mut NoProgress)
    }

    /// Build the blob, reporting milestones to `progress`
    pub fn generate_with_progress(
        &self,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Vec<u8>, PackError> {
        if self.files.is_empty() {
            return Err(PackError::EmptyInput("files"));
        }

        report(progress, ProgressStage::Start, 0, 0, "Packing files...");

        let resolved = self.resolve(progress)?;
        let total = resolved.len();

        report(progress, ProgressStage::BuildTable, 0, total, "Building file table...");
        let mut table = Vec::with_capacity(total * ASSET_RECORD_SIZE);
        for info in &resolved {
            table.extend_from_slice(&info.to_record());
        }

        report(progress, ProgressStage::MergeData, 0, total, "Merging file data...");
        let payload_size: usize = resolved
            .iter()
            .map(|info| ASSET_MARKER.len() + info.data.len())
            .sum();
        let mut payload = Vec::with_capacity(payload_size);
        for (i, info) in resolved.iter().enumerate() {
            report(
                progress,
                ProgressStage::MergeFile,
                i,
                total,
                &format!("Merging file: {}", info.name),
            );
            payload.extend_from_slice(&ASSET_MARKER);
            payload.extend_from_slice(info.data);
        }

        report(progress, ProgressStage::Checksum, 0, total, "Computing checksum...");
        let checksum = checksum16([table.as_slice(), payload.as_slice()]);
        let combined_length = to_u32_field(table.len() + payload.len(), "combined length")?;
        let file_count = to_u32_field(total, "file count")?;

        report(progress, ProgressStage::Assemble, 0, total, "Assembling output...");
        let mut out = Vec::with_capacity(ASSET_HEADER_SIZE + table.len() + payload.len());
        out.extend_from_slice(&file_count.to_le_bytes());
        out.extend_from_slice(&u32::from(checksum).to_le_bytes());
        out.extend_from_slice(&combined_length.to_le_bytes());
        out.extend_from_slice(&table);
        out.extend_from_slice(&payload);

        tracing::debug!(
            "Packed {} files ({} bytes, checksum {:#06x})",
            total,
            out.len(),
            checksum
        );
        report(progress, ProgressStage::Done, total, total, "Packing complete");

        Ok(out)
    }

    /// Sort files and assign offsets and dimensions.
    ///
    /// Registered entries are left untouched; sniffed dimensions only live
    /// in the returned infos.
    fn resolve(
        &self,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Vec<ResolvedFileInfo<'_>>, PackError> {
        let sorted = self.sorted_files();
        let total = sorted.len();
        let mut resolved = Vec::with_capacity(total);
        let mut offset = 0usize;

        for (i, file) in sorted.into_iter().enumerate() {
            report(
                progress,
                ProgressStage::ResolveFile,
                i,
                total,
                &format!("Processing file: {}", file.name),
            );

            let (width, height) = if file.width == 0 && file.height == 0 {
                sniff_dimensions(&file.name, &file.data)
            } else {
                (file.width, file.height)
            };

            resolved.push(ResolvedFileInfo {
                name: &file.name,
                data: &file.data,
                size: to_u32_field(file.data.len(), "file size")?,
                offset: to_u32_field(offset, "file offset")?,
                width,
                height,
            });

            offset += ASSET_MARKER.len() + file.data.len();
        }

        Ok(resolved)
    }

    /// Summarise the registered files
    pub fn stats(&self) -> AssetStats {
        let mut stats = AssetStats {
            file_count: self.files.len(),
            ..AssetStats::default()
        };

        for file in &self.files {
            stats.total_size += file.data.len() as u64;

            let ext = file.name.rsplit('.').next().unwrap_or_default().to_lowercase();
            let ext = if ext.is_empty() { "unknown".to_string() } else { ext };
            *stats.file_types.entry(ext).or_insert(0) += 1;
        }

        if stats.file_count > 0 {
            let count = stats.file_count as u64;
            stats.average_file_size = (2 * stats.total_size + count) / (2 * count);
        }

        stats
    }

    /// Forget all registered files
    pub fn clear(&mut self) {
        self.files.clear();
    }
}

fn report(
    progress: &mut dyn ProgressObserver,
    stage: ProgressStage,
    index: usize,
    total: usize,
    message: &str,
) {
    progress.on_progress(stage, stage.percent(index, total), message);
}

/// Split a name into (base, extension) for ordering
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) => {
            let ext = &name[dot + 1..];
            let base = if !ext.is_empty() && !ext.contains('/') {
                &name[..dot]
            } else {
                name
            };
            (base, ext)
        }
        None => (name, name),
    }
}
