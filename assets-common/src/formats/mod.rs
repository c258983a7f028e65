//! Firmware binary formats
//!
//! Headerless POD layouts read straight out of flash by the firmware. No
//! magic bytes; the partition a blob is flashed to determines its format.
//!
//! - [`asset_table`] - `assets.bin`, mmap table + 0x5A5A-tagged payloads
//! - [`model_bundle`] - `srmodels.bin`, model table + raw payloads

pub mod asset_kind;
pub mod asset_table;
pub mod model_bundle;

pub use asset_kind::{AssetKind, DimensionStrategy};
pub use asset_table::{
    ASSET_HEADER_SIZE, ASSET_MARKER, ASSET_RECORD_SIZE, AssetStats, AssetTableEncoder, FileEntry,
    FileOptions, ResolvedFileInfo,
};
pub use model_bundle::{
    FILE_ENTRY_SIZE, MODEL_ENTRY_SIZE, ModelBundleEncoder, ModelGroup, ModelStats,
};
