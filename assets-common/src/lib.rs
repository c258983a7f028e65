//! Binary asset formats for xiaozhi firmware
//!
//! This crate provides the encoders shared by the `xz-pack` tool and anything
//! else that needs to produce firmware-ready blobs:
//!
//! - [`formats::asset_table`] - SPIFFS asset image (`assets.bin`)
//! - [`formats::model_bundle`] - WakeNet model bundle (`srmodels.bin`)
//! - [`packing`] - Fixed-width name and integer packing helpers
//! - [`collation`] - Locale-aware name ordering used by both formats
//! - [`source`] - Where wake-word model files are fetched from
//! - [`wakenet`] - Known WakeNet models and chip compatibility rules
//!
//! Both encoders are byte-exact with the packers shipped with the
//! firmware SDK. The firmware reads these blobs directly out of flash, so
//! field widths, endianness and ordering are load-bearing.

pub mod collation;
mod error;
pub mod formats;
pub mod packing;
pub mod progress;
pub mod source;
pub mod wakenet;

pub use error::PackError;

pub use collation::{CollatedName, locale_cmp};
pub use formats::{
    ASSET_HEADER_SIZE, ASSET_MARKER, ASSET_RECORD_SIZE, AssetKind, AssetStats, AssetTableEncoder,
    DimensionStrategy, FILE_ENTRY_SIZE, FileEntry, FileOptions, MODEL_ENTRY_SIZE, ModelBundleEncoder,
    ModelGroup, ModelStats, ResolvedFileInfo,
};
pub use packing::{NAME_FIELD_LEN, pack_name_latin1, pack_name_utf8};
pub use progress::{NoProgress, ProgressObserver, ProgressStage};
pub use source::{DirectorySource, FetchError, HttpSource, ModelSource, ShareSource};
pub use wakenet::{ModelCatalog, SHARE_MODEL_FILES, WakeNetTier, is_valid_model};
