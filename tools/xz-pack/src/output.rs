use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

pub const DEFAULT_ASSETS_OUTPUT: &str = "assets.bin";
pub const DEFAULT_MODELS_OUTPUT: &str = "srmodels.bin";

/// Pick the output path: CLI flag, then manifest entry, then the default
/// name in `base_dir`.
pub fn resolve_output_path(
    override_path: Option<PathBuf>,
    manifest_output: Option<&str>,
    base_dir: &Path,
    default_name: &str,
) -> PathBuf {
    override_path.unwrap_or_else(|| base_dir.join(manifest_output.unwrap_or(default_name)))
}

/// Write a finished blob, creating parent directories as needed
pub fn write_blob(output_path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(output_path, bytes)
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;
    Ok(())
}

pub fn print_summary(output_path: &Path, bytes: &[u8]) {
    println!();
    println!("Output: {}", output_path.display());
    println!(
        "  Size: {} bytes ({:.2} KB)",
        bytes.len(),
        bytes.len() as f64 / 1024.0
    );
    println!("  Hash: {:016x}", xxh3_64(bytes));
}
