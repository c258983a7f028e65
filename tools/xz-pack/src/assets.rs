//! `xz-pack assets` - build an assets.bin image

use anyhow::{Context, Result};
use clap::Args;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use assets_common::{AssetTableEncoder, FileOptions, ProgressStage};

use crate::manifest::{self, AssetsSection};
use crate::output;

/// Arguments for the assets command
#[derive(Args)]
pub struct AssetsArgs {
    /// Files or directories to pack (directories are walked recursively)
    pub inputs: Vec<PathBuf>,

    /// Path to xzpack.toml manifest
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Output assets.bin path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// A file waiting to be read and registered
#[derive(Debug, Clone, PartialEq)]
struct PendingFile {
    name: String,
    path: PathBuf,
    options: FileOptions,
}

/// Execute the assets command
pub fn execute(args: AssetsArgs) -> Result<()> {
    let mut pending = Vec::new();
    let mut manifest_output = None;
    let mut base_dir = PathBuf::from(".");

    if let Some(manifest_path) = &args.manifest {
        let ctx = manifest::load_manifest(manifest_path)?;
        if let Some(section) = ctx.manifest.assets {
            pending.extend(manifest_files(&ctx.project_dir, &section));
            manifest_output = section.output;
        }
        base_dir = ctx.project_dir;
    }

    for input in &args.inputs {
        pending.extend(collect_input(input)?);
    }

    let output_path = output::resolve_output_path(
        args.output,
        manifest_output.as_deref(),
        &base_dir,
        output::DEFAULT_ASSETS_OUTPUT,
    );

    println!("Packing {} files into {}", pending.len(), output_path.display());

    let encoder = load_files(pending)?;
    let blob = encoder
        .generate_with_progress(&mut log_progress)
        .context("Failed to build assets.bin")?;

    print_stats(&encoder, &blob);
    output::write_blob(&output_path, &blob)?;
    output::print_summary(&output_path, &blob);

    Ok(())
}

fn manifest_files(project_dir: &Path, section: &AssetsSection) -> Vec<PendingFile> {
    section
        .files
        .iter()
        .map(|entry| PendingFile {
            name: entry.table_name(),
            path: project_dir.join(&entry.path),
            options: FileOptions {
                width: entry.width,
                height: entry.height,
            },
        })
        .collect()
}

/// Expand a CLI input into files. Directory entries are named by their
/// path relative to the directory, with `/` separators.
fn collect_input(input: &Path) -> Result<Vec<PendingFile>> {
    if input.is_file() {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("Input has no file name: {}", input.display()))?;
        return Ok(vec![PendingFile {
            name,
            path: input.to_path_buf(),
            options: FileOptions::default(),
        }]);
    }

    if !input.is_dir() {
        anyhow::bail!("Input not found: {}", input.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", input.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(input).unwrap_or(entry.path());
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push(PendingFile {
            name,
            path: entry.path().to_path_buf(),
            options: FileOptions::default(),
        });
    }

    Ok(files)
}

/// Read all files (parallel) and register them in order
fn load_files(pending: Vec<PendingFile>) -> Result<AssetTableEncoder> {
    let loaded: Result<Vec<_>> = pending
        .into_par_iter()
        .map(|file| {
            let data = std::fs::read(&file.path)
                .with_context(|| format!("Failed to read asset: {}", file.path.display()))?;
            Ok((file, data))
        })
        .collect();

    let mut encoder = AssetTableEncoder::new();
    for (file, data) in loaded? {
        encoder.add_file(file.name, data, file.options);
    }
    Ok(encoder)
}

fn log_progress(stage: ProgressStage, percent: f32, message: &str) {
    match stage {
        ProgressStage::ResolveFile | ProgressStage::MergeFile => {
            tracing::debug!("[{:>3.0}%] {}", percent, message)
        }
        _ => tracing::info!("[{:>3.0}%] {}", percent, message),
    }
}

fn print_stats(encoder: &AssetTableEncoder, blob: &[u8]) {
    let stats = encoder.stats();
    let checksum = u32::from_le_bytes([blob[4], blob[5], blob[6], blob[7]]);

    println!();
    println!("Files: {}", stats.file_count);
    println!("  Total data: {} bytes", stats.total_size);
    println!("  Average size: {} bytes", stats.average_file_size);
    println!("  Checksum: {:#06x}", checksum);
    for (ext, count) in &stats.file_types {
        println!("  .{}: {}", ext, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::AssetFileEntry;
    use tempfile::tempdir;

    #[test]
    fn test_collect_directory_uses_relative_names() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("emoji")).unwrap();
        std::fs::write(dir.path().join("index.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("emoji/happy.png"), b"x").unwrap();

        let files = collect_input(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["emoji/happy.png", "index.json"]);
    }

    #[test]
    fn test_collect_single_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("font.bin");
        std::fs::write(&path, [1u8, 2]).unwrap();

        let files = collect_input(&path).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "font.bin");
    }

    #[test]
    fn test_collect_missing_input() {
        let dir = tempdir().unwrap();
        assert!(collect_input(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_manifest_files_resolve_against_project() {
        let section = AssetsSection {
            output: None,
            files: vec![AssetFileEntry {
                path: "emoji/happy.png".to_string(),
                name: None,
                width: Some(32),
                height: Some(16),
            }],
        };
        let files = manifest_files(Path::new("proj"), &section);
        assert_eq!(files[0].name, "happy.png");
        assert_eq!(files[0].path, Path::new("proj").join("emoji/happy.png"));
        assert_eq!(files[0].options, FileOptions::with_dimensions(32, 16));
    }

    #[test]
    fn test_load_files_keeps_order() {
        let dir = tempdir().unwrap();
        let mut pending = Vec::new();
        for i in 0..8u8 {
            let path = dir.path().join(format!("f{}.bin", i));
            std::fs::write(&path, [i]).unwrap();
            pending.push(PendingFile {
                name: format!("f{}.bin", i),
                path,
                options: FileOptions::default(),
            });
        }

        let encoder = load_files(pending).unwrap();
        let names: Vec<&str> = encoder.files().iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec!["f0.bin", "f1.bin", "f2.bin", "f3.bin", "f4.bin", "f5.bin", "f6.bin", "f7.bin"]
        );
        assert_eq!(encoder.files()[5].data(), &[5u8]);
    }
}
