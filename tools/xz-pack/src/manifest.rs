//! xzpack.toml manifest parsing
//!
//! Both sections are optional; each command only reads its own.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// xzpack.toml manifest structure
#[derive(Debug, Default, Deserialize)]
pub struct PackManifest {
    #[serde(default)]
    pub assets: Option<AssetsSection>,
    #[serde(default)]
    pub models: Option<ModelsSection>,
}

/// Files to pack into assets.bin
#[derive(Debug, Default, Deserialize)]
pub struct AssetsSection {
    /// Output path, relative to the manifest
    pub output: Option<String>,
    #[serde(default)]
    pub files: Vec<AssetFileEntry>,
}

/// Single asset file
#[derive(Debug, Deserialize)]
pub struct AssetFileEntry {
    pub path: String,

    /// Name stored in the table. Defaults to the file name of `path`.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub width: Option<u16>,
    #[serde(default)]
    pub height: Option<u16>,
}

/// Models to pack into srmodels.bin
#[derive(Debug, Default, Deserialize)]
pub struct ModelsSection {
    /// Output path, relative to the manifest
    pub output: Option<String>,

    /// Target chip (e.g. "esp32s3"). Models are not validated when absent.
    pub chip: Option<String>,

    /// Model share: a directory relative to the manifest, or an http(s) URL
    pub source: Option<String>,

    #[serde(default)]
    pub names: Vec<String>,
}

impl PackManifest {
    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse manifest from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse xzpack.toml")
    }
}

impl AssetFileEntry {
    /// Name stored in the asset table
    pub fn table_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            Path::new(&self.path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.clone())
        })
    }
}

/// A loaded manifest and the directory its relative paths start from
pub struct ManifestContext {
    pub manifest: PackManifest,
    pub project_dir: PathBuf,
}

pub fn load_manifest(manifest_path: &Path) -> Result<ManifestContext> {
    let manifest = PackManifest::load(manifest_path)?;

    let project_dir = manifest_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    Ok(ManifestContext {
        manifest,
        project_dir,
    })
}

/// Resolve a manifest-relative location. URLs are left alone.
pub fn resolve_location(project_dir: &Path, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        location.to_string()
    } else {
        project_dir.join(location).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_manifest() {
        let manifest = PackManifest::parse(
            r#"
[assets]
output = "build/assets.bin"

[[assets.files]]
path = "fonts/font_puhui_14_1.bin"

[[assets.files]]
path = "emoji/happy.png"
name = "happy.png"
width = 64
height = 64

[models]
output = "build/srmodels.bin"
chip = "esp32c3"
source = "https://example.com/wakenet_model"
names = ["wn9s_hilexin", "wn9s_alexa"]
"#,
        )
        .unwrap();

        let assets = manifest.assets.unwrap();
        assert_eq!(assets.output.as_deref(), Some("build/assets.bin"));
        assert_eq!(assets.files.len(), 2);
        assert_eq!(assets.files[0].table_name(), "font_puhui_14_1.bin");
        assert_eq!(assets.files[0].width, None);
        assert_eq!(assets.files[1].table_name(), "happy.png");
        assert_eq!(assets.files[1].width, Some(64));

        let models = manifest.models.unwrap();
        assert_eq!(models.chip.as_deref(), Some("esp32c3"));
        assert_eq!(models.names, vec!["wn9s_hilexin", "wn9s_alexa"]);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = PackManifest::parse("").unwrap();
        assert!(manifest.assets.is_none());
        assert!(manifest.models.is_none());
    }

    #[test]
    fn test_bad_dimension_rejected() {
        let result = PackManifest::parse(
            r#"
[[assets.files]]
path = "a.png"
width = 70000
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_location() {
        let dir = Path::new("project");
        assert_eq!(
            resolve_location(dir, "https://example.com/m"),
            "https://example.com/m"
        );
        assert_eq!(
            PathBuf::from(resolve_location(dir, "static/wakenet_model")),
            dir.join("static/wakenet_model")
        );
    }
}
