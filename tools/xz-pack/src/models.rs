//! `xz-pack models` - build a srmodels.bin bundle

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use assets_common::wakenet::DEFAULT_SHARE_LOCATION;
use assets_common::{ModelBundleEncoder, ShareSource, WakeNetTier, is_valid_model};

use crate::manifest;
use crate::output;

/// Arguments for the models command
#[derive(Args)]
pub struct ModelsArgs {
    /// Model to pack (repeatable), e.g. wn9_nihaoxiaozhi_tts
    #[arg(short = 'n', long = "model")]
    pub models: Vec<String>,

    /// Model share: directory or http(s) base URL
    #[arg(short, long)]
    pub source: Option<String>,

    /// Target chip; models the chip cannot run are skipped
    #[arg(short, long)]
    pub chip: Option<String>,

    /// Path to xzpack.toml manifest
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Output srmodels.bin path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Settings after merging CLI flags over the manifest
#[derive(Debug, PartialEq)]
struct ModelPlan {
    models: Vec<String>,
    source: String,
    chip: Option<String>,
    output: PathBuf,
}

/// Execute the models command
pub fn execute(args: ModelsArgs) -> Result<()> {
    let plan = build_plan(args)?;

    println!("Packing models into {}", plan.output.display());
    println!("  Source: {}", plan.source);
    if let Some(chip) = &plan.chip {
        println!(
            "  Chip: {} ({})",
            chip,
            WakeNetTier::for_chip(chip).name()
        );
    }

    let models = select_models(&plan.models, plan.chip.as_deref());
    let source = ShareSource::from_location(&plan.source)
        .with_context(|| format!("Failed to open model source: {}", plan.source))?;
    if let ShareSource::Directory(dir) = &source {
        if !dir.root().is_dir() {
            tracing::warn!("Model share directory not found: {}", dir.root().display());
        }
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create runtime")?;

    let mut encoder = ModelBundleEncoder::new();
    rt.block_on(async {
        for model in &models {
            if encoder.load_model_from_share(&source, model).await {
                tracing::info!("Loaded model {}", model);
            } else {
                tracing::warn!("Model {} is incomplete, packing what was loaded", model);
            }
        }
    });

    let blob = encoder
        .pack_models()
        .context("Failed to build srmodels.bin")?;

    let stats = encoder.stats();
    println!();
    println!("Models: {}", stats.model_count);
    for (name, group) in encoder.models() {
        println!("  {} ({} files, {} bytes)", name, group.len(), group.total_size());
    }
    println!("  Total data: {} bytes", stats.total_size);

    output::write_blob(&plan.output, &blob)?;
    output::print_summary(&plan.output, &blob);

    Ok(())
}

fn build_plan(args: ModelsArgs) -> Result<ModelPlan> {
    let mut models = Vec::new();
    let mut source = None;
    let mut chip = None;
    let mut manifest_output = None;
    let mut base_dir = PathBuf::from(".");

    if let Some(manifest_path) = &args.manifest {
        let ctx = manifest::load_manifest(manifest_path)?;
        if let Some(section) = ctx.manifest.models {
            models = section.names;
            source = section
                .source
                .map(|loc| manifest::resolve_location(&ctx.project_dir, &loc));
            chip = section.chip;
            manifest_output = section.output;
        }
        base_dir = ctx.project_dir;
    }

    models.extend(args.models);

    Ok(ModelPlan {
        models,
        source: args
            .source
            .or(source)
            .unwrap_or_else(|| DEFAULT_SHARE_LOCATION.to_string()),
        chip: args.chip.or(chip),
        output: output::resolve_output_path(
            args.output,
            manifest_output.as_deref(),
            &base_dir,
            output::DEFAULT_MODELS_OUTPUT,
        ),
    })
}

/// Drop duplicates and models the chip cannot run
fn select_models(models: &[String], chip: Option<&str>) -> Vec<String> {
    let mut selected: Vec<String> = Vec::with_capacity(models.len());
    for model in models {
        if selected.contains(model) {
            continue;
        }
        if let Some(chip) = chip {
            if !is_valid_model(model, chip) {
                let tier = WakeNetTier::for_chip(chip);
                tracing::warn!(
                    "Skipping {}: {} requires {} models ({}*)",
                    model,
                    chip,
                    tier.name(),
                    tier.prefix()
                );
                continue;
            }
        }
        selected.push(model.clone());
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(models: &[&str]) -> ModelsArgs {
        ModelsArgs {
            models: models.iter().map(|m| m.to_string()).collect(),
            source: None,
            chip: None,
            manifest: None,
            output: None,
        }
    }

    #[test]
    fn test_select_filters_by_chip() {
        let models = vec![
            "wn9_alexa".to_string(),
            "wn9s_alexa".to_string(),
            "wn9_alexa".to_string(),
        ];
        assert_eq!(
            select_models(&models, Some("esp32c3")),
            vec!["wn9s_alexa".to_string()]
        );
        assert_eq!(
            select_models(&models, Some("esp32s3")),
            vec!["wn9_alexa".to_string()]
        );
        assert_eq!(select_models(&models, None).len(), 2);
    }

    #[test]
    fn test_plan_defaults() {
        let plan = build_plan(args(&["wn9_hiesp"])).unwrap();
        assert_eq!(plan.models, vec!["wn9_hiesp".to_string()]);
        assert_eq!(plan.source, DEFAULT_SHARE_LOCATION);
        assert_eq!(plan.chip, None);
        assert_eq!(plan.output, PathBuf::from(".").join("srmodels.bin"));
    }

    #[test]
    fn test_plan_merges_manifest() {
        let dir = tempdir().unwrap();
        let manifest_path = dir.path().join("xzpack.toml");
        std::fs::write(
            &manifest_path,
            r#"
[models]
chip = "esp32c6"
source = "share"
output = "build/srmodels.bin"
names = ["wn9s_hilexin"]
"#,
        )
        .unwrap();

        let mut cli = args(&["wn9s_alexa"]);
        cli.manifest = Some(manifest_path);
        let plan = build_plan(cli).unwrap();

        assert_eq!(plan.models, vec!["wn9s_hilexin", "wn9s_alexa"]);
        assert_eq!(plan.chip.as_deref(), Some("esp32c6"));
        assert_eq!(
            PathBuf::from(&plan.source),
            dir.path().join("share")
        );
        assert_eq!(plan.output, dir.path().join("build/srmodels.bin"));
    }
}
