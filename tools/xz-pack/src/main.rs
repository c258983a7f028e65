//! xz-pack - Build tool for xiaozhi firmware partitions
//!
//! # Commands
//!
//! - `xz-pack assets` - Pack files into an `assets.bin` SPIFFS image
//! - `xz-pack models` - Pack WakeNet models into `srmodels.bin`
//! - `xz-pack list-models` - List known WakeNet models
//! - `xz-pack check` - Verify name/integer packing against the firmware layout
//!
//! # Usage
//!
//! ```bash
//! # Pack a directory of fonts, emoji and config into assets.bin
//! xz-pack assets assets/ -o build/assets.bin
//!
//! # Pack a wake word for an ESP32-S3 board
//! xz-pack models --chip esp32s3 --model wn9_nihaoxiaozhi_tts
//!
//! # Or drive both from a manifest
//! xz-pack assets --manifest xzpack.toml
//! xz-pack models --manifest xzpack.toml
//! ```
//!
//! # Manifest (xzpack.toml)
//!
//! ```toml
//! [assets]
//! output = "build/assets.bin"
//!
//! [[assets.files]]
//! path = "fonts/font_puhui_14_1.bin"
//!
//! [[assets.files]]
//! path = "emoji/happy.png"
//! name = "happy.png"
//!
//! [models]
//! chip = "esp32s3"
//! source = "static/wakenet_model"
//! names = ["wn9_nihaoxiaozhi_tts"]
//! ```

mod assets;
mod check;
mod list;
mod manifest;
mod models;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// xz-pack - Build tool for xiaozhi firmware partitions
#[derive(Parser)]
#[command(name = "xz-pack")]
#[command(about = "Build assets.bin and srmodels.bin for xiaozhi firmware")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pack files into an assets.bin image
    Assets(assets::AssetsArgs),

    /// Pack WakeNet models into srmodels.bin
    Models(models::ModelsArgs),

    /// List known WakeNet models
    ListModels(list::ListModelsArgs),

    /// Verify packing against the firmware layout
    Check,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assets(args) => assets::execute(args),
        Commands::Models(args) => models::execute(args),
        Commands::ListModels(args) => {
            list::execute(args);
            Ok(())
        }
        Commands::Check => check::execute(),
    }
}
