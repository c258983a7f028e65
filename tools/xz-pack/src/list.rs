//! `xz-pack list-models`

use clap::Args;

use assets_common::{ModelCatalog, WakeNetTier};

/// Arguments for the list-models command
#[derive(Args)]
pub struct ListModelsArgs {
    /// Only list models this chip can run
    #[arg(short, long)]
    pub chip: Option<String>,
}

pub fn execute(args: ListModelsArgs) {
    let catalog = ModelCatalog::available();
    let only = args.chip.as_deref().map(WakeNetTier::for_chip);

    for (tier, models) in catalog.tiers() {
        if only.is_some_and(|t| t != tier) {
            continue;
        }
        println!("{} ({} models):", tier.name(), models.len());
        for model in models {
            println!("  {}", model);
        }
    }
}
