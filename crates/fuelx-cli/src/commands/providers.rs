//! Providers command - list the supported invoice layouts.

use clap::Args;
use console::style;

use fuelx_core::{ProviderInfo, ProviderKind, supported_providers};

/// Arguments for the providers command.
#[derive(Args)]
pub struct ProvidersArgs {
    /// Show a single provider by code (e.g. "q8")
    code: Option<String>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ProvidersArgs) -> anyhow::Result<()> {
    let providers: Vec<&ProviderInfo> = match &args.code {
        Some(code) => {
            let kind = ProviderKind::from_code(code)
                .ok_or_else(|| anyhow::anyhow!("Unknown provider code: {}", code))?;
            supported_providers()
                .iter()
                .filter(|info| info.kind == kind)
                .collect()
        }
        None => supported_providers().iter().collect(),
    };

    if providers.is_empty() {
        anyhow::bail!("No invoice layout is known for {}", args.code.unwrap_or_default());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&providers)?);
        return Ok(());
    }

    println!("{}", style("Supported providers:").bold());
    for info in providers {
        println!("  {:<7} {}", style(info.code).cyan(), info.description);
        println!("          identified by: {}", info.identification);
    }

    Ok(())
}
