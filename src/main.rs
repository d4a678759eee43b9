//! `split-swap`: deploy an engine from configuration and run one call
//! against it.

use std::path::PathBuf;
use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::Context;
use clap::{Parser, Subcommand};
use split_swap::config::EngineConfig;
use split_swap::deploy::{deploy, Deployment};
use split_swap::domain::{Amount, Asset, BasisPoints, CallContext, PoolRef, SwapBranch, VenueKind};
use split_swap::logging::setup_logging;

#[derive(Parser, Debug)]
#[command(author, version, about = "Split-and-route swap engine")]
struct Cli {
    /// Path to the TOML configuration (default: ./split-swap.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bare level or full filter directive list
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a deposit across target assets
    Swap {
        /// Calling account
        #[arg(long)]
        caller: Address,

        /// Deposit in base units of the deposit asset
        #[arg(long)]
        deposit: Amount,

        /// `<asset>:<weight_bps>[:<venue>[:<pool>]]`, repeatable
        #[arg(long = "target", required = true)]
        targets: Vec<TargetArg>,

        /// Upgrade to the mixed-venue implementation first
        #[arg(long, default_value_t = false)]
        upgrade: bool,

        /// Print the receipt as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Quote a trade from the deposit asset on one venue
    Quote {
        /// Venue to ask
        #[arg(long)]
        venue: VenueKind,

        /// Asset to buy
        #[arg(long)]
        output: Asset,

        /// Amount of the deposit asset to sell
        #[arg(long)]
        amount: Amount,
    },
}

/// One `--target` argument.
#[derive(Debug, Clone, Copy)]
struct TargetArg {
    asset: Asset,
    weight: BasisPoints,
    venue: Option<VenueKind>,
    pool: Option<PoolRef>,
}

impl FromStr for TargetArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let asset = parts
            .next()
            .ok_or("missing asset")?
            .parse::<Asset>()
            .map_err(|e| format!("bad asset: {e}"))?;
        let weight = parts
            .next()
            .ok_or("missing weight")?
            .parse::<u32>()
            .map(BasisPoints::new)
            .map_err(|e| format!("bad weight: {e}"))?;
        let venue = parts.next().map(VenueKind::from_str).transpose()?;
        let pool = parts
            .next()
            .map(|p| p.parse::<PoolRef>().map_err(|e| format!("bad pool: {e}")))
            .transpose()?;
        if parts.next().is_some() {
            return Err(format!("too many fields in `{s}`"));
        }
        Ok(Self {
            asset,
            weight,
            venue,
            pool,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level, cli.json_logs);

    let config = EngineConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let mut deployment = deploy(&config).context("deploying engine")?;

    match cli.command {
        Command::Swap {
            caller,
            deposit,
            targets,
            upgrade,
            json,
        } => {
            if upgrade {
                deployment
                    .upgrade_to_v2(config.admin)
                    .context("upgrading to the mixed-venue implementation")?;
            }
            let ctx = CallContext::new(caller, deposit);
            let receipt = if targets.iter().all(|t| t.venue.is_none() && t.pool.is_none()) {
                let assets: Vec<Asset> = targets.iter().map(|t| t.asset).collect();
                let weights: Vec<BasisPoints> = targets.iter().map(|t| t.weight).collect();
                deployment.swap(ctx, &assets, &weights)?
            } else {
                let branches = explicit_branches(&deployment, config.deposit_asset, &targets)?;
                deployment.swap_multiple(ctx, &branches)?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&receipt)?);
            } else {
                print!("{receipt}");
            }
        }
        Command::Quote {
            venue,
            output,
            amount,
        } => {
            let out = deployment.quote(venue, config.deposit_asset, output, amount)?;
            println!("{amount} {} -> {out} {output} via {venue}", config.deposit_asset);
        }
    }
    Ok(())
}

/// Resolves each target into a branch, filling in the venue's canonical
/// pool where none was given.
fn explicit_branches(
    deployment: &Deployment,
    deposit_asset: Asset,
    targets: &[TargetArg],
) -> anyhow::Result<Vec<SwapBranch>> {
    let default_venue = deployment
        .venues()
        .kinds()
        .next()
        .context("no venues deployed")?;
    targets
        .iter()
        .map(|t| {
            let venue = t.venue.unwrap_or(default_venue);
            let pool = match t.pool {
                Some(pool) => pool,
                None => deployment.canonical_pool(venue, deposit_asset, t.asset)?,
            };
            Ok(SwapBranch::new(t.asset, pool, t.weight, venue))
        })
        .collect()
}
