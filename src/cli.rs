//! Command-line front end, gated behind the `cli` feature so library
//! consumers don't pull in `clap`/`env_logger` for nothing.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fs_compile::market::{GemMarketItem, MarketItem};
use fs_compile::{CompileOptions, DiagnosticBag, MarketSnapshot};

#[derive(Parser)]
#[command(name = "filter_spirit")]
#[command(about = "Compiles the Filter Spirit DSL into native Path of Exile item filters", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a spirit filter into a native filter
    Compile {
        /// Path to the `.filter` source
        input: PathBuf,
        /// Where to write the resulting native filter
        #[arg(long, short)]
        output: PathBuf,
        /// Path to a market snapshot JSON file, used for `Autogenerate`
        #[arg(long)]
        market: Option<PathBuf>,
        /// Strip actions the Ruthless game mode forbids, warning instead of failing
        #[arg(long)]
        ruthless: bool,
    },
    /// Parse and compile a spirit filter, reporting diagnostics without writing output
    Check {
        input: PathBuf,
        #[arg(long)]
        market: Option<PathBuf>,
    },
}

pub fn run_cli() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { input, output, market, ruthless } => cmd_compile(&input, &output, market.as_deref(), ruthless),
        Commands::Check { input, market } => cmd_check(&input, market.as_deref()),
    }
}

fn cmd_compile(input: &PathBuf, output: &PathBuf, market_path: Option<&std::path::Path>, ruthless: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(input)?;
    let market = match market_path {
        Some(path) => load_market_snapshot(path)?,
        None => MarketSnapshot::new(),
    };
    let options = CompileOptions { ruthless_mode: ruthless };

    let (filter, diagnostics) = crate::compile(&source, &options, &market)?;
    report_diagnostics(&diagnostics);

    if diagnostics.has_errors() {
        return Err("compilation failed, see diagnostics above".into());
    }

    let text = fs_engine::serialize(&filter, None);
    fs::write(output, text)?;
    log::info!("wrote {} blocks to {}", filter.len(), output.display());
    Ok(())
}

fn cmd_check(input: &PathBuf, market_path: Option<&std::path::Path>) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(input)?;
    let market = match market_path {
        Some(path) => load_market_snapshot(path)?,
        None => MarketSnapshot::new(),
    };

    let (filter, diagnostics) = crate::compile(&source, &CompileOptions::default(), &market)?;
    report_diagnostics(&diagnostics);

    if diagnostics.has_errors() {
        return Err("compilation failed, see diagnostics above".into());
    }

    println!("ok: {} blocks", filter.len());
    Ok(())
}

fn report_diagnostics(diagnostics: &DiagnosticBag) {
    for diagnostic in diagnostics.iter() {
        eprintln!("{diagnostic}");
        for (note, origin) in &diagnostic.notes {
            eprintln!("  note: {note} ({}..{})", origin.start, origin.end);
        }
    }
}

/// Reads a hand-shaped market snapshot JSON file. Kept as a plain
/// `serde_json::Value` walk rather than a derived `Deserialize` impl, since
/// `fs_compile`'s market types don't carry serde derives.
fn load_market_snapshot(path: &std::path::Path) -> Result<MarketSnapshot, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let root: serde_json::Value = serde_json::from_str(&text)?;
    let mut snapshot = MarketSnapshot::new();

    let category_field = |field: &str| -> Vec<MarketItem> {
        root.get(field)
            .and_then(|v| v.as_array())
            .map(|items| items.iter().filter_map(parse_market_item).collect())
            .unwrap_or_default()
    };

    snapshot.currency = category_field("currency");
    snapshot.delirium_orbs = category_field("delirium_orbs");
    snapshot.essences = category_field("essences");
    snapshot.fossils = category_field("fossils");
    snapshot.oils = category_field("oils");
    snapshot.vials = category_field("vials");
    snapshot.fragments = category_field("fragments");
    snapshot.resonators = category_field("resonators");
    snapshot.scarabs = category_field("scarabs");
    snapshot.tattoos = category_field("tattoos");
    snapshot.incubators = category_field("incubators");
    snapshot.divination_cards = category_field("divination_cards");

    if let Some(gems) = root.get("gems").and_then(|v| v.as_array()) {
        snapshot.gems = gems.iter().filter_map(parse_gem_market_item).collect();
    }

    if let Some(stack_sizes) = root.get("max_stack_sizes").and_then(|v| v.as_object()) {
        for (name, size) in stack_sizes {
            if let Some(size) = size.as_i64() {
                snapshot.set_max_stack_size(name.clone(), size as i32);
            }
        }
    }

    Ok(snapshot)
}

fn parse_market_item(value: &serde_json::Value) -> Option<MarketItem> {
    let name = value.get("name")?.as_str()?;
    let price = value.get("price_chaos")?.as_f64()?;
    let mut item = MarketItem::new(name, price);
    item.is_low_confidence = value.get("is_low_confidence").and_then(|v| v.as_bool()).unwrap_or(false);
    Some(item)
}

fn parse_gem_market_item(value: &serde_json::Value) -> Option<GemMarketItem> {
    Some(GemMarketItem {
        name: value.get("name")?.as_str()?.to_string(),
        level: value.get("level")?.as_i64()? as i32,
        quality: value.get("quality")?.as_i64()? as i32,
        corrupted: value.get("corrupted").and_then(|v| v.as_bool()).unwrap_or(false),
        price_chaos: value.get("price_chaos")?.as_f64()?,
        is_low_confidence: value.get("is_low_confidence").and_then(|v| v.as_bool()).unwrap_or(false),
    })
}
