mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use content_forge::{
    format_number, format_percent, ContentEngine, ContentRequest, ContentStyle, EngineConfig,
    GenerationOutcome, MemoryCache, Platform, ProviderClient,
};

#[derive(Parser)]
#[command(name = "content-forge", about = "Cost-optimized social content generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Generate(GenerateArgs),
    Batch(BatchArgs),
    Serve(ServeArgs),
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    #[arg(long)]
    topic: Option<String>,
    #[arg(long, default_value = "tiktok")]
    platform: String,
    #[arg(long, default_value = "viral")]
    style: String,
    #[arg(long)]
    no_cache: bool,
    #[arg(long)]
    no_ai: bool,
    #[arg(long)]
    compress: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug, Clone)]
struct BatchArgs {
    #[arg(long)]
    topic: Option<String>,
    #[arg(long, default_value = "tiktok,instagram,twitter")]
    platforms: String,
    #[arg(long, default_value = "viral")]
    style: String,
    #[arg(long)]
    no_cache: bool,
    #[arg(long)]
    no_ai: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long, default_value = "../webapp/dist")]
    web_root: String,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/engine.toml")]
    path: PathBuf,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Batch(args) => run_batch(args).await,
        Command::Serve(args) => {
            let engine = build_engine(args.config.clone(), None, false)?;
            server::serve(args, engine).await
        }
        Command::InitConfig(args) => {
            EngineConfig::default().write(&args.path)?;
            println!("Wrote default config to {}", args.path.display());
            Ok(())
        }
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let platform = Platform::from_str(&args.platform)
        .ok_or_else(|| format!("invalid platform: {}", args.platform))?;
    let style = parse_style(&args.style);
    let topic = read_topic(args.topic)?;

    let engine = build_engine(args.config, args.seed, args.no_ai)?;
    let mut flags = engine.config().optimization.to_flags();
    if args.no_cache {
        flags.use_cache = false;
    }
    if args.compress {
        flags.response_compression = true;
    }
    let deadline = args.timeout_ms.map(Duration::from_millis);

    let request = ContentRequest::new(topic, platform, style);
    let outcome = engine
        .generate_with_deadline(&request, &flags, deadline)
        .await;
    print_outcome(&outcome, args.details);
    Ok(())
}

async fn run_batch(args: BatchArgs) -> Result<(), String> {
    let platforms = parse_platforms(&args.platforms)?;
    let style = parse_style(&args.style);
    let topic = read_topic(args.topic)?;

    let engine = build_engine(args.config, args.seed, args.no_ai)?;
    let mut flags = engine.config().optimization.to_flags();
    if args.no_cache {
        flags.use_cache = false;
    }
    let deadline = args.timeout_ms.map(Duration::from_millis);

    let outcomes = engine
        .generate_batch_with_deadline(&topic, &platforms, style, &flags, deadline)
        .await;

    for outcome in &outcomes {
        println!("=== {} ===", outcome.platform.label());
        print_outcome(outcome, args.details);
        println!();
    }
    Ok(())
}

fn build_engine(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    no_ai: bool,
) -> Result<ContentEngine, String> {
    let (config, _) = EngineConfig::load(config_path)?;
    let cache = Arc::new(MemoryCache::new(config.cache.ttl()));
    let provider = if no_ai {
        None
    } else {
        ProviderClient::from_config(&config.provider)
    };

    Ok(match seed {
        Some(seed) => ContentEngine::with_seed(config, cache, provider, seed),
        None => ContentEngine::new(config, cache, provider),
    })
}

fn print_outcome(outcome: &GenerationOutcome, details: bool) {
    println!("Title: {}", outcome.content.title);
    println!(
        "Source: {}{} | confidence {}",
        outcome.cost.source.label(),
        if outcome.cost.cache_hit { " (cached)" } else { "" },
        format_percent(outcome.cost.confidence)
    );
    println!("Industry: {}", outcome.industry.label());
    println!(
        "Estimated views: {} | quality {}/100 | viral potential {:.1}/10",
        format_number(outcome.content.estimated_views as f64),
        outcome.content.quality_score,
        outcome.content.viral_potential
    );
    println!("Hashtags: {}", outcome.content.hashtags.join(" "));

    if details {
        println!("\n{}", outcome.content.content);
    }

    if !outcome.warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &outcome.warnings {
            println!("- {}", warning);
        }
    }
}

fn parse_style(raw: &str) -> ContentStyle {
    ContentStyle::from_str(raw).unwrap_or(ContentStyle::Viral)
}

fn parse_platforms(raw: &str) -> Result<Vec<Platform>, String> {
    let mut platforms = Vec::new();
    for value in raw.split(',') {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        let platform =
            Platform::from_str(trimmed).ok_or_else(|| format!("invalid platform: {}", trimmed))?;
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    if platforms.is_empty() {
        return Err("no platforms given".to_string());
    }
    Ok(platforms)
}

fn read_topic(arg: Option<String>) -> Result<String, String> {
    if let Some(topic) = arg {
        if !topic.trim().is_empty() {
            return Ok(topic.trim().to_string());
        }
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Err("missing topic: pass --topic or pipe stdin".to_string());
    }
    Ok(trimmed.to_string())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
