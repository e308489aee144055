use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use toolroute::utils::LoggingConfig;
use toolroute::{
    build_llm, build_router, DemoDriver, EnvConfig, RouteDecision, RouterConfig,
    ToolFactoryRegistry,
};

#[derive(Parser)]
#[command(name = "toolroute", version, about = "Route queries to tools or a language model", author)]
struct Cli {
    /// JSON config file (falls back to $TOOLROUTE_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Never call the live model, even when an API key is available
    #[arg(long, global = true)]
    mock: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the example queries (default)
    Demo,
    /// Route a single query and print the response
    Ask { query: String },
    /// List the configured tools in routing order
    Tools,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    EnvConfig::load_dotenv();
    LoggingConfig::init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    let mode = EnvConfig::demo_mode(&config.api_key, &config.api_key_env, cli.mock);
    let factories = ToolFactoryRegistry::with_builtins();

    match cli.command.unwrap_or(Command::Demo) {
        Command::Demo => {
            let llm = build_llm(&config, &mode)?;
            let router = build_router(&config, llm, &factories)?;
            let mut driver = DemoDriver::new(router, mode, io::stdout().lock());
            driver.run(config.demo_queries.as_slice()).await?;
        }
        Command::Ask { query } => {
            let llm = build_llm(&config, &mode)?;
            let router = build_router(&config, llm, &factories)?;
            let outcome = router.route(&query).await?;
            if let RouteDecision::Tool(name) = &outcome.decision {
                tracing::info!(tool = %name, "answered by tool");
            }
            println!("{}", outcome.response);
        }
        Command::Tools => {
            let tools = config.build_tools(&factories)?;
            println!("{:<12} {:<36} {}", "Name", "Description", "Keywords");
            for tool in tools.iter() {
                let manifest = tool.manifest();
                println!(
                    "{:<12} {:<36} {}",
                    manifest.name,
                    manifest.description,
                    manifest.keywords.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<RouterConfig> {
    let path = path.or_else(|| EnvConfig::get_env_optional("TOOLROUTE_CONFIG").map(PathBuf::from));
    let config = match path {
        Some(path) => RouterConfig::from_path(&path)?,
        None => RouterConfig::default(),
    };
    Ok(config)
}
