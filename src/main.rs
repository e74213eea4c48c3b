use clap::{Parser, Subcommand};
use kritik::core::catalog::Catalog;
use kritik::core::config::{self, CliOverrides, ResolvedConfig};
use kritik::core::content::{ContentStore, Language};
use kritik::diagram::RendererKind;
use kritik::preview::PreviewServer;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kritik", about = "Interactive trilingual reader for Kant's Critique")]
struct Args {
    /// Reading language: en, de or zh
    #[arg(short, long)]
    language: Option<Language>,

    /// Diagram renderer
    #[arg(short, long, value_enum)]
    renderer: Option<RendererKind>,

    /// Load the work from a JSON file instead of the built-in text
    #[arg(long, value_name = "PATH")]
    content: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve social preview cards over HTTP
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn init_logging(to_terminal: bool) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    // The TUI owns the terminal, so only `serve` logs there
    if to_terminal {
        loggers.push(TermLogger::new(
            LevelFilter::Info,
            log_config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    // File logger - writes to kritik.log in current directory
    if let Ok(log_file) = File::create("kritik.log") {
        loggers.push(WriteLogger::new(LevelFilter::Debug, log_config, log_file));
    }
    let _ = CombinedLogger::init(loggers);
}

fn load_store(config: &ResolvedConfig) -> std::io::Result<ContentStore> {
    let store = match &config.content_path {
        Some(path) => ContentStore::load(path),
        None => ContentStore::embedded(),
    };
    store.map_err(|e| std::io::Error::other(format!("failed to load content: {e}")))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (preview_port, preview_bind) = match &args.command {
        Some(Command::Serve { port, bind }) => (*port, bind.clone()),
        None => (None, None),
    };
    init_logging(args.command.is_some());

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        Default::default()
    });
    let cli = CliOverrides {
        language: args.language,
        renderer: args.renderer,
        content_path: args.content,
        preview_bind,
        preview_port,
    };
    let config = config::resolve(&file_config, &cli);
    log::info!("Kritik starting up: {:?}", config);

    match args.command {
        Some(Command::Serve { .. }) => {
            let addr = format!("{}:{}", config.preview_bind, config.preview_port);
            PreviewServer::bind(&addr, config.site_label.clone())?.serve();
            Ok(())
        }
        None => {
            let store = Arc::new(load_store(&config)?);
            let catalog = Catalog::embedded().unwrap_or_else(|e| {
                log::warn!("Library catalog unavailable: {}", e);
                Catalog::default()
            });
            kritik::tui::run(config, store, catalog)
        }
    }
}
