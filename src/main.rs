use std::path::PathBuf;
use std::process;

use clap::Parser;
use colored::*;
use env_logger::Builder;
use log::{debug, info, warn, LevelFilter};

use birdstat::{fetch_status_table, Client, Config, NameMap, ProtocolFilter, StatusOptions};

#[derive(Parser, Debug)]
#[clap(name = "birdstat", rename_all = "kebab-case")]
/// Show the status of bird protocols
pub struct Args {
    /// Use real protocol names instead of names from protocols.json
    #[clap(short, long)]
    pub real_protocol_names: bool,
    /// Only show BGP protocols
    #[clap(short, long)]
    pub bgp: bool,
    /// Show tags column
    #[clap(long)]
    pub tags: bool,
    /// Tags to filter by (repeatable)
    #[clap(short, long)]
    pub filter: Vec<String>,
    /// Path to config file
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// bird control socket. If not provided, will fall back to config file value
    #[clap(short, long)]
    pub socket: Option<PathBuf>,
    /// Show debug logs (additive for trace logs)
    #[clap(short, parse(from_occurrences))]
    pub verbose: u8,
}

async fn run(args: Args) -> birdstat::Result<()> {
    let (config, resolve_names) = match Config::load(args.config.as_deref()) {
        Ok(config) => (config, !args.real_protocol_names),
        Err(err) => {
            warn!("{}, falling back to defaults and real protocol names", err);
            (Config::default(), false)
        }
    };

    let socket = args.socket.unwrap_or_else(|| config.bird_socket.clone());
    debug!("Using bird socket {}", socket.display());
    let client = Client::for_unix_socket(&socket);

    let names = if resolve_names {
        NameMap::from_file(config.protocol_names_path())?
    } else {
        NameMap::default()
    };

    let options = StatusOptions {
        filter: ProtocolFilter {
            bgp_only: args.bgp,
            tags: args.filter,
        },
        show_tags: args.tags,
    };
    let table = fetch_status_table(&client, &names, &options).await?;
    table.print()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .filter(Some("birdstat"), level)
        .filter(None, LevelFilter::Warn)
        .init();
    info!("Logging at level {}", level);

    if let Err(err) = run(args).await {
        eprintln!("{}", err.to_string().red());
        process::exit(1);
    }
}
