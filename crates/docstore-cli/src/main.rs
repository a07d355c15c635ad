//! docstore CLI
//!
//! Command-line access to a resource table in a SQLite database

use clap::{Parser, Subcommand, ValueEnum};
use docstore_core::logging_facility::{init, Profile};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "docstore")]
#[command(about = "docstore - JSON resources in a SQLite table", long_about = None)]
struct Cli {
    /// Path to the SQLite database file
    #[arg(long, global = true, env = "DOCSTORE_DB", default_value = ".docstore/store.db")]
    db: PathBuf,

    /// Table holding the resources
    #[arg(long, global = true, env = "DOCSTORE_TABLE", default_value = docstore_store::schema::DEFAULT_TABLE)]
    table: String,

    /// Emit logs to stderr in the given format
    #[arg(long, global = true, env = "DOCSTORE_LOG", value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the resource table if it does not exist
    Init,
    /// Create a resource from a JSON object
    Create(commands::resource::CreateArgs),
    /// Print one resource
    Fetch(commands::resource::IdArgs),
    /// Print resources in creation order
    List(commands::resource::ListArgs),
    /// Merge a JSON object into a resource
    Patch(commands::resource::WriteArgs),
    /// Replace a resource with a JSON object
    Update(commands::resource::WriteArgs),
    /// Delete a resource
    Delete(commands::resource::IdArgs),
    /// Print the number of resources
    Count,
}

fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        Some(LogFormat::Pretty) => init(Profile::Development),
        Some(LogFormat::Json) => init(Profile::Production),
        None => {}
    }

    let target = commands::Target {
        db: cli.db,
        table: cli.table,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(&target),
        Commands::Create(args) => commands::resource::create(&target, args),
        Commands::Fetch(args) => commands::resource::fetch(&target, args),
        Commands::List(args) => commands::resource::list(&target, args),
        Commands::Patch(args) => commands::resource::patch(&target, args),
        Commands::Update(args) => commands::resource::update(&target, args),
        Commands::Delete(args) => commands::resource::delete(&target, args),
        Commands::Count => commands::resource::count(&target),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
