use std::env;
use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::info;

use kenslo::file;
use kenslo::print::tabulate_catalog;
use kenslo::profile::MachineCatalog;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// JSON catalog overriding the built-in machines
    #[clap(long)]
    catalog: Option<PathBuf>,

    /// write the effective catalog to a JSON file
    #[clap(long)]
    export: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let catalog = match args.catalog.as_ref() {
        Some(path) => MachineCatalog::read_json_file(path)?,
        None => MachineCatalog::builtin(),
    };

    let table = tabulate_catalog(&catalog);
    info!("\n{}", Console::default().render(&table));

    if let Some(path) = args.export.as_ref() {
        file::write_json(path, &catalog)?;
        info!("catalog written to {}", path.display());
    }

    Ok(())
}
