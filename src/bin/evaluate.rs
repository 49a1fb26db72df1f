use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use kenslo::cache::CsvDir;
use kenslo::criteria::{parse_spins, Choice, Criteria, TimeSlot};
use kenslo::eval::{EvalError, Evaluator};
use kenslo::print::tabulate_summary;
use kenslo::profile::MachineCatalog;
use kenslo::summary::Evaluation;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// machine identifier, e.g. "hokuto"
    #[clap(short = 'm', long)]
    machine: String,

    /// directory holding the per-machine CSV tables
    #[clap(short = 'd', long, default_value = "data")]
    data: PathBuf,

    /// current spin count
    #[clap(short = 's', long)]
    spins: String,

    /// the session begins on the day's first spin
    #[clap(long)]
    morning: bool,

    /// missed-feature count condition, e.g. "2スルー" or "3スルー以上"
    #[clap(long)]
    through: Option<String>,

    /// feature-gap condition, e.g. "501～1,000G"
    #[clap(long)]
    at_gap: Option<String>,

    /// previous-win spin-count condition
    #[clap(long)]
    prev_game: Option<String>,

    /// previous-win coin condition, e.g. "1,001～2,000枚"
    #[clap(long)]
    prev_coin: Option<String>,

    /// previous coin-differential condition, e.g. "-2,001枚以下"
    #[clap(long)]
    prev_diff: Option<String>,

    /// previous streak condition, e.g. "1～3連"
    #[clap(long)]
    prev_renchan: Option<String>,

    /// previous feature classification, e.g. "上位"
    #[clap(long)]
    prev_type: Option<String>,

    /// machine-specific extra condition
    #[clap(long)]
    custom: Option<String>,

    /// JSON catalog overriding the built-in machines
    #[clap(long)]
    catalog: Option<PathBuf>,

    /// emit JSON instead of a table
    #[clap(long)]
    json: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if !self.data.is_dir() {
            bail!("data directory {} does not exist", self.data.display());
        }
        Ok(())
    }

    fn criteria(&self) -> Result<Criteria, EvalError> {
        let choice = |raw: &Option<String>| {
            raw.as_deref().map(Choice::from_option).unwrap_or_default()
        };
        Ok(Criteria {
            spins: parse_spins(&self.spins).map_err(EvalError::from)?,
            slot: if self.morning {
                TimeSlot::Morning
            } else {
                TimeSlot::Later
            },
            through: choice(&self.through),
            at_gap: choice(&self.at_gap),
            prev_game: choice(&self.prev_game),
            prev_coin: choice(&self.prev_coin),
            prev_diff: choice(&self.prev_diff),
            prev_renchan: choice(&self.prev_renchan),
            prev_type: choice(&self.prev_type),
            custom: choice(&self.custom),
        })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let catalog = match args.catalog.as_ref() {
        Some(path) => MachineCatalog::read_json_file(path)?,
        None => MachineCatalog::builtin(),
    };
    let criteria = args.criteria()?;
    let mut evaluator = Evaluator::new(catalog, CsvDir::new(&args.data));
    let evaluation = evaluator.evaluate(&args.machine, &criteria)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
        return Ok(());
    }
    match evaluation {
        Evaluation::Estimate(summary) => {
            let table = tabulate_summary(&summary);
            info!("\n{}", Console::default().render(&table));
        }
        Evaluation::Short { matched, required } => {
            info!("insufficient sample: {matched} matching records, {required} required");
        }
    }

    Ok(())
}
