use std::path::PathBuf;
use std::process::ExitCode;

use structopt::StructOpt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod annotate;
mod delta;
mod error;
mod inset;
mod plot;
mod slack;
mod slack_data;
mod table;

use crate::slack::RunSet;
use crate::slack_data::{PROJECT_TITLE, RUNS, TNS_NS, WNS_NS};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "slack-chart",
    about = "Plot WNS/TNS stability across timing runs"
)]
struct Opt {
    /// Chart file to write, .svg or .png
    #[structopt(short, long, parse(from_os_str), default_value = "slack-stability.svg")]
    output: PathBuf,

    /// Figure width in pixels
    #[structopt(long, default_value = "800")]
    width: u32,

    /// Figure height in pixels
    #[structopt(long, default_value = "600")]
    height: u32,

    /// Also write the per-point annotations as CSV
    #[structopt(long, parse(from_os_str))]
    table: Option<PathBuf>,

    /// Write the chart without opening it in the system viewer
    #[structopt(long)]
    no_show: bool,

    /// -v for debug, -vv for trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(opt: &Opt) -> error::Result<()> {
    let set = RunSet::new(&RUNS, &WNS_NS, &TNS_NS)?;
    info!(runs = set.len(), "loaded run set");

    let annotations = annotate::annotate(&set)?;

    plot::write_plot(
        &set,
        &annotations,
        PROJECT_TITLE,
        &opt.output,
        (opt.width, opt.height),
    )?;

    if let Some(path) = &opt.table {
        table::write_table_file(path, &annotations)?;
    }

    if !opt.no_show {
        plot::show_plot(&opt.output)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let opt = Opt::from_args();
    init_logging(opt.verbose);

    match run(&opt) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
