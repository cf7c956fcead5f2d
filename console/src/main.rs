mod query;
mod strings;
mod utils;

use clap::{Parser, Subcommand};
use query::{BundleArgs, DetailsArgs, LinesArgs, SummaryArgs};
use utils::UtilsArgs;
use wild::ArgsOs;

pub(crate) trait PipelineCommand {
    fn run(&self) -> anyhow::Result<()>;
}

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Eligible insertion lines inside the coding sequence of a gene.
    Lines {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  LinesArgs,
    },

    /// Every matching insertion with its position, as TSV.
    Details {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  DetailsArgs,
    },

    /// Gene, features and insertions of a gene as JSON.
    Bundle {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  BundleArgs,
    },

    /// Row counts of the loaded tables.
    Summary {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  SummaryArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Lines { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Details { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Bundle { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
        MainMenu::Summary { utils, args } => {
            utils.setup()?;
            args.run()?;
        },
    }
    Ok(())
}
