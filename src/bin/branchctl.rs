//! Demonstration CLI for the branch core: create a scratch repository,
//! dump a revision to its text form, or parse one from stdin and
//! re-serialize it. Performs no repository I/O of its own — everything
//! lives in memory for the lifetime of the process.

use std::io::Read;

use branch_core::areas::repository::Repository;
use branch_core::areas::serialize::serialize_revision;
use branch_core::areas::parse::parse_revision;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "branchctl", about = "Inspect the element-addressed branch core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a fresh repository (one revision, empty root) and print it.
    NewRepo,
    /// Print the given revision's text form. Only revision 0 exists for a
    /// freshly created repository; this subcommand exists to exercise
    /// serialization against a real `Repository`, not to browse history.
    Show {
        #[arg(default_value_t = 0)]
        revision: i64,
    },
    /// Read a text-form revision from stdin and re-serialize it.
    Parse,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::NewRepo => {
            let mut repo = Repository::new(0, 0);
            let family = repo.family().clone();
            let root = repo.revision_mut(0)?;
            print!("{}", serialize_revision(&family, root));
        }
        Command::Show { revision } => {
            let mut repo = Repository::new(0, 0);
            let family = repo.family().clone();
            let root = repo.revision_mut(revision)?;
            print!("{}", serialize_revision(&family, root));
        }
        Command::Parse => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            let (family, mut root) = parse_revision(&input)?;
            print!("{}", serialize_revision(&family, &mut root));
        }
    }

    Ok(())
}
