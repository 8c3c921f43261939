use clap::{Parser, Subcommand};

pub const USAGE: &str = "Usage: rbak COMMAND
Valid commands: 'backup', 'checkout', 'latest', 'status', 'log', 'diff'";

#[derive(Parser)]
#[command(name = "rbak")]
#[command(about = "Numbered snapshots of the working directory")]
#[command(version)]
pub struct Cli {
    /// Show debug logging on stderr
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Snapshot the working directory
    Backup(BackupArgs),

    /// Restore a snapshot over the working directory
    Checkout(CheckoutArgs),

    /// Restore the most recent snapshot
    Latest,

    /// Show the snapshot currently checked out
    Status,

    /// Show all snapshots grouped by lineage
    Log(LogArgs),

    /// Compare a snapshot with another snapshot or a path
    Diff(DiffArgs),
}

#[derive(Parser)]
pub struct BackupArgs {
    /// Message to attach to the snapshot
    #[arg(short = 'm', long = "message")]
    pub message: Option<String>,
}

#[derive(Parser)]
pub struct CheckoutArgs {
    /// Snapshot number
    pub number: i64,
}

#[derive(Parser)]
pub struct LogArgs {
    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Snapshot number to compare from
    pub from: i64,

    /// Snapshot number or path to compare to (defaults to the working directory)
    pub to: Option<String>,
}
