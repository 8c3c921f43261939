use clap::error::ErrorKind;
use clap::Parser;
use rbak::cli::{Cli, Command, USAGE};
use rbak::commands;
use rbak::config::Config;
use rbak::diff;
use rbak::error::Result;
use rbak::report;
use rbak::snapshot::SnapshotManager;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to initialize logging: {e}");
    }
}

fn run(command: Command) -> Result<()> {
    let root = std::env::current_dir().map_err(|e| rbak::error::Error::io(".", e))?;
    let config = Config::load(root)?;
    let mut manager = SnapshotManager::open(&config)?;

    match command {
        Command::Backup(args) => {
            commands::backup(&mut manager, args.message.as_deref())?;
        }
        Command::Checkout(args) => {
            commands::checkout(&manager, args.number)?;
        }
        Command::Latest => {
            commands::latest(&manager)?;
        }
        Command::Status => match commands::status(&manager)? {
            Some(number) => println!("{number}"),
            None => println!("none"),
        },
        Command::Log(args) => {
            let groups = commands::log(&manager)?;
            report::print(&groups, args.json);

            for err in groups.iter().filter_map(|g| g.broken_lineage()) {
                eprintln!("warning: {err}");
            }
        }
        Command::Diff(args) => {
            let differ = diff::from_config(&config);
            let output = commands::diff(&manager, differ.as_ref(), args.from, args.to.as_deref())?;
            print!("{output}");
        }
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::InvalidSubcommand => {
            println!("{USAGE}");
            return;
        }
        Err(e) => e.exit(),
    };
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        println!("{USAGE}");
        return;
    };

    if let Err(e) = run(command) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
