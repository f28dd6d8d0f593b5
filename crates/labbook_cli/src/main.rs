//! Command-line front end for the lab book.
//!
//! # Responsibility
//! - Act as the composition root: resolve config, start logging, own the
//!   single `StoreProvider`.
//! - Render the subject list and subject detail views as plain text.

use clap::{Parser, Subcommand};
use labbook_core::{
    core_version, init_logging, AppConfig, LabStatus, LabStore, StoreError, StoreProvider,
    SubjectId, SubjectOverview,
};
use log::info;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "labbook")]
#[command(about = "Browse subjects and their lab assignments")]
#[command(long_about = r#"
Browse subjects and their lab assignments stored in a local SQLite file.
The store is created and seeded on first use.

Environment:
  LABBOOK_DATA_DIR   directory holding lab4_database.sqlite3
  LABBOOK_LOG_LEVEL  trace|debug|info|warn|error
  LABBOOK_LOG_DIR    absolute directory for rolling log files
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every subject in id order
    Subjects,
    /// Show one subject with its labs and progress
    Labs {
        /// Id of the subject to show
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        subject_id: SubjectId,
    },
    /// Print the core library version
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("labbook: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), String> {
    if let Command::Version = command {
        println!("labbook_core version={}", core_version());
        return Ok(());
    }

    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("labbook: logging disabled: {err}");
    }

    let provider = StoreProvider::new();
    let store = provider
        .get_store(&config.store_location())
        .map_err(describe)?;

    match command {
        Command::Subjects => print_subjects(&store),
        Command::Labs { subject_id } => print_labs(&store, subject_id),
        Command::Version => Ok(()),
    }
}

fn print_subjects(store: &LabStore) -> Result<(), String> {
    let subjects = store.list_all_subjects().map_err(describe)?;
    println!("Subjects");
    if subjects.is_empty() {
        println!("  (no subjects)");
    }
    for subject in subjects {
        println!("  [{}] {}", subject.id, subject.title);
    }
    Ok(())
}

fn print_labs(store: &LabStore, subject_id: SubjectId) -> Result<(), String> {
    match store.subject_overview(subject_id).map_err(describe)? {
        Some(overview) => print_overview(&overview),
        None => {
            info!("event=cli_labs module=cli status=empty subject_id={subject_id}");
            println!("Subject {subject_id}");
            println!("  (no such subject, no labs)");
        }
    }
    Ok(())
}

fn print_overview(overview: &SubjectOverview) {
    println!("{}", overview.subject.title);
    if overview.labs.is_empty() {
        println!("  (no labs)");
    }
    for lab in &overview.labs {
        println!("  [{}] {} ({})", status_mark(lab.status), lab.title, lab.status.label());
        println!("      {}", lab.description);
        if !lab.comment.is_empty() {
            println!("      note: {}", lab.comment);
        }
    }
    println!(
        "completed {}/{}, in progress {}",
        overview.completed,
        overview.labs.len(),
        overview.in_progress
    );
}

fn status_mark(status: LabStatus) -> char {
    match status {
        LabStatus::NotStarted => ' ',
        LabStatus::InProgress => '~',
        LabStatus::Completed => 'x',
    }
}

fn describe(err: StoreError) -> String {
    format!("{err} ({})", err.code())
}

#[cfg(test)]
mod tests {
    use super::{print_labs, Cli, Command};
    use clap::error::ErrorKind;
    use clap::{CommandFactory, Parser};
    use labbook_core::{LabStore, StoreLocation};

    #[test]
    fn parses_known_subcommands() {
        let cli = Cli::try_parse_from(["labbook", "subjects"]).expect("subjects should parse");
        assert!(matches!(cli.command, Command::Subjects));

        let cli = Cli::try_parse_from(["labbook", "labs", "3"]).expect("labs 3 should parse");
        assert!(matches!(cli.command, Command::Labs { subject_id: 3 }));

        let cli = Cli::try_parse_from(["labbook", "version"]).expect("version should parse");
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn rejects_bad_input_with_specific_errors() {
        let err = Cli::try_parse_from(["labbook"]).err().expect("missing subcommand must fail");
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ));

        let err = Cli::try_parse_from(["labbook", "labs", "three"])
            .err()
            .expect("non-numeric id must fail");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["labbook", "labs", "0"])
            .err()
            .expect("zero id must fail");
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = Cli::try_parse_from(["labbook", "subjects", "extra"])
            .err()
            .expect("extra argument must fail");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn help_is_available() {
        let err = Cli::try_parse_from(["labbook", "--help"])
            .err()
            .expect("--help short-circuits parsing");
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        Cli::command().debug_assert();
    }

    #[test]
    fn unknown_subject_renders_empty_state_instead_of_failing() {
        let store = LabStore::open(&StoreLocation::InMemory).expect("in-memory store should open");
        print_labs(&store, 99).expect("unknown subject should render an empty state");
        print_labs(&store, 1).expect("seeded subject should render");
    }
}
