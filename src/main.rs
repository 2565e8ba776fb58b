use butch_rename::prelude::*;
use clap::{ArgAction, Parser};
use dialoguer::Confirm;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const PROGRAM: &str = "butch-rename";
const LOG_ENV: &str = "BUTCH_RENAME_LOG";

const EXAMPLES: &str = "\
Examples:
  butch-rename /path/to/folder _old _backup
      Remove \"_old\" and \"_backup\" from all names

  butch-rename --dry-run /path/to/folder _test
      Preview changes without renaming

  butch-rename --ext txt,pdf /path/to/folder _draft
      Only rename .txt and .pdf files (directories are always considered)

  butch-rename /path/to/folder -- -copy
      Use -- before substrings that start with '-'

Set BUTCH_RENAME_LOG (e.g. BUTCH_RENAME_LOG=debug) to control diagnostics.";

/// Batch rename files and folders by removing substrings from their names.
#[derive(Parser, Debug)]
#[command(name = PROGRAM, version, after_help = EXAMPLES)]
struct Cli {
    /// Root directory to rename files and folders in
    directory: PathBuf,

    /// Substrings to remove, applied in the given order
    #[arg(required = true)]
    substrings: Vec<String>,

    /// Preview changes without renaming anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show the planned renames and ask before applying them
    #[arg(short, long)]
    interactive: bool,

    /// Match substrings regardless of ASCII letter case
    #[arg(long)]
    ignore_case: bool,

    /// Only rename files with these extensions (comma separated or repeated)
    #[arg(long, value_name = "EXT", value_delimiter = ',')]
    ext: Vec<String>,

    /// Allow running on system directories and the home directory itself
    #[arg(long)]
    allow_protected: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_header(root: &Path, options: &RenameOptions) {
    let substrings = options
        .substrings
        .iter()
        .map(|s| format!("'{s}'"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Directory: {}", sanitize_user_path(root));
    println!("Removing: {substrings}");
    if !options.extensions.is_empty() {
        println!("Extensions: {}", options.extensions.join(", "));
    }
    if options.dry_run {
        println!("Mode: dry run (nothing will be renamed)");
    }
}

fn confirm(plan: &RenamePlan) -> bool {
    for operation in &plan.operations {
        println!("  {operation}");
    }
    let directories = plan.count(EntryKind::Directory);
    println!("Directories to rename: {directories}");
    println!("Files to rename: {}", plan.operations.len() - directories);

    // Without a terminal there is nobody to answer, which counts as "no".
    Confirm::new()
        .with_prompt("Proceed with renaming?")
        .default(false)
        .interact()
        .unwrap_or(false)
}

fn print_summary(report: &RenameReport, planning_problems: usize) {
    println!("Directories renamed: {}", report.renamed_directories());
    println!("Files renamed: {}", report.renamed_files());
    let problems = planning_problems + report.problems();
    if problems > 0 {
        println!("Skipped or failed: {problems}");
    }
}

fn run(cli: Cli) -> ExitStatusLike {
    let options = match RenameOptions::new(cli.substrings) {
        Ok(options) => options
            .dry_run(cli.dry_run)
            .ignore_case(cli.ignore_case)
            .extensions(&cli.ext)
            .allow_protected(cli.allow_protected),
        Err(err) => {
            eprintln!("{PROGRAM}: {err}");
            return ExitStatusLike::Error;
        }
    };

    let renamer = Renamer::new(options);
    if let Err(err) = renamer.validate_root(&cli.directory) {
        eprintln!("{PROGRAM}: {err}");
        return ExitStatusLike::Error;
    }

    print_header(&cli.directory, renamer.options());
    let plan = renamer.plan(&cli.directory);
    for skipped in &plan.skipped {
        println!("skipped {skipped}");
    }

    if cli.dry_run {
        for operation in &plan.operations {
            println!("would rename {operation}");
        }
        let directories = plan.count(EntryKind::Directory);
        println!(
            "Would rename {} files and {} directories",
            plan.operations.len() - directories,
            directories
        );
        return ExitStatusLike::Ok;
    }

    if plan.is_empty() {
        println!("Nothing to rename.");
        return ExitStatusLike::Ok;
    }

    if cli.interactive && !confirm(&plan) {
        println!("Operation cancelled.");
        return ExitStatusLike::Ok;
    }

    let report = renamer.execute(&plan, |event| println!("{event}"));
    print_summary(&report, plan.skipped.len());
    ExitStatusLike::Ok
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    std::process::exit(i32::from(run(cli).as_code()));
}
