//! Command dispatch logic for mnemo
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::{Cli, Commands, RuleCommands};
use crate::commands;
use mnemo_core::archive::paths::DEFAULT_DATA_DIR;
use mnemo_core::archive::Archive;
use mnemo_core::error::Result;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    // Determine the root directory
    let root = cli
        .root
        .clone()
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if cli.verbose {
        eprintln!("resolve_root: {:?}", start.elapsed());
    }

    // Handle commands
    match &cli.command {
        None => handle_no_command(),

        Some(Commands::Init) => commands::init::execute(cli, &root),

        Some(Commands::Add {
            project,
            section,
            title,
            content,
            file,
        }) => {
            let archive = open_archive(cli, &root, start)?;
            commands::add::execute(
                cli,
                &archive,
                project,
                section,
                title,
                content.as_deref(),
                file.as_deref(),
            )
        }

        Some(Commands::Search {
            query,
            project,
            limit,
        }) => {
            let archive = open_archive(cli, &root, start)?;
            let query = query.join(" ");
            commands::search::execute(cli, &archive, &query, project.as_deref(), *limit)
        }

        Some(Commands::Rule { command }) => {
            let archive = open_archive(cli, &root, start)?;
            match command {
                RuleCommands::Add {
                    name,
                    content,
                    file,
                } => commands::rule::execute_add(
                    cli,
                    &archive,
                    name,
                    content.as_deref(),
                    file.as_deref(),
                ),
                RuleCommands::List => commands::rule::execute_list(cli, &archive),
            }
        }

        Some(Commands::Generate { base, output }) => {
            let archive = open_archive(cli, &root, start)?;
            commands::generate::execute(cli, &archive, base.as_deref(), output.as_deref())
        }

        Some(Commands::Projects) => {
            let archive = open_archive(cli, &root, start)?;
            commands::list::projects(cli, &archive)
        }

        Some(Commands::Sections { project }) => {
            let archive = open_archive(cli, &root, start)?;
            commands::list::sections(cli, &archive, project)
        }

        Some(Commands::Serve { host, port }) => {
            let archive = open_archive(cli, &root, start)?;
            commands::serve::execute(cli, archive, host, *port)
        }
    }
}

/// Open the archive for the resolved root.
///
/// An explicit `--root` points directly at the archive's parent directory;
/// otherwise the data directory is discovered by walking up from the cwd.
fn open_archive(cli: &Cli, root: &Path, start: Instant) -> Result<Archive> {
    let archive = if cli.root.is_some() {
        Archive::open(&root.join(DEFAULT_DATA_DIR))?
    } else {
        Archive::discover(root)?
    };

    if cli.verbose {
        eprintln!("open_archive: {:?}", start.elapsed());
    }

    Ok(archive)
}

fn handle_no_command() -> Result<()> {
    println!("mnemo {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("A file-backed knowledge archive for AI coding agents.");
    println!();
    println!("Run `mnemo --help` for usage information.");
    Ok(())
}
