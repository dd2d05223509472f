mod report;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use grammar_wiki_config::Config;
use grammar_wiki_engine::checks::{check_literal_links, find_broken_links, normalize_corpus};
use grammar_wiki_engine::{Corpus, NameIndex, io, reconcile_backlinks, reconcile_forward};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "grammar-wiki")]
#[command(about = "Check and repair links and backlinks in a grammar wiki", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus root (defaults to corpus_root from the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Config file (defaults to ~/.config/grammar-wiki/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging: -v for info, -vv for debug
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the links of one file by literal path, without fallbacks
    Check {
        /// File to check
        file: PathBuf,
    },
    /// List every file with links that do not map to an existing file
    FindBroken,
    /// Rewrite links to fully qualified paths using production names
    Normalize,
    /// Resolve every content link and report or fix non-canonical ones
    VerifyForward(FixArgs),
    /// Compare every backlinks block with the links pointing at its file
    VerifyBacklinks(FixArgs),
    /// Forward pass, then backlinks pass over the updated corpus
    Verify(FixArgs),
}

#[derive(Args)]
struct FixArgs {
    /// Write fixes back to the files
    #[arg(long)]
    fix: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(&cli);
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
    }
    ExitCode::from(exit_status(&result))
}

/// 0 when clean, 1 when issues remain, 2 when the run itself failed.
fn exit_status(result: &Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();
}

/// Runs the command; `Ok(false)` means issues remain after any fixing.
fn run(cli: &Cli) -> Result<bool> {
    let mut corpus = load_corpus(cli)?;
    let mut out = std::io::stdout().lock();

    match &cli.command {
        Commands::Check { file } => {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let checks = check_literal_links(&corpus, &text);
            report::literal_checks(&mut out, &file.display().to_string(), &checks)?;
            Ok(true)
        }
        Commands::FindBroken => {
            let broken = find_broken_links(&corpus);
            report::broken_links(&mut out, &corpus, &broken)?;
            Ok(true)
        }
        Commands::Normalize => {
            let summary = normalize_corpus(&mut corpus)?;
            report::normalize(&mut out, &corpus, &summary)?;
            Ok(true)
        }
        Commands::VerifyForward(args) => {
            let names = NameIndex::build(&corpus);
            let summary = reconcile_forward(&mut corpus, args.fix)?;
            report::forward(&mut out, &corpus, &names, &summary, args.fix)?;
            Ok(summary.remaining() == 0)
        }
        Commands::VerifyBacklinks(args) => {
            let summary = reconcile_backlinks(&mut corpus, args.fix)?;
            report::backlinks(&mut out, &corpus, &summary, args.fix)?;
            Ok(summary.remaining() == 0)
        }
        Commands::Verify(args) => {
            let names = NameIndex::build(&corpus);
            let forward = reconcile_forward(&mut corpus, args.fix)?;
            report::forward(&mut out, &corpus, &names, &forward, args.fix)?;

            writeln_separator(&mut out)?;

            let backlinks = reconcile_backlinks(&mut corpus, args.fix)?;
            report::backlinks(&mut out, &corpus, &backlinks, args.fix)?;
            Ok(forward.remaining() == 0 && backlinks.remaining() == 0)
        }
    }
}

fn writeln_separator(out: &mut impl std::io::Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out)
}

/// Find the corpus root and conventions, then load every document.
///
/// `--root` wins over the config file; conventions always come from the
/// config file when there is one.
fn load_corpus(cli: &Cli) -> Result<Corpus> {
    let config = match &cli.config {
        Some(path) => Some(
            Config::load_from_path(path)?
                .with_context(|| format!("Config file {} not found", path.display()))?,
        ),
        None => Config::load()?,
    };

    let (root, from_config) = corpus_root(cli.root.as_deref(), config.as_ref())?;

    io::validate_corpus_dir(&root).with_context(|| {
        if from_config {
            "Corpus root from the config file is invalid".to_string()
        } else {
            "Corpus root given with --root is invalid".to_string()
        }
    })?;
    log::info!("Using corpus root {}", root.display());

    let conventions = config.map(|config| config.conventions).unwrap_or_default();
    Ok(Corpus::load(root, conventions)?)
}

/// The corpus root to use, and whether it came from the config file.
fn corpus_root(root: Option<&Path>, config: Option<&Config>) -> Result<(PathBuf, bool)> {
    match (root, config) {
        (Some(root), _) => Ok((
            Config::expand_path(root).unwrap_or_else(|| root.to_path_buf()),
            false,
        )),
        (None, Some(config)) => Ok((config.corpus_root.clone(), true)),
        (None, None) => bail!(
            "No corpus root provided and no config file found\n\
             Usage: grammar-wiki --root <corpus-folder-path> <COMMAND>\n\
             Or create a config file at {}",
            Config::config_path().display()
        ),
    }
}
