//! flac2mp3 - batch FLAC to MP3 conversion for personal music libraries.
//!
//! Source files come either as NUL-separated paths on standard input (so
//! `find -print0` output can be piped straight in) or from an `.m3u`
//! playlist given with `-p`. Each source is decoded, re-encoded as a VBR MP3
//! carrying its tags and the best embedded cover picture, and written to
//! `<artist>/<album>/<NNN>_<title>.mp3` under the output root. Every
//! converted file is appended to `playlist.m3u` there.

use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use flac2mp3::config::Config;
use owo_colors::OwoColorize;
use std::error::Error;
use std::process::ExitCode;

mod cli;

#[derive(Parser)]
#[command(name = "flac2mp3")]
#[command(about = "Convert FLAC files into a tagged MP3 tree with a playlist")]
#[command(
    after_help = "Without -p, NUL-separated paths are read from standard input:\n  find . -name '*.flac' -print0 | flac2mp3"
)]
#[command(version)]
struct Cli {
    /// Convert the FLAC entries of an .m3u playlist
    #[arg(short, long, value_name = "FILE")]
    playlist: Option<String>,
}

/// Parse arguments. Usage errors exit with 1, help and version with 0.
fn parse_cli() -> Cli {
    let command = Cli::command().disable_version_flag(true).arg(
        Arg::new("version")
            .short('v')
            .long("version")
            .help("Print version")
            .action(ArgAction::Version),
    );

    let parsed = command
        .try_get_matches()
        .and_then(|matches| Cli::from_arg_matches(&matches));

    match parsed {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

fn init_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

    let log_config = ConfigBuilder::new().set_time_level(simplelog::LevelFilter::Off).build();
    TermLogger::init(
        config.log_level_filter()?,
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    init_logging(&config)?;
    log::debug!("Configuration: {config:?}");

    match cli.playlist {
        Some(m3u) => cli::convert::handle_playlist(&m3u, &config),
        None => cli::convert::handle_stdin(&config),
    }
}

fn main() -> ExitCode {
    let cli = parse_cli();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
