#![allow(special_module_name)]
use crate::lib::environment::{Environment, EnvironmentImpl};
use crate::lib::error::{KeyswitchError, KeyswitchResult};
use crate::lib::logger::{create_root_logger, LoggingMode};
use clap::{ArgAction, Parser};
use std::io::Write;
use std::path::PathBuf;

mod commands;
mod lib;

/// Switches between SSH key pairs and git identities.
#[derive(Parser)]
#[command(name = "keyswitch", version, arg_required_else_help = true)]
pub struct CliOpts {
    /// Displays detailed information about operations. -vv also traces every file touched.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppresses informational messages. -qq limits to errors only; -qqqq disables them all.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    quiet: u8,

    /// The logging mode to use. You can log to stderr, a file, or both.
    #[arg(long = "log", default_value = "stderr", value_parser = ["stderr", "tee", "file"], global = true)]
    logmode: String,

    /// The file to log to, if logging to a file (see --log).
    #[arg(long, global = true)]
    logfile: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::KeyswitchCommand,
}

fn setup_logging(opts: &CliOpts) -> KeyswitchResult<slog::Logger> {
    let verbose_level = opts.verbose as i64 - opts.quiet as i64;
    let logfile = || {
        opts.logfile
            .clone()
            .unwrap_or_else(|| PathBuf::from("keyswitch.log"))
    };

    let mode = match opts.logmode.as_str() {
        "tee" => LoggingMode::Tee(logfile()),
        "file" => LoggingMode::File(logfile()),
        _ => LoggingMode::Stderr,
    };

    Ok(create_root_logger(verbose_level, mode)?)
}

fn print_error(err: &KeyswitchError) -> std::io::Result<()> {
    let Some(mut stderr) = term::stderr() else {
        let mut stderr = std::io::stderr();
        for (level, cause) in err.chain().enumerate() {
            let prefix = if level == 0 { "Error" } else { "Caused by" };
            writeln!(stderr, "{prefix}: {cause}")?;
        }
        return Ok(());
    };

    // print error chain stack
    for (level, cause) in err.chain().enumerate() {
        let (color, prefix) = if level == 0 {
            (term::color::RED, "Error")
        } else {
            (term::color::YELLOW, "Caused by")
        };
        // colors are best effort
        let _ = stderr.fg(color);
        write!(stderr, "{prefix}: ")?;
        let _ = stderr.reset();
        writeln!(stderr, "{cause}")?;
    }
    Ok(())
}

fn inner_main() -> KeyswitchResult {
    let cli_opts = CliOpts::parse();
    let log = setup_logging(&cli_opts)?;
    let env = EnvironmentImpl::new(log)?;

    slog::trace!(
        env.get_logger(),
        "Trace mode enabled. Lots of logs coming up."
    );
    commands::exec(&env, cli_opts.command)
}

fn main() {
    let result = inner_main();
    if let Err(err) = result {
        let _ = print_error(&err);
        std::process::exit(255);
    }
}
