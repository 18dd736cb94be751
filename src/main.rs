use std::process::ExitCode;

use clap::Parser;

use mailmig_installer::cli::{Cli, Command};
use mailmig_installer::{commands, error, logging};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    if matches!(args.command, Command::Version) {
        commands::version::run();
        return ExitCode::SUCCESS;
    }

    let name = args.command.name();
    let log = logging::Logger::new(name);

    // The guard may re-exec under sudo, so it runs before the log file exists.
    if args.command.needs_root() {
        let guarded = logging::with_console(args.verbose, || {
            commands::require_root(args.global.dry_run, &log)
                .inspect_err(|e| log.error(&format!("{e:#}")))
        });
        if let Err(e) = guarded {
            return ExitCode::from(error::exit_code_for(&e));
        }
    }

    logging::init_subscriber(args.verbose, name);

    let result = match &args.command {
        Command::Install(opts) => commands::install::run(&args.global, opts, &log),
        Command::Bootstrap(opts) => commands::bootstrap::run(&args.global, opts, &log),
        Command::Uninstall => commands::uninstall::run(&args.global, &log),
        Command::Check => commands::check::run(&args.global, &log),
        Command::Version => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = error::exit_code_for(&e);
            log.error(&format!("{e:#}"));
            log.debug(&format!("exit code {code}"));
            ExitCode::from(code)
        }
    }
}
