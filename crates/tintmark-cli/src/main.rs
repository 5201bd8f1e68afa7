use std::process::ExitCode;
use tintmark_cli::{command, logging, run_annotate, run_show_config, Invocation};

fn main() -> ExitCode {
    let matches = command().get_matches();
    logging::init(logging::verbosity(&matches));

    let invocation = match Invocation::from_matches(&matches) {
        Ok(invocation) => invocation,
        Err(err) => return fail(&err),
    };

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let result = match invocation {
        Invocation::Annotate(args) => run_annotate(&args, &mut stdout.lock(), &mut stderr.lock()),
        Invocation::ShowConfig { config } => run_show_config(config.as_deref(), &mut stdout.lock()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

fn fail(err: &anyhow::Error) -> ExitCode {
    tracing::error!("{err:#}");
    ExitCode::FAILURE
}
