use std::{env, io, process::ExitCode};

use memctl::{cli, config::Settings, logger};

fn main() -> ExitCode {
    let status = cli::execute(
        env::args().skip(1),
        |verbose| {
            let settings = Settings::from_env(verbose);
            let _ = logger::init(settings.log_level);
            settings
        },
        &mut io::stdout().lock(),
    );
    ExitCode::from(status)
}
