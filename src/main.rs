use anyhow::{anyhow, Result};
use clap::{App, Arg};
use skald::build::{build_site, prepare_output};
use skald::config::Config;
use skald::log;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("project")
                .long("project")
                .short("p")
                .takes_value(true)
                .value_name("DIR")
                .help("Project directory, or any directory beneath it (default: the working directory)"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .value_name("DIR")
                .help("Output directory (default: <project>/output)"),
        )
        .get_matches();

    let project = match matches.value_of("project") {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let output = matches.value_of("output").map(Path::new);

    let config = Config::from_directory(&std::fs::canonicalize(&project)?, output)?;
    prepare_output(&config.output_directory)
        .map_err(|err| anyhow!("Preparing output directory: {}", err))?;

    let report = build_site(&config);
    if report.is_success() {
        log!("build"; "site written to `{}`", config.output_directory.display());
    } else {
        log!(
            "warn";
            "site written to `{}` with failed phases: {}",
            config.output_directory.display(),
            report.failed.join(", ")
        );
    }
    Ok(())
}
