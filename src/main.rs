use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};
use codelite_gen::{Configuration, Overrides, WriteMode};
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("generate")
                .about("Writes one CodeLite project file per target of a manifest")
                .arg(manifest_arg())
                .arg(
                    Arg::new("platform")
                        .long("platform")
                        .help("Host platform to generate for (Linux, Mac, Win64, Win32)"),
                )
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .help("Directory the project files are written to")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("configuration")
                        .short('c')
                        .long("configuration")
                        .help("Configuration to include, may be repeated")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Preview the project files without writing them")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("interactive"),
                )
                .arg(
                    Arg::new("interactive")
                        .short('i')
                        .long("interactive")
                        .help("Preview the project files and ask before writing them")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("targets")
                .about("Lists the targets of a manifest")
                .arg(manifest_arg()),
        )
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    init_logger(is_verbose);

    match matches.subcommand() {
        Some(("generate", args)) => handle_generate(args),
        Some(("targets", args)) => handle_targets(args),
        _ => unreachable!(),
    }
}

fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .help("Path to the generator manifest (e.g. codelite.toml)")
        .required(true)
        .value_parser(value_parser!(PathBuf))
}

fn init_logger(is_verbose: bool) {
    let default_level = if is_verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn handle_generate(args: &ArgMatches) -> miette::Result<()> {
    let manifest = args
        .get_one::<PathBuf>("manifest")
        .expect("manifest required");

    let overrides = Overrides {
        host_platform: args.get_one::<String>("platform").cloned(),
        output_dir: args.get_one::<PathBuf>("output-dir").cloned(),
        configurations: args
            .get_many::<String>("configuration")
            .unwrap_or_default()
            .map(|label| Configuration::new(label.as_str()))
            .collect(),
    };

    let mode = if args.get_flag("dry-run") {
        WriteMode::DryRun
    } else if args.get_flag("interactive") {
        WriteMode::Confirm
    } else {
        WriteMode::Write
    };

    let written = codelite_gen::generate(manifest, &overrides, mode)?;

    if !written && mode == WriteMode::Write {
        log::warn!("no project files were written");
    }

    Ok(())
}

fn handle_targets(args: &ArgMatches) -> miette::Result<()> {
    let manifest = args
        .get_one::<PathBuf>("manifest")
        .expect("manifest required");

    for target in codelite_gen::list_targets(manifest)? {
        println!(
            "{} ({}): {} files",
            target.name, target.target_type, target.file_count
        );
    }

    Ok(())
}
