use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use std::path::PathBuf;

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("generate")
                .about("Builds the injection manifest of every template under a templates root")
                .arg(
                    Arg::new("root")
                        .help("directory holding one subdirectory per template")
                        .default_value("templates"),
                )
                .arg(
                    Arg::new("template")
                        .help("only build the manifest of this template")
                        .short('t')
                        .long("template"),
                )
                .arg(
                    Arg::new("sort")
                        .help("sort manifest keys by name instead of directory order")
                        .long("sort")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("skip-binary")
                        .help("flag non-text files by name only instead of failing")
                        .long("skip-binary")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Prints an existing manifest as a tree")
                .arg(
                    Arg::new("root")
                        .help("directory holding one subdirectory per template")
                        .required(true),
                )
                .arg(Arg::new("template").help("template name").required(true)),
        )
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    let mut logger = env_logger::Builder::from_default_env();
    if is_verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    match matches.subcommand() {
        Some(("generate", args)) => handle_generate(args),
        Some(("show", args)) => handle_show(args),
        _ => unreachable!(),
    }
}

fn root_arg(args: &ArgMatches) -> PathBuf {
    args.get_one::<String>("root")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("templates"))
}

fn handle_generate(args: &ArgMatches) -> miette::Result<()> {
    let root = root_arg(args);

    let options = scaffy_manifest::Options {
        sort: args.get_flag("sort"),
        skip_binary: args.get_flag("skip-binary"),
    };

    match args.get_one::<String>("template") {
        Some(template) => {
            scaffy_manifest::generate_one(&root, template, options)?;
        }
        None => {
            let generated = scaffy_manifest::generate_all(&root, options)?;
            log::info!("wrote {} manifests", generated.len());
        }
    }

    Ok(())
}

fn handle_show(args: &ArgMatches) -> miette::Result<()> {
    let root = root_arg(args);
    let template = args
        .get_one::<String>("template")
        .expect("template required");

    scaffy_manifest::show(&root, template)?;

    Ok(())
}
