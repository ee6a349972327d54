// Command-line interface for scrivpltr
//
// This binary converts writing projects between Scrivener (.scrivx) and Plottr (.pltr) and
// manages the mapping table that decides how node types are translated.
//
// The conversion logic lives in scrivpltr-babel; this crate only selects paths and options,
// loads configuration, sets up logging and reports results.
//
// Usage:
//  scrivpltr <input> [--to <format>] [--output <file>] [--force] - Convert (default command)
//  scrivpltr convert <input> [--to <format>] [--output <file>]   - Same as above (explicit)
//  scrivpltr validate <input>                                    - Load and validate only
//  scrivpltr mappings list                                       - Show the mapping table
//  scrivpltr mappings enable|disable <index>                     - Toggle a rule
//  scrivpltr mappings describe <index> <text>                    - Change a rule's description
//  scrivpltr --list-formats                                      - List supported formats
//
// The direction is auto-detected from the input extension; --to overrides it.

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use scrivpltr_babel::pipeline::{self, ConvertSpec};
use scrivpltr_babel::{loader, Direction, Format, FormatRegistry, MappingLoad, MappingTable};
use scrivpltr_config::{Loader, ScrivpltrConfig};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

const FORMAT_NAMES: [&str; 2] = ["scrivener", "plottr"];
const SUBCOMMANDS: [&str; 4] = ["convert", "validate", "mappings", "help"];

/// Exit status when a conversion dropped nodes and `convert.fail_on_omission` is set.
const EXIT_OMISSIONS: i32 = 2;

fn build_cli() -> Command {
    Command::new("scrivpltr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert writing projects between Scrivener and Plottr")
        .long_about(
            "scrivpltr converts Scrivener 3 projects (.scrivx) to Plottr projects (.pltr)\n\
            and back, translating node types through an editable mapping table.\n\n\
            Commands:\n  \
            - convert:  Convert a project (default command)\n  \
            - validate: Check that a project can be loaded\n  \
            - mappings: Inspect or edit the mapping table\n\n\
            Examples:\n  \
            scrivpltr book.scrivx                        # Writes book.pltr next to the input\n  \
            scrivpltr book.pltr -o restored.scrivx       # Plottr back to Scrivener\n  \
            scrivpltr validate book.scrivx               # Load and validate only\n  \
            scrivpltr mappings disable 1                 # Stop converting chapters",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List supported formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a scrivpltr.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("mappings-file")
                .long("mappings")
                .value_name("PATH")
                .help("Mapping table to use (overrides mappings.path)")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a project to the other format (default command)")
                .long_about(
                    "Convert a project between Scrivener and Plottr.\n\n\
                    The source format is detected from the file extension (.scrivx or .pltr)\n\
                    and the output defaults to the input path with the target extension.\n\
                    Nodes whose type has no enabled mapping are skipped and reported.",
                )
                .arg(
                    Arg::new("input")
                        .help("Input project file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (defaults to the other format)")
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMAT_NAMES))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Print the converted document instead of writing it")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .short('f')
                        .help("Replace an existing file at the default output path")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Load a project and report whether it is valid")
                .arg(
                    Arg::new("input")
                        .help("Project file to validate")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("mappings")
                .about("Inspect or edit the mapping table")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("Show every rule with its index"))
                .subcommand(
                    Command::new("enable")
                        .about("Enable the rule at an index")
                        .arg(index_arg()),
                )
                .subcommand(
                    Command::new("disable")
                        .about("Disable the rule at an index")
                        .arg(index_arg()),
                )
                .subcommand(
                    Command::new("describe")
                        .about("Replace the description of the rule at an index")
                        .arg(index_arg())
                        .arg(
                            Arg::new("text")
                                .help("New description")
                                .required(true)
                                .index(2),
                        ),
                ),
        )
}

fn index_arg() -> Arg {
    Arg::new("index")
        .help("Rule index as shown by `mappings list`")
        .required(true)
        .index(1)
        .value_parser(clap::value_parser!(usize))
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // A bare file argument means "convert"
            if args.len() > 1
                && !args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        matches.get_one::<String>("mappings-file").map(|s| s.as_str()),
    );
    init_logging(&config);

    let mappings_path = config.mappings.path.as_path();
    tracing::debug!("Using mapping table {}", mappings_path.display());

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            handle_convert_command(sub_matches, mappings_path, &config);
        }
        Some(("validate", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .expect("input is required");
            handle_validate_command(Path::new(input));
        }
        Some(("mappings", sub_matches)) => {
            handle_mappings_command(sub_matches, mappings_path, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            process::exit(1);
        }
    }
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, mappings_path: &Path, config: &ScrivpltrConfig) {
    let input = matches
        .get_one::<String>("input")
        .expect("input is required");

    let mut spec = ConvertSpec::new(input)
        .dry_run(matches.get_flag("dry-run"))
        .overwrite(matches.get_flag("force"));
    if let Some(to) = matches.get_one::<String>("to") {
        let direction = Direction::from_source_format(to)
            .map(Direction::inverse)
            .unwrap_or_else(|| {
                eprintln!("Error: unknown target format '{to}'");
                process::exit(1);
            });
        spec = spec.with_direction(direction);
    }
    if let Some(output) = matches.get_one::<String>("output") {
        spec = spec.with_output_path(output);
    }

    let table = load_mappings(mappings_path, config);

    let outcome = pipeline::run(&spec, &table).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    match &outcome.output {
        Some(path) => println!("Wrote {}", path.display()),
        None => {
            let registry = FormatRegistry::default();
            let text = registry
                .get(outcome.direction.target_format())
                .and_then(|format| format.serialize(&outcome.document))
                .unwrap_or_else(|e| {
                    eprintln!("Error: {e}");
                    process::exit(1);
                });
            print!("{text}");
        }
    }

    let report = &outcome.report;
    for source in &report.ambiguous {
        eprintln!("Warning: '{source}' matches several enabled mappings; the first one was used");
    }
    for omission in &report.omitted {
        eprintln!(
            "Skipped {} ({} node(s)): no enabled mapping for '{}'",
            omission.path, omission.subtree_size, omission.type_label
        );
    }
    eprintln!(
        "Converted {} node(s), skipped {}",
        report.converted,
        report.omitted_count()
    );

    if config.convert.fail_on_omission && !report.is_lossless() {
        process::exit(EXIT_OMISSIONS);
    }
}

/// Handle the validate command
fn handle_validate_command(input: &Path) {
    let registry = FormatRegistry::default();
    let direction = pipeline::detect_direction(&registry, input).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    let format = registry
        .get(direction.source_format())
        .unwrap_or_else(|e| {
            eprintln!("Error: {e}");
            process::exit(1);
        });

    match loader::load(input, format) {
        Ok(loaded) => println!(
            "OK: {} is a valid {} project ({} nodes)",
            input.display(),
            format.name(),
            loaded.document.node_count()
        ),
        Err(e) => {
            eprintln!("Error ({}): {e}", e.kind());
            process::exit(1);
        }
    }
}

/// Handle the mappings command and its subcommands
fn handle_mappings_command(matches: &ArgMatches, mappings_path: &Path, config: &ScrivpltrConfig) {
    let mut table = load_mappings(mappings_path, config);

    let changed = match matches.subcommand() {
        Some(("list", _)) => {
            print_mappings(&table);
            return;
        }
        Some(("enable", sub)) => table.enable(index_of(sub)),
        Some(("disable", sub)) => table.disable(index_of(sub)),
        Some(("describe", sub)) => {
            let text = sub.get_one::<String>("text").expect("text is required");
            table.update_description(index_of(sub), text.as_str())
        }
        _ => {
            eprintln!("Unknown mappings subcommand. Use --help for usage information.");
            process::exit(1);
        }
    };

    if !changed {
        eprintln!(
            "Error: no mapping at that index (the table has {} rules)",
            table.len()
        );
        process::exit(1);
    }

    if let Err(e) = table.save(mappings_path) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    print_mappings(&table);
}

fn index_of(matches: &ArgMatches) -> usize {
    *matches.get_one::<usize>("index").expect("index is required")
}

fn print_mappings(table: &MappingTable) {
    for (index, rule) in table.rules().iter().enumerate() {
        let mark = if rule.enabled { "x" } else { " " };
        println!(
            "{index:>3} [{mark}] {} <-> {}  {}",
            rule.scrivener, rule.plottr, rule.description
        );
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Supported formats:\n");
    let registry = FormatRegistry::default();
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!(
                "  {name:<10} .{:<7} {}",
                format.extension(),
                format.description()
            );
        }
    }
}

fn load_mappings(path: &Path, config: &ScrivpltrConfig) -> MappingTable {
    let MappingLoad {
        table,
        fallback,
        persist_error,
    } = MappingTable::load_with(path, config.mappings.persistence());

    if let Some(reason) = fallback {
        eprintln!("Warning: using default mappings ({reason})");
    }
    if let Some(e) = persist_error {
        eprintln!("Warning: could not save default mappings: {e}");
    }
    table
}

fn load_cli_config(explicit_path: Option<&str>, mappings_path: Option<&str>) -> ScrivpltrConfig {
    let loader = Loader::new().with_optional_file("scrivpltr.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    let loader = match mappings_path {
        Some(path) => loader.set_override("mappings.path", path),
        None => Ok(loader),
    };

    loader.and_then(Loader::build).unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        process::exit(1);
    })
}

fn init_logging(config: &ScrivpltrConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
