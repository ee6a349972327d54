use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the formats registered by scrivpltr-babel
// We need to duplicate this here since build scripts can't access src/ modules
const FORMAT_NAMES: &[&str] = &["scrivener", "plottr"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("scrivpltr")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert writing projects between Scrivener and Plottr")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("mappings-file")
                .long("mappings")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("convert")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMAT_NAMES)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("validate").arg(
                Arg::new("input")
                    .required(true)
                    .index(1)
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .subcommand(
            Command::new("mappings")
                .subcommand(Command::new("list"))
                .subcommand(Command::new("enable").arg(Arg::new("index").required(true)))
                .subcommand(Command::new("disable").arg(Arg::new("index").required(true)))
                .subcommand(
                    Command::new("describe")
                        .arg(Arg::new("index").required(true).index(1))
                        .arg(Arg::new("text").required(true).index(2)),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "scrivpltr", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "scrivpltr", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "scrivpltr", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
