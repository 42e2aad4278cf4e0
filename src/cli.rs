// Command-line interface for demorse.
//
// Explicit subcommands with long-form options; decoding always goes
// through the streaming decoder.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::decoder::{DecodeOptions, OverlongRun, TrailingRun};
use crate::stream::{CHUNK_SIZE, MorseDecoder};
use crate::table::{self, MAX_PATH_CODE, MAX_RUN_LEN, PLACEHOLDER, TABLE_LEN};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Bounds-checked Morse code decoder.
#[derive(Parser, Debug)]
#[command(
    name = "demorse",
    version,
    about = "Morse code decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Decode Morse text (dots, dashes, separators).
    Decode(DecodeArgs),
    /// Print the symbol table.
    Table,
    /// Print build/configuration details.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TrailingArg {
    /// Decode a run left pending at end of input.
    Flush,
    /// Discard a run left pending at end of input.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OverlongArg {
    /// Fail on a run that has no table entry.
    Reject,
    /// Emit the placeholder for a run that has no table entry.
    Substitute,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Write to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Handling of a symbol run not followed by a separator.
    #[arg(long, value_enum, default_value_t = TrailingArg::Flush)]
    trailing: TrailingArg,

    /// Handling of a symbol run longer than the table allows.
    #[arg(long, value_enum, default_value_t = OverlongArg::Reject)]
    overlong: OverlongArg,

    /// Input file path (or use positional INPUT).
    #[arg(short = 'i', long = "input", value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output file path (or use positional OUTPUT).
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Input file path.
    #[arg(value_name = "INPUT", conflicts_with = "input", value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file path.
    #[arg(value_name = "OUTPUT", conflicts_with = "output", value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Decode,
    Table,
    Config,
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    trailing: TrailingRun,
    overlong: OverlongRun,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let mut opts = Options {
        command: Command::Config,
        use_stdout: false,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        trailing: TrailingRun::default(),
        overlong: OverlongRun::default(),
        input_file: None,
        output_file: None,
        json_output: cli.json_output,
    };

    match cli.command {
        Cmd::Decode(args) => {
            opts.command = Command::Decode;
            opts.use_stdout = args.stdout;
            opts.trailing = match args.trailing {
                TrailingArg::Flush => TrailingRun::Flush,
                TrailingArg::Drop => TrailingRun::Drop,
            };
            opts.overlong = match args.overlong {
                OverlongArg::Reject => OverlongRun::Reject,
                OverlongArg::Substitute => OverlongRun::Substitute,
            };
            opts.input_file = args.input.or(args.input_pos);
            opts.output_file = args.output.or(args.output_pos);
        }
        Cmd::Table => opts.command = Command::Table,
        Cmd::Config => opts.command = Command::Config,
    }
    opts
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("demorse".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let opts = resolve_options(cli);
        let _ = build_decode_options(&opts);
    }
}

fn build_decode_options(opts: &Options) -> DecodeOptions {
    DecodeOptions {
        trailing: opts.trailing,
        overlong: opts.overlong,
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("demorse version {version} (Rust)");

    let fuzzing = cfg!(feature = "fuzzing") as u8;
    let defaults = DecodeOptions::default();

    eprintln!("FUZZING={fuzzing}");
    eprintln!("TABLE_LEN={TABLE_LEN}");
    eprintln!("MAX_PATH_CODE={MAX_PATH_CODE}");
    eprintln!("MAX_RUN_LEN={MAX_RUN_LEN}");
    eprintln!("PLACEHOLDER={}", PLACEHOLDER as char);
    eprintln!("CHUNK_SIZE={CHUNK_SIZE}");
    eprintln!("DEFAULT_TRAILING={:?}", defaults.trailing);
    eprintln!("DEFAULT_OVERLONG={:?}", defaults.overlong);

    0
}

// ---------------------------------------------------------------------------
// Table command
// ---------------------------------------------------------------------------

fn cmd_table(opts: &Options) -> i32 {
    let mut out = BufWriter::new(io::stdout().lock());
    let mut rows = Vec::with_capacity(TABLE_LEN);

    for (index, &byte) in table::entries().iter().enumerate() {
        let Some(code) = table::path_of(index) else {
            continue;
        };
        if opts.json_output {
            rows.push(serde_json::json!({
                "index": index,
                "code": code.get(),
                "path": code.to_string(),
                "char": (byte as char).to_string(),
                "assigned": table::is_assigned(code),
            }));
        } else if let Err(e) = writeln!(
            out,
            "{index:>2}  {:>2}  {:<6}  {}",
            code.get(),
            code.to_string(),
            byte as char
        ) {
            eprintln!("demorse: write error: {e}");
            return 1;
        }
    }

    if opts.json_output {
        match serde_json::to_string_pretty(&rows) {
            Ok(json) => {
                if let Err(e) = writeln!(out, "{json}") {
                    eprintln!("demorse: write error: {e}");
                    return 1;
                }
            }
            Err(e) => {
                eprintln!("demorse: json error: {e}");
                return 1;
            }
        }
    }

    if let Err(e) = out.flush() {
        eprintln!("demorse: write flush error: {e}");
        return 1;
    }
    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let reader: Box<dyn Read> = match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::with_capacity(BUF_SIZE, f)),
            Err(e) => {
                eprintln!("demorse: input file: {}: {e}", path.display());
                return 1;
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut writer: Box<dyn Write> = match &opts.output_file {
        Some(path) if !opts.use_stdout => {
            if path.exists() && !opts.force {
                eprintln!(
                    "demorse: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return 1;
            }
            match File::create(path) {
                Ok(f) => Box::new(BufWriter::with_capacity(BUF_SIZE, f)),
                Err(e) => {
                    eprintln!("demorse: output file: {}: {e}", path.display());
                    return 1;
                }
            }
        }
        _ => Box::new(BufWriter::with_capacity(BUF_SIZE, io::stdout().lock())),
    };

    let mut decoder = MorseDecoder::with_options(reader, build_decode_options(opts));

    match decoder.decode_to(&mut writer) {
        Ok(total) => {
            if let Err(e) = writer.flush() {
                eprintln!("demorse: write flush error: {e}");
                return 1;
            }
            let read = decoder.bytes_read();
            if opts.verbose > 0 && !opts.quiet {
                eprintln!("demorse: decoder: input size: {read}, output size: {total}");
            }
            if opts.json_output {
                let json = serde_json::json!({
                    "command": "decode",
                    "input_size": read,
                    "output_size": total,
                    "chunks": decoder.chunks_read(),
                });
                match serde_json::to_string_pretty(&json) {
                    Ok(s) => eprintln!("{s}"),
                    Err(e) => eprintln!("demorse: json error: {e}"),
                }
            }
            0
        }
        Err(e) => {
            // Keep whatever was decoded before the failure.
            let _ = writer.flush();
            eprintln!("demorse: decode error: {e}");
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "demorse: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    log::debug!("resolved options: {opts:?}");

    let exit_code = match opts.command {
        Command::Decode => cmd_decode(&opts),
        Command::Table => cmd_table(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_opts(args: &[&str]) -> Options {
        let argv: Vec<String> = std::iter::once("demorse".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        let cli = Cli::try_parse_from(argv).expect("cli parse failed");
        resolve_options(cli)
    }

    #[test]
    fn decode_subcommand_maps_correctly() {
        let opts = parse_opts(&[
            "decode",
            "--trailing",
            "drop",
            "--overlong",
            "substitute",
            "in.txt",
            "out.txt",
        ]);
        assert_eq!(opts.command, Command::Decode);
        assert_eq!(opts.trailing, TrailingRun::Drop);
        assert_eq!(opts.overlong, OverlongRun::Substitute);
        assert_eq!(opts.input_file, Some(PathBuf::from("in.txt")));
        assert_eq!(opts.output_file, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn decode_defaults() {
        let opts = parse_opts(&["decode"]);
        assert_eq!(build_decode_options(&opts), DecodeOptions::default());
        assert_eq!(opts.input_file, None);
        assert!(!opts.use_stdout);
    }

    #[test]
    fn named_input_and_output() {
        let opts = parse_opts(&["decode", "-i", "a.txt", "-o", "b.txt", "-c"]);
        assert_eq!(opts.input_file, Some(PathBuf::from("a.txt")));
        assert_eq!(opts.output_file, Some(PathBuf::from("b.txt")));
        assert!(opts.use_stdout);
    }

    #[test]
    fn global_flags() {
        let opts = parse_opts(&["decode", "-f", "--json"]);
        assert!(opts.force);
        assert!(opts.json_output);
        let opts = parse_opts(&["--quiet", "table"]);
        assert!(opts.quiet);
        assert_eq!(opts.command, Command::Table);
    }

    #[test]
    fn verbose_is_capped() {
        let opts = parse_opts(&["-vvvv", "config"]);
        assert_eq!(opts.verbose, 2);
        assert_eq!(opts.command, Command::Config);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let argv = ["demorse", "-q", "-v", "config"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn unknown_policy_rejected() {
        let argv = ["demorse", "decode", "--overlong", "ignore"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn fuzz_parse_never_panics() {
        let args: Vec<String> = ["decode", "--trailing", "\u{0}", "-vvv"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        fuzz_try_parse_args(&args);
        fuzz_try_parse_args(&[]);
    }
}
