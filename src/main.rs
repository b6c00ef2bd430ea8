use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use std::{path::PathBuf, process, sync::Arc};

use compressor::{Compressor, LZW};
use roundtrip::{to_hex, Report, RoundTrip};

struct Args {
    source: PathBuf,
    verbose: bool,
    quiet: bool,
}

fn get_compressor() -> Arc<dyn Compressor> {
    let compressor: Arc<dyn Compressor> = Arc::new(LZW::new());
    compressor
}

fn command() -> Command {
    Command::new("lzw")
        .about("Encodes a file with LZW, decodes it again and checks the round trip")
        .arg(Arg::new("file")
            .value_name("FILE")
            .required(true)
            .num_args(1)
            .value_parser(clap::value_parser!(PathBuf))
            .help("File to encode; artifacts are written next to it"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .conflicts_with("quiet")
            .help("Show diagnostic logs (honours RUST_LOG)"))
        .arg(Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .help("Suppress all logs"))
}

fn parse_args(matches: &ArgMatches) -> Option<Args> {
    let source = matches.get_one::<PathBuf>("file")?.clone();

    Some(Args {
        source,
        verbose: matches.get_flag("verbose"),
        quiet: matches.get_flag("quiet"),
    })
}

fn init_tracing(args: &Args) {
    let filter = if args.quiet {
        EnvFilter::new("off")
    } else if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn millis(duration: std::time::Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn print_report(report: &Report) -> bool {
    println!(
        "Encoding... {:8} bytes ({:.2} ms) {:.1}%",
        report.encoded_size,
        millis(report.encode_time),
        report.ratio()
    );
    println!(
        "Decoding... {:8} bytes ({:.2} ms)",
        report.decoded_size,
        millis(report.decode_time)
    );

    let verification = &report.verification;
    debug!(
        expected = %to_hex(&verification.expected_digest),
        actual = %to_hex(&verification.actual_digest),
        "sha256"
    );

    if !verification.size_matches() {
        eprintln!("Error: Detected Size Mismatch.");
        eprintln!(
            "       Have {} bytes (Expected {} bytes)",
            verification.actual_size, verification.expected_size
        );
    }

    if !verification.content_matches() {
        eprintln!("Error: Detected Content Mismatch.");
        eprintln!("       Found {} mismatched bytes.", verification.mismatched_bytes);
    }

    verification.is_ok()
}

fn main() {
    let matches = command().get_matches();
    let args = match parse_args(&matches) {
        Some(args) => args,
        None => {
            eprintln!("USAGE: lzw [file]");
            process::exit(2);
        }
    };

    init_tracing(&args);

    let roundtrip = RoundTrip::new(&args.source, get_compressor());
    match roundtrip.run() {
        Ok(report) => {
            if !print_report(&report) {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
