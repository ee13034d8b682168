use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use log::{LevelFilter, debug, error};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use qpencoding::{Decoder, Encoder};

#[derive(Parser)]
#[command(name = "qpencoding")]
#[command(
    about = "Encode/decode file as Quoted-Printable (RFC 2045)",
    long_about = None,
    disable_version_flag = true
)]
struct Cli {
    /// Decode Quoted-Printable encoded file
    #[arg(short, long, conflicts_with = "encode")]
    decode: bool,

    /// Encode file into Quoted-Printable
    #[arg(short, long)]
    encode: bool,

    /// Print version number
    #[arg(short = 'v', long)]
    version: bool,

    /// Enable verbose output
    #[arg(long)]
    verbose: bool,

    /// Input file
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l}: {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level));

    match config {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("Failed to initialize logging: {}", e);
            }
        }
        Err(e) => eprintln!("Invalid logging configuration: {}", e),
    }
}

fn print_usage() {
    if let Err(e) = Cli::command().print_help() {
        eprintln!("Error: {}", e);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let Some(path) = cli.file else {
        print_usage();
        return;
    };

    if !cli.decode && !cli.encode {
        print_usage();
        return;
    }

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(e) => {
            error!("{}: {}", path.display(), e);
            process::exit(1);
        }
    };

    if cli.decode {
        debug!("Decoding: {}", path.display());

        let mut decoded = Vec::new();
        if let Err(e) = Decoder::new(file).read_to_end(&mut decoded) {
            error!("{}", qpencoding::QpError::from(e));
            process::exit(2);
        }

        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(&decoded).and_then(|()| stdout.flush()) {
            error!("{}", e);
        }
        debug!("> Decoded {} bytes", decoded.len());
        return;
    }

    debug!("Encoding: {}", path.display());

    let stdout = io::stdout().lock();
    let result = qpencoding::encode(file, stdout).and_then(|size| {
        io::stdout().flush()?;
        Ok(size)
    });

    match result {
        Ok(size) => debug!("> Encoded {} bytes", size),
        Err(e) => error!("{}", e),
    }
}
