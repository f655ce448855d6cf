use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::PathBuf,
};

use revcomp::{RevcompBuilder, DEFAULT_CHUNK_SIZE, DEFAULT_LINE_WIDTH};

#[derive(Parser)]
#[command(name = "revcomp")]
#[command(about = "Reverse-complement every record of a FASTA stream")]
struct Args {
    #[arg(help = "Input FASTA file [default: stdin]")]
    input: Option<PathBuf>,

    #[arg(short = 'o', long, help = "Output file [default: stdout]")]
    output: Option<PathBuf>,

    #[arg(
        short = 't',
        long,
        default_value_t = 0,
        help = "Number of worker threads (0 uses all cores)"
    )]
    threads: usize,

    #[arg(short = 'w', long, default_value_t = DEFAULT_LINE_WIDTH, help = "Sequence symbols per line")]
    line_width: usize,

    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, help = "Chunk size in bytes")]
    chunk_size: usize,
}

fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut revcomp = RevcompBuilder::default()
        .line_width(args.line_width)
        .chunk_size(args.chunk_size)
        .threads(args.threads)
        .build()?;

    debug!(
        "reading from {}",
        args.input
            .as_ref()
            .map_or_else(|| "stdin".to_string(), |p| p.display().to_string())
    );
    let reader = open_input(args.input.as_ref())?;
    let writer = open_output(args.output.as_ref())?;
    revcomp.process(reader, writer)?;
    Ok(())
}
