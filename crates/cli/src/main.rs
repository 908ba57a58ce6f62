use anyhow::Context;
use clap::{ArgGroup, Parser, ValueEnum};
use modapi_core::{
    extract_api, format_output, ApiMap, DefFilter, ExtractConfig, ExtractMetadata, FileApi,
    OutputFormat,
};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "modapi")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract the API shape of Python modules")]
#[command(long_about = "Extracts the headers (and optionally docstrings) of function and class \
    definitions from Python source files, working directly on the lexical token stream:\n\n\
    - top-level and nested def/class definitions\n\
    - multi-line signatures, delimited across nested parentheses\n\
    - attached docstrings, detected by look-ahead after the signature colon\n\
    - public/private filtering by the leading-underscore naming convention\n\n\
    Output is the original source text of each matched span, line-faithful.")]
#[command(group(ArgGroup::new("visibility").args(["public", "private", "all"])))]
#[command(group(ArgGroup::new("docstring").args(["docstrings", "no_docstrings"])))]
pub struct Args {
    /// Files from which to extract the API definitions
    #[arg(value_name = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// Collect only public API definitions (default)
    #[arg(long)]
    pub public: bool,

    /// Collect only private API definitions
    #[arg(long)]
    pub private: bool,

    /// Collect all API definitions
    #[arg(long)]
    pub all: bool,

    /// Include docstrings (default)
    #[arg(long)]
    pub docstrings: bool,

    /// Exclude docstrings
    #[arg(long)]
    pub no_docstrings: bool,

    /// Run program in debug mode
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Text)]
    pub format: OutputFormatArg,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Parallel threads (0 = auto, 1 = sequential)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,

    /// Disable colored headers in terminal output
    #[arg(long)]
    pub no_color: bool,

    /// Show extraction summary on stderr
    #[arg(long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Text,
    Json,
    Yaml,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match run(&args) {
        Ok(()) => Ok(()),
        Err(e) if args.debug => Err(e),
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = ExtractConfig::new(def_filter_from_args(args)).with_docstrings(!args.no_docstrings);

    // Files are independent, so extraction may fan out; results come back in
    // input order and emission stops at the first failure.
    let results = extract_files(&args.files, &config, args.threads);
    let mut files = Vec::with_capacity(results.len());
    for result in results {
        files.push(result?);
    }

    let duration = start.elapsed();
    let metadata = ExtractMetadata {
        duration_ms: duration.as_millis() as u64,
        ..Default::default()
    };
    let api_map = ApiMap::new(files, metadata);

    let rendered = format_output(&api_map, resolve_format(args))?;

    if let Some(ref path) = args.output {
        fs::write(path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
    } else {
        println!("{rendered}");
    }

    if args.verbose {
        eprintln!(
            "Extracted {} definitions from {} files in {}ms",
            api_map.stats.total_definitions, api_map.stats.total_files, api_map.metadata.duration_ms
        );
    }

    Ok(())
}

fn def_filter_from_args(args: &Args) -> DefFilter {
    if args.all {
        DefFilter::All
    } else if args.private {
        DefFilter::Private
    } else {
        DefFilter::Public
    }
}

fn resolve_format(args: &Args) -> OutputFormat {
    match args.format {
        OutputFormatArg::Text
            if args.output.is_none() && !args.no_color && atty::is(atty::Stream::Stdout) =>
        {
            OutputFormat::Ansi
        }
        ref format => format.clone().into(),
    }
}

fn extract_files(
    files: &[PathBuf],
    config: &ExtractConfig,
    threads: usize,
) -> Vec<anyhow::Result<FileApi>> {
    if threads == 1 {
        return files.iter().map(|path| extract_file(path, config)).collect();
    }

    let pool = if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .ok()
    } else {
        None
    };

    match pool {
        Some(pool) => pool.install(|| {
            files
                .par_iter()
                .map(|path| extract_file(path, config))
                .collect()
        }),
        None => files
            .par_iter()
            .map(|path| extract_file(path, config))
            .collect(),
    }
}

fn extract_file(path: &Path, config: &ExtractConfig) -> anyhow::Result<FileApi> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let entries = extract_api(&source, config)
        .with_context(|| format!("failed to extract API from {}", path.display()))?;

    Ok(FileApi {
        path: path.to_path_buf(),
        entries,
    })
}
