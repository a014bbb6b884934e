mod logging;

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use css_normalizer::css::error::IoContext;
use css_normalizer::css::tree_printer::print_tree_to_stdout;
use css_normalizer::{NormalizeResult, Normalizer, NormalizerConfig};
use log::{error, info};

/// Parsed command line
struct CliArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
    pretty: bool,
    dump_tree: bool,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <input.css> [output.css] [options]", program);
    eprintln!("  <input.css>      Stylesheet to normalize");
    eprintln!("  [output.css]     Destination file, stdout when omitted");
    eprintln!("Options:");
    eprintln!("  --config <path>  Configuration file (YAML or JSON)");
    eprintln!("  --log <path>     Write logs to this file instead of stderr");
    eprintln!("  --pretty         Pretty-print the output");
    eprintln!("  --dump-tree      Print the normalized stylesheet tree to stdout");
    eprintln!("Example: {} theme.css theme.flat.css --pretty", program);
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut log_file = None;
    let mut pretty = false;
    let mut dump_tree = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = iter.next().ok_or("--config requires a path")?;
                config = Some(PathBuf::from(value));
            }
            "--log" => {
                let value = iter.next().ok_or("--log requires a path")?;
                log_file = Some(PathBuf::from(value));
            }
            "--pretty" => pretty = true,
            "--dump-tree" => dump_tree = true,
            flag if flag.starts_with("--") => return Err(format!("Unknown option {}", flag)),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let input = positional.next().ok_or("Missing input stylesheet")?;
    let output = positional.next();
    if positional.next().is_some() {
        return Err("Too many arguments".to_string());
    }

    Ok(CliArgs {
        input,
        output,
        config,
        log_file,
        pretty,
        dump_tree,
    })
}

fn run(args: &CliArgs, config: NormalizerConfig) -> NormalizeResult<()> {
    let normalizer = Normalizer::new(config)?;

    let mut sheet = normalizer.load(&args.input)?;
    normalizer.normalize(&mut sheet);

    if args.dump_tree {
        print_tree_to_stdout(&sheet);
    }

    let css = normalizer.render(&sheet)?;
    match &args.output {
        Some(path) => {
            fs::write(path, css).with_path(path)?;
            info!("Wrote {}", path.display());
        }
        None if !args.dump_tree => print!("{}", css),
        None => {}
    }

    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("css_normalizer");

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            // Use eprintln for usage info since logger isn't initialized yet
            eprintln!("{}", message);
            print_usage(program);
            process::exit(1);
        }
    };

    let mut config = match NormalizerConfig::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    if cli.pretty {
        config.pretty = true;
    }
    if cli.log_file.is_some() {
        config.log_file = cli.log_file.clone();
    }

    let level = match config.level_filter() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    if let Err(e) = logging::init_logger(config.log_file.as_deref(), level) {
        eprintln!("Failed to initialize logger: {}", e);
        process::exit(1);
    }

    info!("CSS normalizer starting");
    info!("Command line arguments: {:?}", args);

    if let Err(e) = run(&cli, config) {
        error!("Normalization of {} failed: {}", cli.input.display(), e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
