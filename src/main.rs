extern crate maskfill;

use log::{info, warn};
use maskfill::io::{read_image, read_mask, write_output, FitsSnapshots};
use maskfill::{fill_with_snapshots, FillConfig, MaskFillError, NoSnapshots, Operator, Result};
use std::env;

const USAGE: &str = "usage: maskfill INPUT MASK OUTPUT [options]

Fill masked pixels (mask: 0 = good, 1 = bad) by iterated mean/median of their neighbours.

options:
  -e, --extension N   fits extension of data (default 0)
  -s, --size N        window size of the filter (default 3)
  -o, --operator OP   replace pixels with mean or median (default median)
  -n, --nosmooth      omit boxcar smoothing at the end
  -w, --writesteps    write result after each iteration, as _iter_#.fits
  -v, --verbose       print actions
  -h, --help          show this message
  -V, --version       show the version";

#[derive(Debug)]
struct Args {
    input: String,
    mask: String,
    output: String,
    extension: usize,
    config: FillConfig,
}

fn value<I>(flag: &str, it: &mut I) -> Result<String>
where
    I: Iterator<Item = String>,
{
    it.next()
        .ok_or_else(|| MaskFillError::Usage(format!("{} needs a value\n\n{}", flag, USAGE)))
}

fn number(flag: &str, raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| MaskFillError::Usage(format!("{} expects an integer, got {:?}", flag, raw)))
}

fn parse_args<I>(args: I) -> Result<Option<Args>>
where
    I: IntoIterator<Item = String>,
{
    let mut it = args.into_iter();
    let mut positional = Vec::new();
    let mut extension = 0;
    let mut size = None;
    let mut operator = None;
    let mut config = FillConfig::default();

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("maskfill {}", maskfill::VERSION);
                return Ok(None);
            }
            "-e" | "--extension" => extension = number(&arg, &value(&arg, &mut it)?)?,
            "-s" | "--size" => size = Some(number(&arg, &value(&arg, &mut it)?)?),
            "-o" | "--operator" => operator = Some(value(&arg, &mut it)?),
            "-n" | "--nosmooth" => config.smooth = false,
            "-w" | "--writesteps" => config.writesteps = true,
            "-v" | "--verbose" => config.verbose = true,
            s if s.starts_with('-') && s.len() > 1 => {
                return Err(MaskFillError::Usage(format!(
                    "unknown option {}\n\n{}",
                    s, USAGE
                )))
            }
            other => positional.push(other.to_string()),
        }
    }

    if positional.len() != 3 {
        return Err(MaskFillError::Usage(USAGE.to_string()));
    }

    // lenient: bad values fall back to the defaults
    if let Some(size) = size {
        let candidate = config.clone().with_size(size);
        match candidate.validate() {
            Ok(()) => config = candidate,
            Err(e) => warn!("{}; using size {}", e, config.size),
        }
    }
    if let Some(op) = operator {
        match op.parse::<Operator>() {
            Ok(op) => config.operator = op,
            Err(e) => warn!("{}; using {}", e, config.operator),
        }
    }

    let mut positional = positional.into_iter();
    Ok(Some(Args {
        input: positional.next().unwrap_or_default(),
        mask: positional.next().unwrap_or_default(),
        output: positional.next().unwrap_or_default(),
        extension,
        config,
    }))
}

fn run(args: Args) -> Result<()> {
    info!("filling masked regions in image {}", args.input);
    info!("size of filter = {}", args.config.size);
    info!("operation for replacing pixels = {}", args.config.operator);

    let image = read_image(&args.input, args.extension)?;
    let mask = read_mask(&args.mask, args.extension)?;

    let result = if args.config.writesteps {
        let mut sink = FitsSnapshots::new(".");
        fill_with_snapshots(image.view(), mask.view(), &args.config, &mut sink)?
    } else {
        fill_with_snapshots(image.view(), mask.view(), &args.config, &mut NoSnapshots)?
    };

    write_output(&args.output, &result)?;
    info!("output written to: {}", args.output);
    Ok(())
}

fn main() {
    let raw: Vec<String> = env::args().skip(1).collect();
    let verbose = raw.iter().any(|a| a == "-v" || a == "--verbose");
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let parsed = parse_args(raw);
    let outcome = match parsed {
        Ok(Some(args)) => run(args),
        Ok(None) => Ok(()),
        Err(e) => Err(e),
    };
    if let Err(err) = outcome {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
