//! `net-validators` command line.
//!
//! Runs one network check per invocation and prints the outcome. The exit
//! status carries the result: 0 valid, 1 invalid, 2 indeterminate, 3 usage or
//! configuration error.

use clap::{Parser, Subcommand};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use net_validators::config::{Config, OutputFormat};
use net_validators::models::parse_address_or_block;
use net_validators::output::{self, Report};
use net_validators::processing::{find_all_overlaps, log_overlaps, PublicIpOptions};
use net_validators::{parse_cidr, NetworkChecks, Outcome, ValidationError, Value};
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

const EXIT_VALID: u8 = 0;
const EXIT_INVALID: u8 = 1;
const EXIT_INDETERMINATE: u8 = 2;
const EXIT_USAGE: u8 = 3;

#[derive(Parser)]
#[command(name = "net-validators")]
#[command(about = "Validate IP addresses and CIDR blocks")]
struct Cli {
    /// Output format (text, json), overrides NETVAL_OUTPUT
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that no two CIDR blocks share an address
    Overlap {
        /// CIDR blocks, e.g. 10.0.0.0/8
        cidrs: Vec<String>,
    },
    /// Check that an address or block is private (RFC 1918 or ULA)
    Private { ip: String },
    /// Check that an address or block is publicly routable
    Public {
        ip: String,
        /// Treat link-local space as not public
        #[arg(long)]
        exclude_link_local: bool,
        /// Treat reserved, multicast and documentation space as not public
        #[arg(long)]
        exclude_reserved: bool,
    },
    /// Check that the prefix length of a block lies within bounds
    RangeSize {
        cidr: String,
        /// Smallest allowed prefix length
        #[arg(long, allow_negative_numbers = true)]
        min: i64,
        /// Largest allowed prefix length
        #[arg(long, allow_negative_numbers = true)]
        max: i64,
    },
    /// Check that a block is written as its network address
    Subnet { cidr: String },
    /// Print the classification label of an address or block
    Classify { ip: String },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("net-validators: {e}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(cli: Cli) -> Result<u8, Box<dyn Error>> {
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    init_logging(&config.log_config)?;
    log::info!("#Start main()");

    let format = cli.format.unwrap_or(config.output);
    let checks = NetworkChecks::new(config.classifier());

    let (check, inputs) = match &cli.command {
        Commands::Overlap { cidrs } => ("overlap", cidrs.clone()),
        Commands::Private { ip } => ("private", vec![ip.clone()]),
        Commands::Public { ip, .. } => ("public", vec![ip.clone()]),
        Commands::RangeSize { cidr, .. } => ("range-size", vec![cidr.clone()]),
        Commands::Subnet { cidr } => ("subnet", vec![cidr.clone()]),
        Commands::Classify { ip } => ("classify", vec![ip.clone()]),
    };

    let mut overlaps = vec![];
    let mut label = None;
    let outcome = match cli.command {
        Commands::Overlap { cidrs } => {
            let list: Vec<Value<String>> = cidrs.into_iter().map(Value::Known).collect();
            let outcome = checks.cidr_overlap(Value::Known(&list[..]));
            if let Outcome::Invalid(ValidationError::OverlapDetected(_)) = outcome {
                let blocks = inputs
                    .iter()
                    .map(|s| parse_cidr(s))
                    .collect::<Result<Vec<_>, _>>()?;
                overlaps = find_all_overlaps(&blocks);
                log_overlaps(&overlaps);
            }
            outcome
        }
        Commands::Private { ip } => checks.private_ip(Value::Known(ip.as_str())),
        Commands::Public {
            ip,
            exclude_link_local,
            exclude_reserved,
        } => checks.public_ip(
            Value::Known(ip.as_str()),
            PublicIpOptions {
                exclude_link_local,
                exclude_reserved,
            },
        ),
        Commands::RangeSize { cidr, min, max } => {
            checks.ip_range_size(
                Value::Known(cidr.as_str()),
                Value::Known(min),
                Value::Known(max),
            )
        }
        Commands::Subnet { cidr } => checks.subnet(Value::Known(cidr.as_str())),
        Commands::Classify { ip } => match parse_address_or_block(&ip) {
            Ok(block) => {
                label = Some(checks.classifier().classify_block(&block));
                Outcome::Valid
            }
            Err(e) => Outcome::Invalid(e.into()),
        },
    };
    log::debug!("{check} {inputs:?} -> {outcome:?}");

    let mut report = Report::new(check, inputs, &outcome);
    report.overlaps = overlaps;
    report.label = label;
    println!("{}", output::render(&report, format)?);

    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &Outcome) -> u8 {
    match outcome {
        Outcome::Valid => EXIT_VALID,
        Outcome::Invalid(_) => EXIT_INVALID,
        Outcome::Indeterminate => EXIT_INDETERMINATE,
    }
}

/// Initialise log4rs from `path`, or log warnings to stderr when it is missing.
fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        log4rs::init_file(path, Default::default())?;
        return Ok(());
    }

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {t} - {m}{n}")))
        .build();
    let config = LogConfig::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    Ok(())
}
