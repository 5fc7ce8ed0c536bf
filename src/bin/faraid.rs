//! Estate distribution from the command line.
//!
//! ```text
//! faraid [--doctrine NAME] [--json] HEIR=COUNT...
//! faraid [--doctrine NAME] [--json] --case '{"wife":1,"son":1}'
//! ```
//!
//! Without `--doctrine` the doctrine comes from `ALICE_FARAID_DOCTRINE`,
//! falling back to Shafii. Logs go to stderr, filtered by `RUST_LOG`.

use anyhow::{bail, Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use alice_faraid::{Calculator, CalculatorConfig, Case, Doctrine, HeirClass};

struct Options {
    doctrine: Option<Doctrine>,
    json: bool,
    case_json: Option<String>,
    counts: Vec<(HeirClass, u32)>,
}

fn print_usage() {
    eprintln!("Usage: faraid [--doctrine NAME] [--json] HEIR=COUNT...");
    eprintln!("       faraid [--doctrine NAME] [--json] --case JSON");
    eprintln!();
    eprintln!("  --doctrine NAME  hanafi, maliki, shafii or hanbali");
    eprintln!("  --json           print the distribution as JSON");
    eprintln!("  --case JSON      head-counts as a JSON object");
    eprintln!();
    eprintln!("Heirs: {}", heir_names());
}

fn heir_names() -> String {
    HeirClass::ALL
        .iter()
        .map(|h| h.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_count(token: &str) -> Result<(HeirClass, u32)> {
    let (name, count) = token
        .split_once('=')
        .with_context(|| format!("expected HEIR=COUNT, got {token:?}"))?;
    let heir: HeirClass = name.parse()?;
    let count: u32 = count
        .trim()
        .parse()
        .with_context(|| format!("invalid count for {heir}: {count:?}"))?;
    Ok((heir, count))
}

/// `Ok(None)` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut opts = Options {
        doctrine: None,
        json: false,
        case_json: None,
        counts: Vec::new(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--doctrine" => {
                i += 1;
                let name = args.get(i).context("--doctrine needs a value")?;
                opts.doctrine = Some(name.parse()?);
            }
            "--case" => {
                i += 1;
                let json = args.get(i).context("--case needs a JSON object")?;
                opts.case_json = Some(json.clone());
            }
            "--json" => {
                opts.json = true;
            }
            "--help" | "-h" => return Ok(None),
            other if other.starts_with("--") => bail!("unknown argument: {other}"),
            other => opts.counts.push(parse_count(other)?),
        }
        i += 1;
    }

    if opts.case_json.is_some() && !opts.counts.is_empty() {
        bail!("--case cannot be combined with HEIR=COUNT arguments");
    }
    Ok(Some(opts))
}

fn run(opts: Options) -> Result<()> {
    let config = match opts.doctrine {
        Some(doctrine) => CalculatorConfig::new(doctrine),
        None => CalculatorConfig::from_env().context("reading doctrine from environment")?,
    };
    let calculator = Calculator::new(config);

    let case = match &opts.case_json {
        Some(json) => Case::from_json(json)?,
        None => Case::from_counts(opts.counts)?,
    };
    debug!(doctrine = %calculator.doctrine(), heirs = case.present().count(), "computing");

    let dist = calculator.compute_case(&case)?;
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&dist)?);
    } else {
        println!("{dist}");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    match parse_args(&args)? {
        Some(opts) => run(opts),
        None => {
            print_usage();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        std::iter::once("faraid")
            .chain(tokens.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_counts_and_flags() {
        let opts = parse_args(&argv(&["--doctrine", "hanafi", "--json", "wife=1", "son=2"]))
            .unwrap()
            .unwrap();
        assert_eq!(opts.doctrine, Some(Doctrine::Hanafi));
        assert!(opts.json);
        assert_eq!(opts.counts, vec![(HeirClass::Wife, 1), (HeirClass::Son, 2)]);
    }

    #[test]
    fn test_parse_rejects_bad_tokens() {
        assert!(parse_args(&argv(&["wife"])).is_err());
        assert!(parse_args(&argv(&["aunt=1"])).is_err());
        assert!(parse_args(&argv(&["son=many"])).is_err());
        assert!(parse_args(&argv(&["--doctrine"])).is_err());
        assert!(parse_args(&argv(&["--verbose"])).is_err());
        assert!(parse_args(&argv(&["--case", "{}", "son=1"])).is_err());
    }

    #[test]
    fn test_help() {
        assert!(parse_args(&argv(&["--help"])).unwrap().is_none());
    }
}
