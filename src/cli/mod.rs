//! CLI mode: reconcile one image set against the wiki.

mod progress;

use std::path::PathBuf;

use crate::{
    AliasTable, AppConfig, Error, FetchJob, MediaWikiClient, Mode, Result, RunReport,
    TokioFileSystem, load_missing,
};

use progress::{CliProgress, print_summary};

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub mode: Mode,
    pub config: Option<PathBuf>,
    pub verbosity: u8,
    pub help: bool,
}

/// Prints usage to stderr.
pub fn print_usage() {
    eprintln!("Usage: wiki-assets [items|materials] [OPTIONS]");
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  items               Fetch item images (default)");
    eprintln!("  materials           Fetch material images");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <PATH>     Config file (default: <config dir>/wiki-assets/config.toml)");
    eprintln!("  -v, --verbose       More logging; repeat for more");
    eprintln!("  -h, --help          Show this help");
}

/// Parses arguments (without the program name).
///
/// # Errors
///
/// Returns [`Error::UnknownMode`] for an unrecognised mode and
/// [`Error::Usage`] for bad options.
pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut mode_seen = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| Error::Usage("--config requires a value".into()))?;
                parsed.config = Some(PathBuf::from(path));
            }
            "-v" | "--verbose" => parsed.verbosity = parsed.verbosity.saturating_add(1),
            "-vv" => parsed.verbosity = parsed.verbosity.saturating_add(2),
            flag if flag.starts_with('-') => {
                return Err(Error::Usage(format!("unknown option: {flag}")));
            }
            mode => {
                if mode_seen {
                    return Err(Error::Usage(format!("unexpected argument: {mode}")));
                }
                parsed.mode = mode.parse()?;
                mode_seen = true;
            }
        }
    }

    Ok(parsed)
}

/// Runs one reconciliation pass for the selected mode.
///
/// Residual failures are reported, not returned as an error.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, the needed list is
/// missing, or the output directory cannot be created.
pub async fn run(args: &CliArgs) -> Result<RunReport> {
    let config = AppConfig::load(args.config.as_deref())?;
    let paths = config.paths.for_mode(args.mode);
    let fs = TokioFileSystem::new();

    let missing = load_missing(&fs, &paths.list, &paths.out_dir).await?;
    println!("Missing {}: {}", args.mode, missing.len());

    let aliases = AliasTable::builtin().with_overrides(config.aliases.clone());
    log::debug!("{} alias entries", aliases.len());

    let client = MediaWikiClient::new(&config.fetch)?;
    let progress = CliProgress::new(missing.len().div_ceil(config.fetch.batch_size));

    let report = FetchJob::new(&client, &fs, &config.fetch, &aliases)
        .run(&missing, &paths.out_dir, &progress)
        .await?;
    progress.finish();

    print_summary(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn defaults_to_items() {
        let parsed = parse_args(args(&[])).unwrap();
        assert_eq!(parsed.mode, Mode::Items);
        assert_eq!(parsed.config, None);
        assert!(!parsed.help);
    }

    #[test]
    fn parses_mode_and_options() {
        let parsed = parse_args(args(&["materials", "--config", "wiki.toml", "-v"])).unwrap();
        assert_eq!(parsed.mode, Mode::Materials);
        assert_eq!(parsed.config, Some(PathBuf::from("wiki.toml")));
        assert_eq!(parsed.verbosity, 1);
    }

    #[test]
    fn verbosity_stacks() {
        assert_eq!(parse_args(args(&["-v", "-v", "-v"])).unwrap().verbosity, 3);
        assert_eq!(parse_args(args(&["-vv"])).unwrap().verbosity, 2);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(matches!(
            parse_args(args(&["foods"])),
            Err(Error::UnknownMode(m)) if m == "foods"
        ));
    }

    #[test]
    fn config_needs_value() {
        assert!(matches!(parse_args(args(&["--config"])), Err(Error::Usage(_))));
    }

    #[test]
    fn unknown_flag_and_extra_positional() {
        assert!(matches!(parse_args(args(&["--force"])), Err(Error::Usage(_))));
        assert!(matches!(
            parse_args(args(&["items", "materials"])),
            Err(Error::Usage(_))
        ));
    }

    #[test]
    fn help_flag() {
        assert!(parse_args(args(&["--help"])).unwrap().help);
    }

    #[tokio::test]
    async fn missing_list_is_setup_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        let list = dir.path().join("nope.txt");
        std::fs::write(
            &config_path,
            format!(
                "[paths.items]\nlist = {:?}\nout_dir = {:?}\n",
                list.display().to_string(),
                dir.path().join("out").display().to_string()
            ),
        )
        .unwrap();

        let parsed = CliArgs {
            config: Some(config_path),
            ..CliArgs::default()
        };
        let err = run(&parsed).await.unwrap_err();
        assert!(matches!(err, Error::ListNotFound { path } if path == list));
    }
}
