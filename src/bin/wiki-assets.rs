use std::process;

fn init_logging(verbosity: u8) {
    let log_filter = match verbosity {
        0 => "warn",
        1 => "warn,wiki_assets=info",
        2 => "warn,wiki_assets=debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter))
        .format_module_path(false)
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() {
    #[cfg(feature = "cli")]
    {
        use wiki_assets::cli;

        let args = match cli::parse_args(std::env::args().skip(1)) {
            Ok(args) => args,
            Err(e) => {
                eprintln!("Error: {e}");
                cli::print_usage();
                process::exit(2);
            }
        };

        if args.help {
            cli::print_usage();
            process::exit(0);
        }

        init_logging(args.verbosity);

        // Residual download failures still exit 0; only setup errors fail the run.
        if let Err(e) = cli::run(&args).await {
            log::error!("run failed: {e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
    #[cfg(not(feature = "cli"))]
    {
        init_logging(0);
        eprintln!("CLI support not compiled in");
        process::exit(1);
    }
}
