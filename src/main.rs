use clap::Parser;
use pr_sorter::Digest;
use std::process::ExitCode;
use std::time::Duration;

mod args;
use args::{Args, convert_format, convert_scan_order, convert_taxonomy};

/// Exit status when `--strict` is set and collection ended early
const EXIT_INCOMPLETE: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let digest = match build_digest(&args) {
        Ok(digest) => digest,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();
    let outcome = match digest.run(convert_format(args.format)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            ::log::error!("Run failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print!("{}", outcome.rendered);

    ::log::info!(
        "Reported {} pull requests in {:.2} seconds",
        outcome.total,
        start_time.elapsed().as_secs_f64()
    );

    ExitCode::from(exit_status(args.strict, outcome.is_complete()))
}

/// Exit status for a finished run
fn exit_status(strict: bool, complete: bool) -> u8 {
    if strict && !complete {
        ::log::error!("Collection ended early and --strict is set");
        return EXIT_INCOMPLETE;
    }
    0
}

/// Start from the config file (if any) and apply command-line overrides
fn build_digest(args: &Args) -> pr_sorter::Result<Digest> {
    let mut digest = match &args.config {
        Some(path) => Digest::default().with_config_file(path)?,
        None => Digest::default(),
    };

    if let Some(repo) = &args.repo {
        digest = digest.with_repo(repo);
    }
    if let Some(label) = &args.label {
        digest = digest.with_label(label);
    }
    if let Some(token) = &args.token {
        digest = digest.with_token(token);
    }
    if let Some(taxonomy) = args.taxonomy {
        digest = digest.with_taxonomy(convert_taxonomy(taxonomy));
    }
    if let Some(order) = args.scan_order {
        digest = digest.with_scan_order(convert_scan_order(order));
    }
    if let Some(per_page) = args.per_page {
        digest = digest.with_per_page(per_page);
    }
    if let Some(delay_ms) = args.delay_ms {
        digest = digest.with_delay(Duration::from_millis(delay_ms));
    }
    if let Some(api_base) = &args.api_base {
        digest = digest.with_api_base(api_base);
    }

    Ok(digest)
}
