#![allow(missing_docs, clippy::print_stdout)]
use anyhow::{Context, Result};
use reqmodel_core::RequestModel;
use tracing::{info, warn};

use health_check::HealthCheckRequest;

fn main() -> Result<()> {
    tracing_subscriber::fmt().pretty().init();

    let AppArgs { request, dry_run } = AppArgs::parse().context("parsing arguments")?;

    let built = request.as_request().context("building the health check request")?;
    info!(url = %built.url, "health check request built");

    if dry_run {
        println!("{} {}", built.method, built.url);
        for (name, value) in built.to_header_map()?.iter() {
            println!("{name}: {}", value.to_str().unwrap_or("<binary>"));
        }
        return Ok(());
    }

    let client = reqwest::blocking::Client::new();
    let health = request.send(&client).context("checking health")?;
    println!("{health:#?}");

    info!("Bye!");
    Ok(())
}

#[derive(Debug)]
struct AppArgs {
    request: HealthCheckRequest,
    dry_run: bool,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        let mut pargs = pico_args::Arguments::from_env();

        let dry_run = pargs.contains("--dry-run");

        let search: Option<String> = pargs
            .opt_value_from_str(["-s", "--search"])
            .context("parsing search argument")?;

        let version: Option<String> = pargs
            .opt_value_from_str(["-v", "--version"])
            .context("parsing version argument")?;

        let page: Option<String> = pargs
            .opt_value_from_str(["-p", "--page"])
            .context("parsing page argument")?;

        let accept: Option<String> = pargs
            .opt_value_from_str("--accept")
            .context("parsing accept argument")?;

        let mut request = HealthCheckRequest::new(
            search.unwrap_or_else(|| "xyz".to_string()),
            version.unwrap_or_else(|| "v1".to_string()),
            page.unwrap_or_else(|| "health".to_string()),
        );
        if let Some(accept) = accept {
            request = request.with_accept(accept);
        }

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            warn!(?remaining, "Warning: unused arguments left");
        }
        Ok(Self { request, dry_run })
    }
}
