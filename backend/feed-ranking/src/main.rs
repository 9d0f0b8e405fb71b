use anyhow::{bail, Context, Result};
use feed_ranking::{FeedRequest, RankingConfig};
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Initialize tracing (stderr, stdout carries the response)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let CliArgs {
        path,
        with_breakdown,
    } = CliArgs::parse(std::env::args().skip(1))?;

    let config = RankingConfig::from_env().unwrap_or_else(|err| {
        warn!(error = %err, "Failed to read ranking config from env, using defaults");
        RankingConfig::default()
    });

    let request = match &path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
            FeedRequest::from_reader(BufReader::new(file))
        }
        None => FeedRequest::from_reader(io::stdin().lock()),
    }
    .context("failed to decode feed request")?;

    info!(
        source = path.as_deref().unwrap_or("stdin"),
        post_count = request.posts.len(),
        "Ranking feed request"
    );

    let response = request.rank(config, with_breakdown);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &response).context("failed to write response")?;
    writeln!(out)?;

    Ok(())
}

const USAGE: &str = "usage: feed-ranking [PATH] [--breakdown]";

/// `feed-ranking [PATH] [--breakdown]`; stdin when PATH is absent.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    path: Option<String>,
    with_breakdown: bool,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Self::default();
        for arg in args {
            match arg.as_str() {
                "--breakdown" => parsed.with_breakdown = true,
                flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
                _ if parsed.path.is_some() => {
                    bail!("only one request path may be given, got extra {}\n{}", arg, USAGE)
                }
                _ => parsed.path = Some(arg),
            }
        }
        Ok(parsed)
    }
}
