use clap::Parser;
use pjctl::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pjctl=info,pjlink=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut endpoint = pjlink::Endpoint::new(args.host.as_str(), args.password.as_str())?
        .with_port(args.port);
    if let Some(ms) = args.timeout {
        endpoint = endpoint.with_timeout(std::time::Duration::from_millis(ms));
    }
    let client = pjlink::Client::new(endpoint);

    tracing::debug!(endpoint = %client.endpoint(), cmd = ?args.cmd, "running");
    let report = run(&client, &args.cmd).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    if let Report::Authenticated(false) = report {
        std::process::exit(1);
    }

    Ok(())
}
