use clap::Parser;
use log::info;
use readme_stats::api::Error;
use readme_stats_app::Args;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init();
    let args = Args::parse();
    let json = args.json;

    let stats = readme_stats_app::github_stats(args).await?;
    info!("Stats origin: {}", stats.origin);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats.snapshot).map_err(|err| Error::Other(err.into()))?);
    } else {
        println!("{}", stats.snapshot);
    }

    Ok(())
}
