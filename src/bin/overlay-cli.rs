use clap::{Parser, Subcommand};
use reqwest::redirect::Policy;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "overlay-cli")]
#[command(about = "Inspect a running song-overlay server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show server health and configured routes
    Health,
    /// Show the track currently playing
    Current,
    /// Print the Spotify authorization URL
    Login,
    /// Check which view a path resolves to
    Resolve {
        /// Location path, e.g. "/"
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()?;
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/api/health", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Current => {
            let res = client
                .get(format!("{}/api/spotify-current-playing", base))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Login => {
            let res = client.get(format!("{}/api/login", base)).send().await?;
            match res.headers().get(reqwest::header::LOCATION) {
                Some(location) => println!("{}", location.to_str()?),
                None => print_response(res).await?,
            }
        }
        Commands::Resolve { path } => {
            let path = if path.starts_with('/') { path } else { format!("/{}", path) };
            let res = client.get(format!("{}{}", base, path)).send().await?;
            let status = res.status();
            if status.is_success() {
                let body = res.text().await?;
                let title = body
                    .split("<title>")
                    .nth(1)
                    .and_then(|rest| rest.split("</title>").next())
                    .unwrap_or("(untitled)");
                println!("{} -> {} \"{}\"", path, status, title);
            } else {
                println!("{} -> {}", path, status);
                print_response(res).await?;
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
    }
    Ok(())
}
