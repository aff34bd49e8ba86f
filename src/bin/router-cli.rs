use clap::{Parser, Subcommand};
use reqwest::header::HeaderValue;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Management CLI for the substation router", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5002")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show sampled loads per substation
    Status,
    /// Check router liveness
    Health,
    /// Submit one work request
    Route {
        /// JSON payload (defaults to an empty object)
        #[arg(short, long)]
        payload: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/status", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Route { payload } => {
            let payload: Value = match payload {
                Some(text) => serde_json::from_str(&text)?,
                None => Value::Object(Default::default()),
            };
            client
                .post(format!("{}/route", base))
                .json(&payload)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let request_id = res
        .headers()
        .get("x-request-id")
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .map(str::to_string);

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    if !status.is_success() {
        eprintln!("Error: router returned status {}", status);
        if let Some(id) = request_id {
            eprintln!("Request ID: {}", id);
        }
    }
    Ok(())
}
