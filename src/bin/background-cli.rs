use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "background-cli")]
#[command(about = "Management CLI for the page background service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key
    #[arg(short, long, env = "PAGE_BACKGROUND_API_KEY", default_value = "")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status and record counts
    Status,
    /// Resolve the background for a page
    Resolve {
        /// Navigation path, e.g. /c/cosmetics
        #[arg(long)]
        path: String,
        /// Viewport width in logical pixels
        #[arg(long)]
        width: Option<u32>,
        /// Category slug of the page's entity
        #[arg(long, conflicts_with = "product")]
        category: Option<String>,
        /// Product slug of the page's entity
        #[arg(long)]
        product: Option<String>,
    },
    /// List route background rules, inactive included
    Routes,
    /// Show the site default background
    SiteDefault,
    /// Delete a route background rule
    DeleteRoute { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if !cli.key.is_empty() {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", cli.key))?);
    }

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/admin/status", cli.url)).headers(headers).send().await?,
        Commands::Resolve {
            path,
            width,
            category,
            product,
        } => {
            let mut query = vec![("path", path)];
            if let Some(width) = width {
                query.push(("width", width.to_string()));
            }
            if let Some(category) = category {
                query.push(("category", category));
            }
            if let Some(product) = product {
                query.push(("product", product));
            }
            client
                .get(format!("{}/api/background", cli.url))
                .query(&query)
                .send()
                .await?
        }
        Commands::Routes => client.get(format!("{}/admin/routes", cli.url)).headers(headers).send().await?,
        Commands::SiteDefault => {
            client
                .get(format!("{}/admin/site-default", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::DeleteRoute { id } => {
            client
                .delete(format!("{}/admin/routes/{}", cli.url, id))
                .headers(headers)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("OK");
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
