use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use user_search::{
    client::{SearchClient, SearchRequest, SearchResponse},
    query::OrderDirection,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Direction {
    Asc,
    Desc,
    AsIs,
}

impl From<Direction> for OrderDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => OrderDirection::Ascending,
            Direction::Desc => OrderDirection::Descending,
            Direction::AsIs => OrderDirection::AsIs,
        }
    }
}

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Config file providing `[client]` defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Server URL
    #[arg(long)]
    pub url: Option<String>,

    /// Access token
    #[arg(long)]
    pub token: Option<String>,

    /// Case-insensitive substring of name or about text
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Id, Age or Name
    #[arg(long, default_value = "")]
    pub order_field: String,

    #[arg(long, value_enum, default_value_t = Direction::AsIs)]
    pub order_by: Direction,

    #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
    pub limit: i64,

    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,

    /// Request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: FindArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let mut settings = config.client;

    if let Some(url) = args.url {
        settings.base_url = url;
    }
    if let Some(token) = args.token {
        settings.access_token = Some(token);
    }

    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| settings.timeout());

    let client = SearchClient::builder(settings.base_url.clone())
        .access_token(settings.access_token.clone())
        .timeout(timeout)
        .max_limit(settings.max_limit)
        .build()
        .context("Failed to create search client")?;

    let request = SearchRequest::new(args.limit)
        .with_offset(args.offset)
        .with_query(args.query)
        .with_order(args.order_field, args.order_by.into());

    let response = client
        .find_users(&request)
        .await
        .with_context(|| format!("Search against {} failed", settings.base_url))?;

    if args.json {
        print_json(&response)?;
    } else {
        print_table(&response, request.offset);
    }

    Ok(())
}

fn print_json(response: &SearchResponse) -> Result<()> {
    let body = serde_json::json!({
        "users": response.users,
        "next_page": response.next_page,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn print_table(response: &SearchResponse, offset: i64) {
    if response.users.is_empty() {
        println!("{}", "No matching users".yellow());
        return;
    }

    println!(
        "{}",
        format!("{:>6}  {:<24} {:>4}  {:<8}", "Id", "Name", "Age", "Gender").bold()
    );
    for user in &response.users {
        println!(
            "{:>6}  {:<24} {:>4}  {:<8}",
            user.id, user.name, user.age, user.gender
        );
    }

    println!();
    let shown = response.users.len() as i64;
    if response.next_page {
        println!(
            "{} more results; next page with --offset {}",
            "→".cyan(),
            offset + shown
        );
    } else {
        println!("{}", "End of results".green());
    }
}
