//! Spamfinder CLI
//!
//! Drives the spam search the way a host form would: form values go in as
//! `(field, value)` pairs, SQL or results come out on stdout.
//!
//! Usage:
//!   spamfinder form
//!   spamfinder sql --option 8 --min-length 4 --max-length 4
//!   spamfinder count --option 2 --blank-names
//!   spamfinder list --option 10 --offset 0 --limit 50 --sort "last_name desc"

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use spamfinder_search::{logging, Config, CustomSearch, MySqlExecutor, SortOrder, SpamSearch};

#[derive(Parser, Debug)]
#[command(name = "spamfinder")]
#[command(about = "Find likely spam and badly formatted contact records")]
struct Cli {
    /// Configuration file (defaults to ./spamfinder.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the search form definition as JSON
    Form,
    /// Print the listing and count SQL for the given filters
    Sql {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
        /// Select only the contact id column
        #[arg(long)]
        ids_only: bool,
    },
    /// Count matching contacts
    Count {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List one page of matching contacts as JSON lines
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Heuristic (1-10)
    #[arg(short = 'o', long = "option")]
    spam_option: Option<String>,

    #[arg(long)]
    min_length: Option<String>,

    #[arg(long)]
    max_length: Option<String>,

    /// Contact records added since (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,

    /// Only contacts with an id greater than this
    #[arg(long)]
    min_contact_id: Option<String>,

    /// Skip contacts whose first or last name is blank
    #[arg(long)]
    blank_names: bool,

    /// Restrict to these contact ids (comma separated)
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Raw form field, `name=value` (repeatable)
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

#[derive(Args, Debug)]
struct PageArgs {
    #[arg(long, default_value_t = 0)]
    offset: i64,

    /// Rows per page; 0 means no limit
    #[arg(long, default_value_t = 0)]
    limit: i64,

    /// Sort column, e.g. `last_name desc` or `-postcode`
    #[arg(long)]
    sort: Option<String>,
}

impl PageArgs {
    fn sort_order(&self) -> Result<Option<SortOrder>> {
        self.sort
            .as_deref()
            .map(SortOrder::parse)
            .transpose()
            .context("Invalid --sort")
    }
}

impl FilterArgs {
    /// Form items in the order the host would submit them.
    fn to_items(&self) -> Vec<(String, String)> {
        let mut items = Vec::new();
        let mut push = |key: &str, value: Option<&String>| {
            if let Some(v) = value {
                items.push((key.to_string(), v.clone()));
            }
        };
        push("spam_options", self.spam_option.as_ref());
        push("min_length", self.min_length.as_ref());
        push("max_length", self.max_length.as_ref());
        push("start_date", self.start_date.as_ref());
        push("min_contact_id", self.min_contact_id.as_ref());
        if self.blank_names {
            items.push(("blank_names".to_string(), "1".to_string()));
        }
        for id in &self.select {
            items.push((format!("mark_x_{}", id.trim()), "1".to_string()));
        }
        items.extend(self.fields.iter().cloned());
        items
    }
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    let build = |filters: &FilterArgs| {
        SpamSearch::from_items(&filters.to_items(), config.search.acl_provider())
            .with_settings(config.search.settings())
    };

    match &cli.command {
        Command::Form => {
            let search = SpamSearch::from_items(&[], config.search.acl_provider());
            println!("{}", serde_json::to_string_pretty(&search.build_form())?);
        }
        Command::Sql {
            filters,
            page,
            ids_only,
        } => {
            let search = build(filters);
            let sort = page.sort_order()?;
            println!(
                "{};",
                search.all(page.offset, page.limit, sort, search.has_selection(), *ids_only)
            );
            println!("{};", search.count_sql());
        }
        Command::Count { filters } => {
            let executor = connect(&config).await?;
            let total = build(filters).count(&executor).await?;
            println!("{}", total);
        }
        Command::List { filters, page } => {
            let executor = connect(&config).await?;
            let search = build(filters);
            let sort = page.sort_order()?;
            let rows = search
                .rows(&executor, page.offset, page.limit, sort, search.has_selection())
                .await?;
            tracing::info!(rows = rows.len(), "Listing complete");
            for row in rows {
                println!("{}", serde_json::to_string(&row)?);
            }
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<MySqlExecutor> {
    config
        .validate_database()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    MySqlExecutor::connect(&config.database)
        .await
        .context("Failed to connect to database")
}
