//! `provider` — run data-provider operations from the command line.
//!
//! Configuration comes from flags, falling back to the same environment
//! variables `ProviderConfig::from_env` reads. Results print to stdout as
//! pretty JSON; logs go to stderr under `RUST_LOG`.

use clap::{Args, Parser, Subcommand};
use provider_core::config::{API_TOKEN_VAR, MOCK_DATA_VAR, MOCK_URL_VAR, REST_URL_VAR};
use provider_core::{
    DataProvider, Filter, HttpDataProvider, Identifier, ListParams, Pagination, ProviderConfig,
    ProviderError, ReferenceParams, Sort,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "provider", version, about = "Query a Spring-style REST backend")]
struct Cli {
    /// Use the mock-fixture layout (same as MOCK_DATA=true)
    #[arg(long)]
    mock: bool,

    /// Live REST base URL [env: REST_URL]
    #[arg(long)]
    rest_url: Option<String>,

    /// Mock-fixture base URL [env: MOCK_URL]
    #[arg(long)]
    mock_url: Option<String>,

    /// Bearer token [env: API_TOKEN]
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct PageArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    #[arg(long, default_value_t = 10)]
    per_page: u32,

    /// Sort as `field,ASC|DESC`
    #[arg(long, default_value = "id,ASC")]
    sort: Sort,

    /// Filter as `key=value`; the value is parsed as JSON when it can be
    #[arg(long = "filter", value_parser = parse_filter)]
    filters: Vec<(String, Value)>,
}

impl PageArgs {
    fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }

    fn filter(&self) -> Filter {
        self.filters.iter().cloned().collect()
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a page of records
    List {
        resource: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Fetch one record
    Get { resource: String, id: Identifier },
    /// Fetch several records by id
    GetMany {
        resource: String,
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<Identifier>,
    },
    /// List records whose `target` field equals `id`
    References {
        resource: String,
        #[arg(long)]
        target: String,
        #[arg(long)]
        id: Identifier,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Create a record from a JSON object
    Create {
        resource: String,
        #[arg(long, value_parser = parse_json)]
        data: Value,
    },
    /// Patch one record
    Update {
        resource: String,
        id: Identifier,
        #[arg(long, value_parser = parse_json)]
        data: Value,
    },
    /// Patch several records
    UpdateMany {
        resource: String,
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<Identifier>,
        #[arg(long, value_parser = parse_json)]
        data: Value,
    },
    /// Delete one record
    Delete { resource: String, id: Identifier },
    /// Delete several records
    DeleteMany {
        resource: String,
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<Identifier>,
    },
}

impl Cli {
    /// Flags first, then whatever `lookup` yields for the environment keys.
    fn config_with<F>(&self, lookup: F) -> Result<ProviderConfig, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        ProviderConfig::from_lookup(|key| match key {
            MOCK_DATA_VAR if self.mock => Some("true".to_string()),
            REST_URL_VAR => self.rest_url.clone().or_else(|| lookup(key)),
            MOCK_URL_VAR => self.mock_url.clone().or_else(|| lookup(key)),
            API_TOKEN_VAR => self.token.clone().or_else(|| lookup(key)),
            _ => lookup(key),
        })
    }
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|e| format!("invalid JSON: {e}"))
}

fn parse_filter(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    if key.is_empty() {
        return Err("filter key must not be empty".to_string());
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

fn run<P: DataProvider>(provider: &P, command: Command) -> Result<Value, ProviderError> {
    match command {
        Command::List { resource, page } => {
            let params = ListParams {
                pagination: page.pagination(),
                filter: page.filter(),
                sort: page.sort,
            };
            to_json(provider.get_list(&resource, &params)?)
        }
        Command::Get { resource, id } => to_json(provider.get_one(&resource, &id)?),
        Command::GetMany { resource, ids } => to_json(provider.get_many(&resource, &ids)?),
        Command::References {
            resource,
            target,
            id,
            page,
        } => {
            let params = ReferenceParams {
                target,
                id,
                pagination: page.pagination(),
                filter: page.filter(),
                sort: page.sort,
            };
            to_json(provider.get_many_reference(&resource, &params)?)
        }
        Command::Create { resource, data } => to_json(provider.create(&resource, &data)?),
        Command::Update { resource, id, data } => {
            to_json(provider.update(&resource, &id, &data)?)
        }
        Command::UpdateMany {
            resource,
            ids,
            data,
        } => to_json(provider.update_many(&resource, &ids, &data)?),
        Command::Delete { resource, id } => to_json(provider.delete(&resource, &id)?),
        Command::DeleteMany { resource, ids } => to_json(provider.delete_many(&resource, &ids)?),
    }
}

fn to_json<T: serde::Serialize>(result: T) -> Result<Value, ProviderError> {
    serde_json::to_value(result).map_err(|e| ProviderError::Serialization(e.to_string()))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = cli
        .config_with(|key| std::env::var(key).ok())
        .and_then(|config| {
            tracing::debug!(mode = ?config.mode, base_url = %config.base_url, "configured");
            run(&HttpDataProvider::new(config), cli.command)
        });

    match result.and_then(|value| {
        serde_json::to_string_pretty(&value).map_err(|e| ProviderError::Serialization(e.to_string()))
    }) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
