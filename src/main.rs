use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use colander_admin::api::{ApiClient, CreateOutcome, SaveOutcome, TaskOutcome, TaskSubmission};
use colander_admin::config::Config;
use colander_admin::logging;
use colander_admin::query::{Query, View};
use colander_admin::routes::Route;
use colander_admin::ui::runtime;

/// Terminal admin client for a Colander catalog backend.
#[derive(Parser)]
#[command(name = "colander-admin", version, about)]
struct Cli {
    /// Backend base URL, overriding the config file.
    #[arg(long)]
    base_url: Option<String>,

    /// Initial route for the UI, e.g. `/Vendor` or `/Listing/7`.
    #[arg(long)]
    route: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

/// One-shot operations that print JSON and exit instead of opening the UI.
#[derive(Subcommand)]
enum Command {
    /// Print a field summary of the schema definitions for a type.
    Schema { type_name: String },
    /// Print the records matching a JSON query.
    Filter {
        type_name: String,
        /// JSON query object, e.g. '{"eq": {"state": "NY"}}'.
        #[arg(default_value = "{}")]
        query: String,
        /// JSON view object shaping the response.
        #[arg(long, default_value = "{}")]
        view: String,
    },
    /// Print one record by id.
    Get { type_name: String, id: i64 },
    /// Create a record from a JSON object.
    Create { type_name: String, data: String },
    /// Update one record by id with a JSON object of fields.
    Update {
        type_name: String,
        id: i64,
        data: String,
    },
    /// Delete one record by id.
    Delete { type_name: String, id: i64 },
    /// Submit an extension action as a background task.
    Task {
        ext_id: i64,
        action: String,
        #[arg(default_value = "{}")]
        params: String,
    },
}

fn main() -> Result<()> {
    logging::init_tracing();

    let cli = Cli::parse();
    let mut config = Config::load().context("loading configuration")?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }

    match cli.command {
        Some(command) => run_oneshot(&config, command),
        None => {
            let route = match cli.route.as_deref() {
                Some(raw) => {
                    Route::parse(raw).with_context(|| format!("'{raw}' is not a valid route"))?
                }
                None => Route::Search,
            };
            runtime::run(config, route).context("running the terminal UI")?;
            Ok(())
        }
    }
}

fn run_oneshot(config: &Config, command: Command) -> Result<()> {
    let client = ApiClient::from_config(&config.api)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building async runtime")?;

    let output = runtime.block_on(execute(&client, command))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn execute(client: &ApiClient, command: Command) -> Result<Value> {
    match command {
        Command::Schema { type_name } => {
            let schemas = client.schema(&type_name).await?;
            let mut output = serde_json::Map::new();
            for (name, schema) in schemas.iter() {
                let fields: Vec<Value> = schema
                    .fields()
                    .iter()
                    .map(|field| {
                        json!({
                            "key": field.key,
                            "label": field.display_label(),
                            "required": field.required,
                        })
                    })
                    .collect();
                output.insert(name.clone(), json!({ "fields": fields }));
            }
            Ok(Value::Object(output))
        }
        Command::Filter {
            type_name,
            query,
            view,
        } => {
            let query = parse_json_arg("query", &query)?;
            let view = parse_json_arg("view", &view)?;
            let response = client
                .filter(&type_name, &Query::from_value(query), &View::from_value(view))
                .await?;
            Ok(json!({
                "total": response.total,
                "page": response.page,
                "pages": response.pages,
                "items": response.items,
            }))
        }
        Command::Get { type_name, id } => {
            let response = client
                .filter(&type_name, &Query::by_id(id), &View::new())
                .await?;
            match response.items.into_iter().next() {
                Some(item) => Ok(item),
                None => bail!("{type_name} #{id} not found"),
            }
        }
        Command::Create { type_name, data } => {
            let data = parse_json_arg("data", &data)?;
            match client.create(&type_name, &data).await? {
                CreateOutcome::Created(id) => Ok(json!({ "id": id })),
                CreateOutcome::Rejected(errors) => bail!("rejected: {}", json!(errors)),
            }
        }
        Command::Update {
            type_name,
            id,
            data,
        } => {
            let data = parse_json_arg("data", &data)?;
            let Some(map) = data.as_object() else {
                bail!("data must be a JSON object");
            };
            match client.update(&type_name, &Query::by_id(id), map).await? {
                SaveOutcome::Applied(body) => Ok(body),
                SaveOutcome::Rejected(errors) => bail!("rejected: {}", json!(errors)),
            }
        }
        Command::Delete { type_name, id } => {
            client.delete(&type_name, &Query::by_id(id)).await?;
            Ok(json!({ "deleted": id }))
        }
        Command::Task {
            ext_id,
            action,
            params,
        } => {
            let params = parse_json_arg("params", &params)?;
            let submission = TaskSubmission {
                ext_id,
                action,
                params,
            };
            match client.submit_task(&submission).await? {
                TaskOutcome::Accepted { message_id } => Ok(json!({ "message_id": message_id })),
                TaskOutcome::Rejected(errors) => bail!("rejected: {}", json!(errors)),
            }
        }
    }
}

fn parse_json_arg(name: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("'{name}' is not valid JSON: {raw}"))
}
