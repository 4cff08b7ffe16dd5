//! gridkit CLI
//!
//! Filter, sort, and export JSON row sets from the terminal, assemble
//! WHERE clauses from saved selection presets, and fetch rows from the
//! backend exec endpoint.

mod files;
mod logging;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gridkit_core::{ColumnDefinition, Row};
use gridkit_query::{QueryTemplate, SelectionFields};
use gridkit_services::{BackendClient, BackendConfig, export};
use gridkit_view::{GridModel, SortState, distinct_values};

use crate::output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "gridkit", version, about = "Filter, sort, and export tabular data")]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write JSON logs to the default log directory
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

/// Local grid options shared by commands that display rows
#[derive(Debug, clap::Args)]
struct ViewArgs {
    /// Column definitions (JSON array); inferred from the rows when omitted
    #[arg(long)]
    columns: Option<PathBuf>,

    /// Column filter, KEY=TEXT (repeatable). TEXT may start with >, <, or =
    #[arg(short, long = "filter", value_name = "KEY=TEXT")]
    filters: Vec<String>,

    /// Sort column, KEY[:asc|desc] (repeatable, first is primary)
    #[arg(short, long = "sort", value_name = "KEY[:DIR]")]
    sorts: Vec<String>,

    /// Quick search across all cells
    #[arg(long)]
    search: Option<String>,

    /// Hide a column (repeatable)
    #[arg(long = "hide", value_name = "KEY")]
    hidden: Vec<String>,

    /// Column that identifies a row; rows are identified by position otherwise
    #[arg(long)]
    key: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Filter and sort a JSON array of rows
    Filter {
        /// Rows file (JSON array of objects)
        input: PathBuf,

        #[command(flatten)]
        view: ViewArgs,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// List the distinct values of a column
    Options {
        input: PathBuf,

        /// Column key
        #[arg(long)]
        column: String,
    },

    /// Print the WHERE clause or statement for a saved selection preset
    Where {
        /// Preset blob (JSON)
        preset: PathBuf,

        /// Render a `select * from SOURCE` statement around the clause
        #[arg(long)]
        source: Option<String>,

        /// Compile to a parameterized predicate instead
        #[arg(long)]
        parameterized: bool,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Fetch rows for a preset from the backend
    Fetch {
        preset: PathBuf,

        /// Table or view to select from
        #[arg(long)]
        source: String,

        /// Backend config file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the backend base URL
        #[arg(long, env = "GRIDKIT_BASE_URL")]
        base_url: Option<String>,

        /// Override the backend user name
        #[arg(long, env = "GRIDKIT_USER")]
        user: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,

        #[command(flatten)]
        view: ViewArgs,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Export filtered rows to CSV or XLSX (by output extension)
    Export {
        input: PathBuf,

        /// Output file, `.csv` or `.xlsx`
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Show or initialize the backend configuration
    Config {
        /// Write the defaults if no config file exists yet
        #[arg(long)]
        init: bool,
    },
}

/// Column names the preset lists apply to
#[derive(Debug, clap::Args)]
struct FieldArgs {
    #[arg(long, default_value = "manufacturer")]
    manufacturer_field: String,
    #[arg(long, default_value = "article")]
    article_field: String,
    #[arg(long, default_value = "name")]
    name_field: String,
}

impl FieldArgs {
    fn to_fields(&self) -> SelectionFields {
        SelectionFields {
            manufacturer: self.manufacturer_field.clone(),
            article: self.article_field.clone(),
            name: self.name_field.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = cli.log_file.then(logging::log_directory);
    let _log_guard =
        logging::init(logging::LoggingConfig::with_verbosity(cli.verbose).with_log_dir(log_dir))?;

    match cli.command {
        Command::Filter {
            input,
            view,
            format,
        } => {
            let rows = files::load_rows(&input)?;
            let grid = build_grid(rows, &view)?;
            print_rows(&grid, format)
        }
        Command::Options { input, column } => {
            let rows = files::load_rows(&input)?;
            for value in distinct_values(&rows, &column) {
                println!("{}", value);
            }
            Ok(())
        }
        Command::Where {
            preset,
            source,
            parameterized,
            fields,
        } => {
            let preset = files::load_preset(&preset)?;
            let fields = fields.to_fields();
            if parameterized {
                match preset.predicate(&fields) {
                    Some(predicate) => {
                        let bound = predicate.compile()?;
                        println!("{}", bound.where_clause());
                        for (idx, param) in bound.params.iter().enumerate() {
                            println!("${} = {:?}", idx + 1, param);
                        }
                    }
                    None => tracing::info!("Preset does not restrict anything"),
                }
                return Ok(());
            }
            let clause = preset.where_clause(&fields);
            match source {
                Some(source) => println!("{}", QueryTemplate::select_all(&source)?.render(&clause)?),
                None => println!("{}", clause),
            }
            Ok(())
        }
        Command::Fetch {
            preset,
            source,
            config,
            base_url,
            user,
            fields,
            view,
            format,
        } => {
            let mut backend = match &config {
                Some(path) => BackendConfig::load_from(path)?,
                None => BackendConfig::load()?,
            };
            if let Some(base_url) = base_url {
                backend.base_url = base_url;
            }
            if let Some(user) = user {
                backend.user_name = user;
            }

            let preset = files::load_preset(&preset)?;
            let template = QueryTemplate::select_all(&source)?;
            let client = BackendClient::http(backend)?;
            let rows = client
                .fetch_selection(&template, &preset, &fields.to_fields())
                .await?;

            let grid = build_grid(rows, &view)?;
            print_rows(&grid, format)
        }
        Command::Export {
            input,
            output,
            view,
        } => {
            let rows = files::load_rows(&input)?;
            let grid = build_grid(rows, &view)?;
            export_rows(&grid, &output)
        }
        Command::Config { init } => {
            let path = BackendConfig::config_path()?;
            let config = BackendConfig::load_from(&path)?;
            if init && !path.exists() {
                config.save_to(&path)?;
                eprintln!("Wrote {}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Grid over `rows` with the view arguments applied
fn build_grid(rows: Vec<Row>, view: &ViewArgs) -> Result<GridModel> {
    let columns: Vec<ColumnDefinition> = files::load_columns(view.columns.as_deref(), &rows)?;

    let mut grid = match &view.key {
        Some(key) => GridModel::keyed_by_column(columns, key),
        None => GridModel::positional(columns),
    };
    grid.set_rows(rows)?;

    for arg in &view.filters {
        let (key, text) = files::parse_filter_arg(arg)?;
        grid.set_filter(&key, text)
            .with_context(|| format!("Cannot filter on {:?}", key))?;
    }
    for key in &view.hidden {
        grid.controller_mut().set_column_visible(key, false)?;
    }

    let sort_columns = view
        .sorts
        .iter()
        .map(|arg| files::parse_sort_arg(arg))
        .collect::<Result<Vec<_>>>()?;
    grid.set_sort(SortState::from_columns(sort_columns));
    grid.set_search(view.search.clone());

    Ok(grid)
}

fn print_rows(grid: &GridModel, format: OutputFormat) -> Result<()> {
    let rows = grid.visible_rows();
    let columns = grid.controller().columns();
    println!("{}", output::render(format, columns, &rows)?);
    tracing::info!(shown = rows.len(), total = grid.rows().len(), "Rows rendered");
    Ok(())
}

fn export_rows(grid: &GridModel, path: &std::path::Path) -> Result<()> {
    let rows = grid.visible_rows();
    let columns = grid.controller().columns();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => {
            std::fs::write(path, export::to_csv(columns, rows.iter().copied()))
                .with_context(|| format!("Failed to write {:?}", path))?;
        }
        Some("xlsx") => {
            let buffer = export::to_xlsx(columns, rows.iter().copied())?;
            std::fs::write(path, buffer).with_context(|| format!("Failed to write {:?}", path))?;
        }
        _ => anyhow::bail!("Unsupported export format for {:?}, use .csv or .xlsx", path),
    }

    eprintln!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}
