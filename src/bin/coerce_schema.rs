//! coerce-schema: Extract SQL column types or columnar schemas from JSON
//!
//! Usage:
//!   # SQL types of a single document
//!   echo '{"id": 1, "name": "Alice"}' | coerce-schema
//!
//!   # CREATE TABLE statement, mapping text to varchar
//!   coerce-schema user.json --create-table users --hooks '{"text": "varchar"}'
//!
//!   # Columnar table schema from NDJSON rows
//!   coerce-schema --target arrow --ndjson events.jsonl

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use coerce::{ColumnType, EncoderConfig, HookTable, SqlEncoder, TableEncoder, Value};
use serde_json::json;
use std::fs::File;
use std::io::{stdin, Read};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "coerce=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    /// PostgreSQL column types
    Sql,
    /// Arrow-style table schema
    Arrow,
}

#[derive(Parser, Debug)]
#[command(name = "coerce-schema")]
#[command(about = "Extract SQL types or columnar schemas from JSON", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Type system to encode into
    #[arg(long, value_enum, default_value_t = Target::Sql)]
    target: Target,

    /// Process newline-delimited JSON (one JSON document per line)
    #[arg(long)]
    ndjson: bool,

    /// Hooks as a JSON object from type name to type token, e.g. '{"text": "varchar"}'
    #[arg(long)]
    hooks: Option<String>,

    /// Print a CREATE TABLE statement with this table name (sql target only)
    #[arg(long, value_name = "TABLE")]
    create_table: Option<String>,

    /// Maximum nesting depth for columnar types (default: 32)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Log encoder activity to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut content = Vec::new();
    if let Some(file_path) = &args.input {
        File::open(file_path)
            .with_context(|| format!("Failed to open input file: {}", file_path))?
            .read_to_end(&mut content)
            .context("Failed to read input file")?;
    } else {
        stdin().read_to_end(&mut content).context("Failed to read stdin")?;
    }

    let documents = parse_documents(content, args.ndjson)?;
    if documents.is_empty() {
        eprintln!("Warning: No JSON documents found in input");
    }
    tracing::debug!(documents = documents.len(), "parsed input");

    let hooks = match &args.hooks {
        Some(raw) => Some(serde_json::from_str::<serde_json::Value>(raw).context("Failed to parse --hooks")?),
        None => None,
    };

    let output = match args.target {
        Target::Sql => encode_sql(&args, documents, hooks.as_ref())?,
        Target::Arrow => encode_arrow(&args, documents, hooks.as_ref())?,
    };
    println!("{}", output);

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("coerce=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn parse_documents(mut content: Vec<u8>, ndjson: bool) -> Result<Vec<serde_json::Value>> {
    if !ndjson {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        let value = simd_json::serde::from_slice(&mut content).context("Failed to parse JSON")?;
        return Ok(vec![value]);
    }

    let mut documents = Vec::new();
    for (i, line) in content.split_mut(|b| *b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let value = simd_json::serde::from_slice(line)
            .with_context(|| format!("Failed to parse JSON on line {}", i + 1))?;
        documents.push(value);
    }
    Ok(documents)
}

fn encode_sql(
    args: &Args,
    documents: Vec<serde_json::Value>,
    hooks: Option<&serde_json::Value>,
) -> Result<String> {
    let hooks = match hooks {
        Some(raw) => HookTable::from_json(raw, str::to_owned)?,
        None => HookTable::new(),
    };
    let encoder = SqlEncoder::new(hooks);

    // SQL types describe one document; extra NDJSON lines are ignored
    let Some(document) = documents.into_iter().next() else {
        bail!("No document to encode");
    };
    let encoding = encoder.encode(&Value::from(document))?;

    if let Some(table) = &args.create_table {
        return encoding
            .create_table_statement(table)
            .context("--create-table requires a JSON object at the top level");
    }

    to_json(&serde_json::to_value(&encoding)?, args.compact)
}

fn encode_arrow(
    args: &Args,
    mut documents: Vec<serde_json::Value>,
    hooks: Option<&serde_json::Value>,
) -> Result<String> {
    let hooks = match hooks {
        Some(raw) => HookTable::from_json(raw, |token: &str| ColumnType::from(token))?,
        None => HookTable::new(),
    };
    let mut config = EncoderConfig::default();
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    let encoder = TableEncoder::with_config(hooks, config);

    // A single top-level array is treated as a list of rows
    if documents.len() == 1 && documents[0].is_array() {
        if let Some(serde_json::Value::Array(rows)) = documents.pop() {
            documents = rows;
        }
    }

    let rows = coerce::rows_from_json(documents).context("Every row must be a JSON object")?;
    let table = encoder.encode(&rows)?;

    let fields: Vec<_> = table
        .fields()
        .iter()
        .map(|field| json!({"name": field.name, "type": field.data_type.to_string()}))
        .collect();

    to_json(
        &json!({
            "schema": table.schema().to_string(),
            "num_rows": table.num_rows(),
            "fields": fields,
        }),
        args.compact,
    )
}

fn to_json(value: &serde_json::Value, compact: bool) -> Result<String> {
    let output = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(output)
}
