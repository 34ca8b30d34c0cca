use std::fs;
use std::io::Read as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use codec::{ParserOptions, Prefixes, SearchObject, SearchParser};
use demo_schema::DemoScreen;
use searchsync_tools::{
    decode_query, encode_object, format_decode_pretty, format_inspect_pretty, inspect_schema,
    normalize_query, QueryForm,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "searchsync-tools",
    version,
    about = "searchsync schema and query-string tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a schema's fields and hash.
    Inspect {
        #[command(flatten)]
        schema: SchemaArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },
    /// Decode a query string into its canonical, delta and typed forms.
    Decode {
        /// Query string, with or without a leading `?`.
        query: String,
        #[command(flatten)]
        schema: SchemaArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Re-serialize a query string in one form.
    Normalize {
        query: String,
        #[command(flatten)]
        schema: SchemaArgs,
        #[arg(long, value_enum, default_value_t = Form::Canonical)]
        form: Form,
    },
    /// Encode a JSON object (`-` reads stdin) into canonical and delta queries.
    Encode {
        object: String,
        #[command(flatten)]
        schema: SchemaArgs,
    },
}

#[derive(Args)]
struct SchemaArgs {
    /// Schema JSON file.
    #[arg(long, conflicts_with = "demo", required_unless_present = "demo")]
    schema: Option<PathBuf>,
    /// Built-in demo schema.
    #[arg(long, value_enum)]
    demo: Option<Demo>,
    /// Filter negation prefix.
    #[arg(long)]
    not_prefix: Option<String>,
    /// Filter ignore prefix.
    #[arg(long)]
    ignore_prefix: Option<String>,
    /// Extra field to enforce; repeatable.
    #[arg(long = "enforce")]
    enforced: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Demo {
    Alerts,
    Submissions,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Form {
    Canonical,
    Full,
    Delta,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { schema, format } => {
            let (schema, _) = schema.load()?;
            let report = inspect_schema(&schema);
            match format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Pretty => print!("{}", format_inspect_pretty(&report)),
            }
        }
        Command::Decode {
            query,
            schema,
            format,
        } => {
            let (schema, options) = schema.load()?;
            let report = decode_query(schema, options, &query).context("build parser")?;
            match format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Pretty => print!("{}", format_decode_pretty(&report)),
            }
        }
        Command::Normalize {
            query,
            schema,
            form,
        } => {
            let parser = schema.parser()?;
            let form = match form {
                Form::Canonical => QueryForm::Canonical,
                Form::Full => QueryForm::Full,
                Form::Delta => QueryForm::Delta,
            };
            println!("{}", normalize_query(&parser, &query, form));
        }
        Command::Encode { object, schema } => {
            let parser = schema.parser()?;
            let json = if object == "-" {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("read object from stdin")?;
                buf
            } else {
                object
            };
            let object: SearchObject = serde_json::from_str(&json).context("parse object json")?;
            let (canonical, delta) = encode_object(&parser, &object);
            println!("canonical: {canonical}");
            println!("delta:     {delta}");
        }
    }
    Ok(())
}

impl SchemaArgs {
    fn load(self) -> Result<(schema::Schema, ParserOptions)> {
        let (schema, mut prefixes) = match (self.schema, self.demo) {
            (Some(path), _) => (load_schema(&path)?, Prefixes::none()),
            (None, Some(demo)) => {
                let screen = match demo {
                    Demo::Alerts => DemoScreen::Alerts,
                    Demo::Submissions => DemoScreen::Submissions,
                };
                (screen.schema(), demo_schema::parser_options().prefixes)
            }
            (None, None) => anyhow::bail!("either --schema or --demo is required"),
        };
        if let Some(not) = self.not_prefix {
            prefixes.not = Some(not);
        }
        if let Some(ignore) = self.ignore_prefix {
            prefixes.ignore = Some(ignore);
        }
        tracing::debug!(fields = schema.len(), ?prefixes, "schema loaded");
        let options = ParserOptions::new()
            .prefixes(prefixes)
            .enforced(self.enforced);
        Ok((schema, options))
    }

    fn parser(self) -> Result<SearchParser> {
        let (schema, options) = self.load()?;
        SearchParser::new(schema, options).context("build parser")
    }
}

fn load_schema(path: &Path) -> Result<schema::Schema> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read schema {}", path.display()))?;
    let schema: schema::Schema = serde_json::from_str(&contents).context("parse schema json")?;
    schema.validate().context("schema validation failed")?;
    Ok(schema)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{json}");
    Ok(())
}
