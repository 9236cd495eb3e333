use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use keyview::scan::scan_reply;
use keyview::{
    HashField, KeyRef, ListElement, MemorySource, PageSource, RangePager, ResultValue, ScanItem,
    ScanSession, ScoredMember, SetMember, SettingsManager, ValueKind, render, telemetry,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "keyview",
    version,
    about = "Scan key-value collections page by page and render replies like the reference client",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (default: <config dir>/keyview/settings.json)
    #[arg(long, global = true, env = "KEYVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JSON reply as display lines
    Render {
        /// JSON file holding the reply (default: stdin)
        file: Option<PathBuf>,

        /// Print a top-level scalar without quotes
        #[arg(long)]
        no_quote: bool,

        /// Prefix for the first line
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Page through a JSON collection fixture
    Scan {
        /// JSON fixture: object for hash, array for set/list, object or pairs for zset
        file: PathBuf,

        /// Collection kind of the fixture
        #[arg(short, long, value_enum)]
        kind: CollectionKind,

        /// Substring filter
        #[arg(short = 'm', long = "match")]
        filter: Option<String>,

        /// Items requested per page
        #[arg(short = 'n', long, env = "KEYVIEW_FIELD_COUNT")]
        page_size: Option<usize>,

        /// Keep loading until the scan is exhausted
        #[arg(short, long)]
        all: bool,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show which view a key kind selects
    Kind {
        /// Kind tag as reported by TYPE
        kind: String,

        /// Encoding sub-kind, e.g. HyperLogLog
        sub_kind: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CollectionKind {
    Hash,
    Set,
    List,
    Zset,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

const FIXTURE_KEY: &str = "fixture";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing(cli.verbose);

    let manager = match cli.config {
        Some(path) => SettingsManager::with_path(path),
        None => SettingsManager::new()?,
    };
    let settings = manager.load()?;

    match cli.command {
        Command::Render {
            file,
            no_quote,
            prefix,
        } => {
            let prefix = prefix.unwrap_or_else(|| settings.prefix.clone());
            let quote = settings.quote_scalars && !no_quote;
            render_reply(file.as_deref(), &prefix, quote)
        }
        Command::Scan {
            file,
            kind,
            filter,
            page_size,
            all,
            format,
        } => {
            let options = ScanOptions {
                filter,
                page_size: page_size.unwrap_or(settings.field_count),
                all,
                format,
            };
            scan_fixture(&file, kind, options).await
        }
        Command::Kind { kind, sub_kind } => {
            print_kind(&kind, sub_kind.as_deref());
            Ok(())
        }
    }
}

fn render_reply(file: Option<&Path>, prefix: &str, quote: bool) -> Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read reply file: {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("Failed to read reply from stdin")?,
    };
    let json: serde_json::Value =
        serde_json::from_str(&input).context("Reply is not valid JSON")?;
    let reply = ResultValue::from(json);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in render::render(&reply, prefix, quote) {
        writeln!(handle, "{line}")?;
    }
    Ok(())
}

struct ScanOptions {
    filter: Option<String>,
    page_size: usize,
    all: bool,
    format: OutputFormat,
}

async fn scan_fixture(file: &Path, kind: CollectionKind, options: ScanOptions) -> Result<()> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read fixture: {}", file.display()))?;
    let json: serde_json::Value =
        serde_json::from_str(&contents).context("Fixture is not valid JSON")?;
    let key = KeyRef::new(FIXTURE_KEY, 0);

    match kind {
        CollectionKind::Hash => {
            let source = MemorySource::new().with_collection(key.clone(), hash_fixture(json)?);
            run_scan(ScanSession::new(source, key, options.page_size), options).await
        }
        CollectionKind::Set => {
            let members: Vec<SetMember> = string_fixture(json)?
                .into_iter()
                .map(SetMember::new)
                .collect();
            let source = MemorySource::new().with_collection(key.clone(), members);
            run_scan(ScanSession::new(source, key, options.page_size), options).await
        }
        CollectionKind::List => {
            let elements: Vec<ListElement> = string_fixture(json)?
                .into_iter()
                .map(ListElement::new)
                .collect();
            let source =
                RangePager::new(MemorySource::new().with_collection(key.clone(), elements));
            run_scan(ScanSession::new(source, key, options.page_size), options).await
        }
        CollectionKind::Zset => {
            let source = MemorySource::new().with_collection(key.clone(), zset_fixture(json)?);
            run_scan(ScanSession::new(source, key, options.page_size), options).await
        }
    }
}

async fn run_scan<I, S>(session: ScanSession<I, S>, options: ScanOptions) -> Result<()>
where
    I: ScanItem + Serialize,
    S: PageSource<I>,
{
    session.set_filter(options.filter);

    let stdout = io::stdout();
    if options.all {
        let mut pages = std::pin::pin!(session.pages());
        while let Some(page) = pages.next().await {
            let items = page?;
            write_page(&mut stdout.lock(), &session, &items, options.format)?;
        }
    } else {
        let items = session.load_next().await?;
        write_page(&mut stdout.lock(), &session, &items, options.format)?;
        if session.has_more() {
            eprintln!("\nMore results available. Use --all to keep scanning.");
        }
    }

    eprintln!("({} items loaded)", session.len());
    Ok(())
}

fn write_page<I, S, W>(
    out: &mut W,
    session: &ScanSession<I, S>,
    items: &[I],
    format: OutputFormat,
) -> Result<()>
where
    I: ScanItem + Serialize,
    S: PageSource<I>,
    W: Write,
{
    let cursor = session.cursor();
    match format {
        OutputFormat::Text => {
            for line in render::render(&scan_reply(cursor.token(), items), "", true) {
                writeln!(out, "{line}")?;
            }
        }
        OutputFormat::Json => {
            let page = serde_json::json!({
                "cursor": cursor.token(),
                "exhausted": cursor.is_exhausted(),
                "items": items,
            });
            serde_json::to_writer(&mut *out, &page)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn hash_fixture(json: serde_json::Value) -> Result<Vec<HashField>> {
    let serde_json::Value::Object(map) = json else {
        anyhow::bail!("Hash fixture must be a JSON object");
    };
    Ok(map
        .into_iter()
        .map(|(field, value)| HashField::new(field, display_text(value)))
        .collect())
}

fn string_fixture(json: serde_json::Value) -> Result<Vec<String>> {
    let serde_json::Value::Array(items) = json else {
        anyhow::bail!("Set and list fixtures must be JSON arrays");
    };
    Ok(items.into_iter().map(display_text).collect())
}

fn zset_fixture(json: serde_json::Value) -> Result<Vec<ScoredMember>> {
    match json {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(member, score)| Ok(ScoredMember::new(member, score_of(&score)?)))
            .collect(),
        serde_json::Value::Array(pairs) => pairs
            .into_iter()
            .map(|pair| {
                let (member, score): (String, f64) = serde_json::from_value(pair)
                    .context("Sorted set pairs must be [member, score]")?;
                Ok(ScoredMember::new(member, score))
            })
            .collect(),
        _ => anyhow::bail!("Sorted set fixture must be an object or an array of pairs"),
    }
}

fn score_of(value: &serde_json::Value) -> Result<f64> {
    value
        .as_f64()
        .with_context(|| format!("Score is not a number: {value}"))
}

fn display_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn print_kind(kind: &str, sub_kind: Option<&str>) {
    // Unknown kinds select no view.
    let Some(selected) = ValueKind::from_tags(kind, sub_kind) else {
        return;
    };
    let paging = match selected.paging() {
        Some(paging) => format!("{paging:?}").to_lowercase(),
        None => "none".to_string(),
    };
    println!("view: {selected}");
    println!("paging: {paging}");
    println!("shows length: {}", selected.shows_length());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_fixture_stringifies_values() {
        let fields = hash_fixture(json!({"age": 36, "name": "ada"})).unwrap();
        assert_eq!(
            fields,
            vec![HashField::new("age", "36"), HashField::new("name", "ada")]
        );
        assert!(hash_fixture(json!(["a"])).is_err());
    }

    #[test]
    fn test_zset_fixture_accepts_objects_and_pairs() {
        let from_object = zset_fixture(json!({"a": 1, "b": 2.5})).unwrap();
        let from_pairs = zset_fixture(json!([["a", 1], ["b", 2.5]])).unwrap();

        assert_eq!(from_object, from_pairs);
        assert!(zset_fixture(json!({"a": "high"})).is_err());
        assert!(zset_fixture(json!("a")).is_err());
    }

    #[test]
    fn test_string_fixture_requires_array() {
        assert_eq!(
            string_fixture(json!(["x", 1, null])).unwrap(),
            vec!["x", "1", "null"]
        );
        assert!(string_fixture(json!({"x": 1})).is_err());
    }
}
