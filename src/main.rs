//! csv2mongo CLI - Clean and upload CSV data to a Mongo database.
//!
//! ```bash
//! csv2mongo --host db.example.com -d survey -c people \
//!     -a age int -a born date --date-format '%Y-%m-%d' -i people.csv
//!
//! # Validate without touching the database:
//! cat people.csv | csv2mongo --dry-run --strict -a age int
//! ```

use std::path::PathBuf;

use clap::Parser;
use csv2mongo::{
    csv_reader, decode, detect_delimiter, read_bytes, ActionTable, ImportPipeline, ImportReport,
    JsonSink, MongoSink,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csv2mongo")]
#[command(about = "Clean and upload CSV data to a Mongo database", long_about = None)]
struct Cli {
    /// The MongoDB server (hostname or mongodb:// URI)
    #[arg(long, required_unless_present = "dry_run")]
    host: Option<String>,

    /// The database to use
    #[arg(short, long, required_unless_present = "dry_run")]
    database: Option<String>,

    /// The collection to use
    #[arg(short, long, required_unless_present = "dry_run")]
    collection: Option<String>,

    /// Drop the specified collection before beginning
    #[arg(long, conflicts_with = "dry_run")]
    drop: bool,

    /// A CSV field, and associated action to take ('float', 'int', 'date')
    #[arg(short, long, num_args = 2, value_names = ["FIELD", "ACTION"], action = clap::ArgAction::Append)]
    action: Vec<String>,

    /// Date format string (supply once per 'date' action specified)
    #[arg(long = "date-format", value_name = "FORMAT")]
    date_format: Vec<String>,

    /// Input file (stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Exit with an error if any action field is missing from the CSV
    /// header row, or if any field fails to convert
    #[arg(short, long)]
    strict: bool,

    /// Field delimiter (auto-detected from the header line if omitted)
    #[arg(long)]
    delimiter: Option<char>,

    /// Print records as JSON lines to stdout instead of uploading them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pairs = action_pairs(&cli.action);
    let table = ActionTable::build(&pairs, &cli.date_format)?;

    let source = cli
        .input
        .as_deref()
        .map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    eprintln!("📄 Reading CSV from {source}");

    let bytes = read_bytes(cli.input.as_deref())?;
    let (text, encoding) = decode(&bytes);

    let delimiter = match cli.delimiter {
        Some(d) if !d.is_ascii() => {
            return Err(format!("delimiter '{d}' is not an ASCII character").into());
        }
        Some(d) => d,
        None => detect_delimiter(&text),
    };

    eprintln!("   Encoding: {encoding}");
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(delimiter),
        if cli.delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Actions: {}", table.len());

    let reader = csv_reader(&text, delimiter);
    let pipeline = ImportPipeline::new(table, cli.strict);

    let report = if cli.dry_run {
        let mut sink = JsonSink::new(std::io::stdout());
        pipeline.run(reader, &mut sink).await?
    } else {
        let (Some(host), Some(database), Some(collection)) =
            (&cli.host, &cli.database, &cli.collection)
        else {
            return Err(
                "--host, --database and --collection are required unless --dry-run is given".into(),
            );
        };

        let mut sink = MongoSink::connect(host, database, collection).await?;
        if cli.drop {
            eprintln!("🗑️  Dropping collection '{collection}'");
            sink.drop_collection().await?;
        }
        pipeline.run(reader, &mut sink).await?
    };

    print_report(&report);
    Ok(())
}

/// Regroup clap's flattened `-a FIELD ACTION` values into pairs.
fn action_pairs(flat: &[String]) -> Vec<(String, String)> {
    flat.chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}

fn print_report(report: &ImportReport) {
    eprintln!("✅ Loaded {} of {} records", report.inserted, report.rows);

    if !report.diagnostics.is_empty() {
        eprintln!("⚠️  {} fields left unconverted:", report.diagnostics.len());
        for d in report.diagnostics.iter().take(5) {
            eprintln!("   - line {}, field '{}': {}", d.row, d.field, d.message);
        }
        if report.diagnostics.len() > 5 {
            eprintln!("   ... and {} more", report.diagnostics.len() - 5);
        }
    }
}
