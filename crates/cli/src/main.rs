use clap::{Parser, Subcommand};
use emporium_core::config::data_dir_from_env_value;
use emporium_core::{
    CatalogStore, CommodityRecord, CoreConfig, LanguageCode, LocalizedContentResolver,
    NewCommodity, NonEmptyText, Slug, StorageClass, TextStore,
};
use std::error::Error;
use std::io::{self, Read, Write};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "emporium")]
#[command(about = "Emporium content and catalog CLI")]
struct Cli {
    /// Data directory (defaults to `emporium_data`)
    #[arg(long, env = "EMPORIUM_DATA_DIR", global = true)]
    data_dir: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage text documents
    #[command(subcommand)]
    Text(TextCommand),
    /// Manage the commodity catalog
    #[command(subcommand)]
    Commodity(CommodityCommand),
}

#[derive(Subcommand)]
enum TextCommand {
    /// Create a document from a Markdown file (`-` reads stdin)
    Create { slug: String, file: String },
    /// Add or replace a translation
    Translate {
        slug: String,
        lang: String,
        file: String,
    },
    /// Remove a translation
    Untranslate { slug: String, lang: String },
    /// Replace the default-language source
    Edit { slug: String, file: String },
    /// Print the resolved HTML, rendering and caching it if needed
    Show {
        slug: String,
        /// Language code to prefer over the default source
        #[arg(long)]
        lang: Option<String>,
    },
    /// Drop every cached rendering of a document
    ClearCache { slug: String },
    /// List all documents
    List,
}

#[derive(Subcommand)]
enum CommodityCommand {
    /// Add a commodity to the catalog
    Create {
        name: String,
        /// Storage class: standard, bulk, fluid or hazardous
        #[arg(long)]
        storage: StorageClass,
        /// Slug of the text document describing the commodity
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        min_level: Option<u32>,
        #[arg(long)]
        max_level: Option<u32>,
    },
    /// List all commodities
    List,
    /// Show one commodity by exact name
    Show { name: String },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    run(cli, &mut stdout.lock())
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let cfg = Arc::new(CoreConfig::new(data_dir_from_env_value(cli.data_dir))?);

    match cli.command {
        Some(Commands::Text(command)) => run_text(TextStore::new(cfg), command, out),
        Some(Commands::Commodity(command)) => run_commodity(
            CatalogStore::new(cfg.clone()),
            TextStore::new(cfg),
            command,
            out,
        ),
        None => {
            writeln!(out, "Use 'emporium --help' for commands")?;
            Ok(())
        }
    }
}

fn run_text(
    store: TextStore,
    command: TextCommand,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    match command {
        TextCommand::Create { slug, file } => {
            let document = store.create(Slug::new(slug)?, read_source(&file)?)?;
            writeln!(out, "Created text '{}' with id {}", document.slug(), document.id())?;
        }
        TextCommand::Translate { slug, lang, file } => {
            let mut document = store.require_by_slug(&Slug::new(slug)?)?;
            let lang = LanguageCode::new(lang)?;
            document.set_translation(lang.clone(), read_source(&file)?);
            store.save(&document)?;
            writeln!(out, "Stored '{}' translation of '{}'", lang, document.slug())?;
        }
        TextCommand::Untranslate { slug, lang } => {
            let mut document = store.require_by_slug(&Slug::new(slug)?)?;
            if document.remove_translation(&lang).is_some() {
                store.save(&document)?;
                writeln!(out, "Removed '{}' translation of '{}'", lang, document.slug())?;
            } else {
                writeln!(out, "'{}' has no '{}' translation", document.slug(), lang)?;
            }
        }
        TextCommand::Edit { slug, file } => {
            let mut document = store.require_by_slug(&Slug::new(slug)?)?;
            document.set_source(read_source(&file)?);
            store.save(&document)?;
            writeln!(out, "Updated text '{}'", document.slug())?;
        }
        TextCommand::Show { slug, lang } => {
            let mut document = store.require_by_slug(&Slug::new(slug)?)?;
            let resolved =
                LocalizedContentResolver::commonmark().resolve_html(&mut document, lang.as_deref())?;
            if resolved.cache_filled {
                if let Err(e) = store.save(&document) {
                    tracing::warn!(slug = %document.slug(), "rendered html was not cached: {}", e);
                }
            }
            write!(out, "{}", resolved.html)?;
        }
        TextCommand::ClearCache { slug } => {
            let mut document = store.require_by_slug(&Slug::new(slug)?)?;
            document.clear_rendered();
            store.save(&document)?;
            writeln!(out, "Cleared cached html of '{}'", document.slug())?;
        }
        TextCommand::List => {
            let documents = store.list();
            if documents.is_empty() {
                writeln!(out, "No texts found.")?;
            }
            for document in documents {
                let languages: Vec<&str> = document
                    .translations()
                    .keys()
                    .map(LanguageCode::as_str)
                    .collect();
                writeln!(
                    out,
                    "Slug: {}, ID: {}, Translations: [{}]",
                    document.slug(),
                    document.id(),
                    languages.join(", ")
                )?;
            }
        }
    }
    Ok(())
}

fn run_commodity(
    catalog: CatalogStore,
    texts: TextStore,
    command: CommodityCommand,
    out: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    match command {
        CommodityCommand::Create {
            name,
            storage,
            description,
            min_level,
            max_level,
        } => {
            let description = match description {
                Some(slug) => Some(texts.require_by_slug(&Slug::new(slug)?)?.id()),
                None => None,
            };
            let record = catalog.create(NewCommodity {
                name: NonEmptyText::new(name)?,
                storage,
                min_level,
                max_level,
                description,
            })?;
            writeln!(out, "Created commodity '{}' with id {}", record.name(), record.id())?;
        }
        CommodityCommand::List => {
            let records = catalog.list();
            if records.is_empty() {
                writeln!(out, "No commodities found.")?;
            }
            for record in records {
                writeln!(out, "{}", describe_commodity(&record))?;
            }
        }
        CommodityCommand::Show { name } => match catalog.find_by_name(&name)? {
            Some(record) => writeln!(out, "{}", describe_commodity(&record))?,
            None => return Err(format!("no commodity named '{}'", name.trim()).into()),
        },
    }
    Ok(())
}

fn describe_commodity(record: &CommodityRecord) -> String {
    let levels = match record.max_level() {
        Some(max) => format!("{}-{}", record.effective_min_level(), max),
        None => format!("{}+", record.effective_min_level()),
    };
    let description = record
        .description()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "Name: {}, ID: {}, Storage: {}, Levels: {}, Description: {}",
        record.name(),
        record.id(),
        record.storage(),
        levels,
        description
    )
}

/// Reads Markdown from `path`, or from stdin when `path` is `-`.
fn read_source(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(source)
    } else {
        std::fs::read_to_string(path)
    }
}
