// ABOUTME: CLI for the Lexis sentence tagger.
// ABOUTME: Reads JSON requests from files or stdin, runs the tagger, and prints JSON responses.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use lexis_tagger::{
    AnalysisRequest, AnnotationTable, ArticleRequest, CompetitorAnalysisRequest, RemoteAnnotator,
    SectionRequest, SimilarityBatchRequest, SimilarityRequest, Tagger, TaggerOptions,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Classify sentences against a keyword and print JSON.
#[derive(Parser, Debug)]
#[command(name = "lexis")]
#[command(about = "Tag sentences with Lexis and print JSON", long_about = None)]
struct Args {
    /// Precomputed annotation table (JSON).
    #[arg(long, global = true, conflicts_with = "annotator_url")]
    annotations: Option<PathBuf>,

    /// CoNLL-U file merged into the annotation table.
    #[arg(long, global = true, requires = "annotations")]
    conllu: Option<PathBuf>,

    /// Base URL of an annotation sidecar.
    #[arg(long, global = true)]
    annotator_url: Option<String>,

    /// Tagger options (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output compact JSON instead of pretty.
    #[arg(long, global = true, default_value_t = false)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a flat sentence list: {"sentences": [...], "primaryKeyword": ".."}.
    Analyze {
        /// Request file, or "-" for stdin.
        request: String,
    },
    /// Segment and classify an HTML document.
    Article {
        /// Request file {"htmlContent", "primaryKeyword"}, or "-" for stdin.
        #[arg(required_unless_present = "html", conflicts_with = "html")]
        request: Option<String>,

        /// HTML file path or http(s) URL.
        #[arg(long, requires = "keyword")]
        html: Option<String>,

        /// Target keyword when using --html.
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Similarity of two texts, or of every pair in a batch file.
    Similarity {
        /// Batch request file {"items": [...]}, or "-" for stdin.
        #[arg(required_unless_present = "text1", conflicts_with = "text1")]
        request: Option<String>,

        #[arg(long, requires = "text2")]
        text1: Option<String>,

        #[arg(long)]
        text2: Option<String>,
    },
    /// Consensus subtopics from competitor headings: {"data": [...]}.
    Subtopics {
        request: String,
    },
    /// Section-level keyword analysis: {"keyword", "content": [...]}.
    Sections {
        request: String,
    },
}

fn main() {
    init_tracing();
    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LEXIS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    tracing::debug!(command = ?args.command, "running");
    let tagger = build_tagger(&args)?;

    match &args.command {
        Command::Analyze { request } => {
            let req: AnalysisRequest = read_request(request)?;
            emit(&tagger.analyze(&req)?, args.compact)
        }
        Command::Article {
            request,
            html,
            keyword,
        } => {
            let response = match (request, html) {
                (Some(request), _) => {
                    let req: ArticleRequest = read_request(request)?;
                    tagger.process_article(&req)?
                }
                (None, Some(target)) => {
                    let keyword = keyword.as_deref().unwrap_or_default();
                    let (body, content_type) = load_document(target)?;
                    tagger.process_article_bytes(&body, content_type.as_deref(), keyword)?
                }
                (None, None) => bail!("article needs a request file or --html"),
            };
            emit(&response, args.compact)
        }
        Command::Similarity {
            request,
            text1,
            text2,
        } => match (request, text1, text2) {
            (Some(request), _, _) => {
                let req: SimilarityBatchRequest = read_request(request)?;
                emit(&tagger.similarity_batch(&req)?, args.compact)
            }
            (None, Some(text1), Some(text2)) => {
                let req = SimilarityRequest {
                    text1: text1.clone(),
                    text2: text2.clone(),
                };
                emit(&tagger.similarity(&req)?, args.compact)
            }
            _ => bail!("similarity needs a batch file or both --text1 and --text2"),
        },
        Command::Subtopics { request } => {
            let req: CompetitorAnalysisRequest = read_request(request)?;
            emit(&tagger.subtopics(&req)?, args.compact)
        }
        Command::Sections { request } => {
            let req: SectionRequest = read_request(request)?;
            emit(&tagger.analyze_sections(&req)?, args.compact)
        }
    }
}

fn build_tagger(args: &Args) -> Result<Tagger> {
    let opts = match &args.config {
        Some(path) => TaggerOptions::from_path(path)?,
        None => TaggerOptions::default(),
    };
    let builder = Tagger::builder().options(opts);

    let builder = if let Some(url) = &args.annotator_url {
        let remote = Arc::new(RemoteAnnotator::new(url)?);
        builder
            .annotator(remote.clone())
            .embedder(remote.clone())
            .grammar_checker(remote)
    } else if let Some(path) = &args.annotations {
        let mut table = AnnotationTable::from_path(path)?;
        if let Some(conllu) = &args.conllu {
            let src = fs::read_to_string(conllu)
                .with_context(|| format!("reading {}", conllu.display()))?;
            table.load_conllu(&src)?;
        }
        let table = Arc::new(table);
        builder
            .annotator(table.clone())
            .embedder(table.clone())
            .grammar_checker(table)
    } else {
        bail!("one of --annotations or --annotator-url is required");
    };
    Ok(builder.build()?)
}

fn read_request<T: DeserializeOwned>(target: &str) -> Result<T> {
    let bytes = load_bytes(target)?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing request {}", target))
}

fn emit<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    if compact {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Document bytes plus the Content-Type header when fetched over HTTP.
fn load_document(target: &str) -> Result<(Vec<u8>, Option<String>)> {
    if target.starts_with("http://") || target.starts_with("https://") {
        let resp = reqwest::blocking::get(target)?.error_for_status()?;
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = resp.bytes()?;
        return Ok((bytes.to_vec(), content_type));
    }
    Ok((load_bytes(target)?, None))
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    let path = Path::new(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
