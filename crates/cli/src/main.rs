//! Offline document processing: PDF in, annotated chunk records out.
//!
//! Runs the extraction, index, and chunking stages without touching the
//! embedding backend or the database, writing the chunk records as JSON
//! in the same shape the server stores them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use tender_ingest::chunker::{chunk_document, Chunk, ChunkConfig, DocumentMeta};
use tender_ingest::document::extract_text;
use tender_ingest::index::extract_index_sections;

#[derive(Parser, Debug)]
#[command(name = "tender", about = "Chunk a tender document into embedding-ready JSON records")]
struct Args {
    /// Path to the input document (PDF or plain text)
    input: PathBuf,

    /// Output path for the chunk records (default: <input stem>_chunks.json)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write the extracted index sections to this path
    #[arg(long)]
    index_out: Option<PathBuf>,

    /// Source name stamped on every chunk (default: input file stem)
    #[arg(long)]
    source: Option<String>,

    /// Document date stamped on every chunk (default: current month)
    #[arg(long)]
    doc_date: Option<String>,

    /// Fallback title when none is detected on the first page
    #[arg(long)]
    title: Option<String>,

    /// Target chunk size in characters
    #[arg(long, env = "CHUNK_SIZE", default_value_t = 2500)]
    chunk_size: usize,

    /// Overlap between adjacent chunks in characters
    #[arg(long, env = "CHUNK_OVERLAP", default_value_t = 400)]
    chunk_overlap: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    tender_core::config::load_dotenv();
    let args = Args::parse();

    let chunks = process(&args)?;
    info!(chunks = chunks.len(), "processing complete");
    Ok(())
}

fn process(args: &Args) -> Result<Vec<Chunk>> {
    let filename = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .context("input path has no filename")?
        .to_string();
    let stem = file_stem(&args.input);

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let doc = extract_text(&bytes, &filename)
        .with_context(|| format!("failed to extract text from {filename}"))?;
    info!(pages = doc.pages.len(), chars = doc.total_chars(), "extracted document");

    let sections = extract_index_sections(&doc.pages);

    if let Some(index_out) = &args.index_out {
        let json = serde_json::to_string_pretty(&sections)?;
        fs::write(index_out, json)
            .with_context(|| format!("failed to write {}", index_out.display()))?;
        info!(path = %index_out.display(), entries = sections.len(), "index sections written");
    }

    let meta = DocumentMeta {
        source_name: args.source.clone().unwrap_or_else(|| stem.clone()),
        doc_date: args
            .doc_date
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().format("%B %Y").to_string()),
        fallback_title: args
            .title
            .clone()
            .unwrap_or_else(|| stem.replace('_', " ")),
    };
    let config = ChunkConfig {
        chunk_size: args.chunk_size,
        chunk_overlap: args.chunk_overlap,
    };

    let chunks = chunk_document(&doc.pages, &meta, &sections, &config)
        .context("chunking failed")?;

    let out_path = args
        .out
        .clone()
        .unwrap_or_else(|| args.input.with_file_name(format!("{stem}_chunks.json")));
    let json = serde_json::to_string_pretty(&chunks)?;
    fs::write(&out_path, json)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    info!(path = %out_path.display(), "chunks written");

    Ok(chunks)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(input: &Path, out: &Path) -> Args {
        Args {
            input: input.to_path_buf(),
            out: Some(out.to_path_buf()),
            index_out: None,
            source: Some("test-source".to_string()),
            doc_date: Some("July 2025".to_string()),
            title: None,
            chunk_size: 2500,
            chunk_overlap: 400,
        }
    }

    #[test]
    fn processes_a_text_document_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tender_notice.txt");
        fs::write(
            &input,
            "REQUEST FOR PROPOSAL FOR BRIDGE REPAIR\n\nScope of work covers the northern span.",
        )
        .unwrap();
        let out = dir.path().join("chunks.json");

        let chunks = process(&args_for(&input, &out)).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.source, "test-source");
        assert_eq!(
            chunks[0].metadata.title,
            "REQUEST FOR PROPOSAL FOR BRIDGE REPAIR"
        );

        let written: Vec<Chunk> =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, chunks);
    }

    #[test]
    fn writes_index_sections_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.txt");
        fs::write(
            &input,
            "Table of Contents\nInvitation To Bid 3\nGeneral Conditions 4-16\n\nBody text follows here.",
        )
        .unwrap();
        let out = dir.path().join("chunks.json");
        let index_out = dir.path().join("index.json");

        let mut args = args_for(&input, &out);
        args.index_out = Some(index_out.clone());
        process(&args).unwrap();

        let written = fs::read_to_string(&index_out).unwrap();
        assert!(written.contains("Invitation To Bid"));
        assert!(written.contains("General Conditions"));
    }
}
