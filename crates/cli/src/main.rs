//! CLI tool for extracting text, links, images and tables from documents.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use docex_core::{DataExtractor, Extraction, Loader};
use docex_docx::DocxLoader;
use docex_pdf::{PdfExtractBackend, PdfLoader, PdfPagesLoader};
use docex_ppt::PptLoader;
use docex_pptx::PptxLoader;
use docex_store::{FileStorage, SqlStorage, Storage, StoreData};
use std::path::{Path, PathBuf};

/// Where extraction results are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StorageMethod {
    /// JSON and CSV files in the output directory
    File,
    /// Rows in a SQLite database
    Sql,
}

/// How PDF files are opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PdfMode {
    /// Positioned spans, link annotations and images
    Stream,
    /// Raw text per page
    Pages,
}

/// Extract text, links, images and tables from PDF, DOCX, PPTX and PPT files.
#[derive(Parser, Debug)]
#[command(name = "docex")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input file(s) (.pdf, .docx, .pptx or .ppt)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Storage method
    #[arg(short, long, value_enum, default_value = "file")]
    storage: StorageMethod,

    /// Output directory for file storage
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Database path for SQL storage
    #[arg(long, default_value = "extracted_data.db")]
    db: PathBuf,

    /// PDF loader
    #[arg(long, value_enum, default_value = "stream")]
    pdf_mode: PdfMode,

    /// Skip the pdf-extract layout backend for PDF text and tables
    #[arg(long)]
    no_layout: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut storage = open_storage(&args)?;

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        if let Err(e) = process_file(input_path, &args, storage.as_mut()) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
        }
    }

    Ok(())
}

fn open_storage(args: &Args) -> Result<Box<dyn Storage>> {
    let storage: Box<dyn Storage> = match args.storage {
        StorageMethod::File => Box::new(
            FileStorage::new(&args.output).with_context(|| {
                format!("Failed to create output directory: {}", args.output.display())
            })?,
        ),
        StorageMethod::Sql => Box::new(
            SqlStorage::open(&args.db)
                .with_context(|| format!("Failed to open database {}", args.db.display()))?,
        ),
    };
    Ok(storage)
}

/// Pick the loader for a file by its extension.
fn loader_for(path: &Path, pdf_mode: PdfMode) -> Result<Box<dyn Loader>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let loader: Box<dyn Loader> = match ext.as_str() {
        "pdf" => match pdf_mode {
            PdfMode::Stream => Box::new(PdfLoader::new()),
            PdfMode::Pages => Box::new(PdfPagesLoader::new()),
        },
        "docx" => Box::new(DocxLoader::new()),
        "pptx" => Box::new(PptxLoader::new()),
        "ppt" => Box::new(PptLoader::new()),
        _ => bail!("Unsupported file type."),
    };
    Ok(loader)
}

fn build_extractor(path: &Path, args: &Args) -> Result<DataExtractor> {
    let extractor = DataExtractor::new(loader_for(path, args.pdf_mode)?);
    if args.no_layout {
        return Ok(extractor);
    }
    Ok(extractor.with_layout_backend(Box::new(PdfExtractBackend::new())))
}

fn report<T>(label: &str, extraction: &Extraction<T>) {
    log::info!("{}: {} records", label, extraction.len());
    if extraction.skipped > 0 {
        log::warn!("{}: skipped {} unreadable items", label, extraction.skipped);
    }
}

/// Run the four extraction operations on a file and store their results.
fn process_file(input_path: &Path, args: &Args, storage: &mut dyn Storage) -> Result<()> {
    let extractor = build_extractor(input_path, args)?;

    let text = extractor
        .extract_text(input_path)
        .context("Text extraction failed")?;
    report("text", &text);
    let links = extractor
        .extract_links(input_path)
        .context("Link extraction failed")?;
    report("links", &links);
    let images = extractor
        .extract_images(input_path)
        .context("Image extraction failed")?;
    report("images", &images);
    let tables = extractor
        .extract_tables(input_path)
        .context("Table extraction failed")?;
    report("tables", &tables);

    if args.verbose {
        eprintln!(
            "  Found {} text records, {} links, {} images, {} tables",
            text.len(),
            links.len(),
            images.len(),
            tables.len()
        );
    }

    storage.store_data(StoreData::Text(&text.records))?;
    storage.store_data(StoreData::Links(&links.records))?;
    storage.store_data(StoreData::Images(&images.records))?;
    storage.store_data(StoreData::Tables(&tables.records))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_for_extension() {
        let name = |path: &str| loader_for(Path::new(path), PdfMode::Stream).unwrap().name();
        assert_eq!(name("a.pdf"), "PdfLoader");
        assert_eq!(name("a.DOCX"), "DocxLoader");
        assert_eq!(name("a.pptx"), "PptxLoader");
        assert_eq!(name("a.ppt"), "PptLoader");
    }

    #[test]
    fn test_pdf_pages_mode() {
        let args = Args::parse_from(["docex", "--pdf-mode", "pages", "report.pdf"]);
        assert_eq!(args.pdf_mode, PdfMode::Pages);
        let loader = loader_for(Path::new("report.pdf"), args.pdf_mode).unwrap();
        assert_eq!(loader.name(), "PdfPagesLoader");
        let loader = loader_for(Path::new("deck.pptx"), args.pdf_mode).unwrap();
        assert_eq!(loader.name(), "PptxLoader");
    }

    #[test]
    fn test_unsupported_file_type() {
        let err = loader_for(Path::new("book.xlsx"), PdfMode::Stream).err().unwrap();
        assert_eq!(err.to_string(), "Unsupported file type.");
        assert!(loader_for(Path::new("noext"), PdfMode::Pages).is_err());
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["docex", "--storage", "sql", "--no-layout", "deck.pptx"]);
        assert_eq!(args.storage, StorageMethod::Sql);
        assert!(args.no_layout);
        assert_eq!(args.pdf_mode, PdfMode::Stream);
        assert_eq!(args.output, PathBuf::from("output"));
        assert_eq!(args.db, PathBuf::from("extracted_data.db"));
        assert_eq!(args.input, vec![PathBuf::from("deck.pptx")]);
    }

    #[test]
    fn test_missing_input_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::parse_from([
            "docex",
            "--output",
            dir.path().to_str().unwrap(),
            "missing.docx",
        ]);
        let mut storage = open_storage(&args).unwrap();
        let err = process_file(Path::new("missing.docx"), &args, storage.as_mut()).unwrap_err();
        assert!(format!("{:#}", err).contains("File not found"));
    }
}
