//! CLI tool for building a page index of names in a PDF

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::error;
use pdf_names_indexer::{
    index_names, IndexOptions, LogDiagnostics, PagesIncluded, PdfDocument, ReportOptions,
};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

/// Parses an input PDF document for a set of names to generate a page index
#[derive(Parser, Debug)]
#[command(name = "pdf-names-indexer", version, about, long_about = None)]
struct Cli {
    /// PDF file to be parsed
    pdf_file: PathBuf,

    /// Text document containing one name per line, UTF-8 encoding expected
    names_file: PathBuf,

    /// Output file; if omitted the index is printed to the console
    outfile: Option<PathBuf>,

    /// Keep the names list in file order instead of sorting it
    #[arg(long = "preserve_order")]
    preserve_order: bool,

    /// Make the names search case-sensitive
    #[arg(long = "case_sensitive")]
    case_sensitive: bool,

    /// String separating a name from its listing of pages
    #[arg(long, default_value = " : ")]
    separator: String,

    /// String separating one page number from another
    #[arg(long = "pages_separator", default_value = ", ")]
    pages_separator: String,

    /// String preceding each page number
    #[arg(long = "page_prefix", default_value = "")]
    page_prefix: String,

    /// Offset added to the printed page numbers; the first page in the PDF is page 1
    #[arg(long = "page_offset", default_value_t = 0, allow_hyphen_values = true)]
    page_offset: i64,

    /// Only scan these pages, e.g. "1,11..79,400..450"
    #[arg(long = "pages_included", value_name = "SPEC")]
    pages_included: Option<PagesIncluded>,

    /// Also list names without any occurrence in the output
    #[arg(long = "print_unfound")]
    print_unfound: bool,

    /// Password for opening the PDF file
    #[arg(long)]
    password: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let pdf_bytes = fs::read(&cli.pdf_file).unwrap_or_else(|e| {
        usage_error(format!(
            "PDF file cannot be read: {}: {}",
            cli.pdf_file.display(),
            e
        ))
    });
    let names_text = fs::read_to_string(&cli.names_file).unwrap_or_else(|e| {
        usage_error(format!(
            "names file cannot be read: {}: {}",
            cli.names_file.display(),
            e
        ))
    });
    let mut out: Box<dyn Write> = match &cli.outfile {
        Some(path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(e) => usage_error(format!(
                "problem when opening file for writing: {}: {}",
                path.display(),
                e
            )),
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let options = IndexOptions {
        sort: !cli.preserve_order,
        case_insensitive: !cli.case_sensitive,
        pages_included: cli.pages_included.unwrap_or_default(),
        report: ReportOptions {
            separator: cli.separator,
            pages_separator: cli.pages_separator,
            page_prefix: cli.page_prefix,
            page_offset: cli.page_offset,
            print_unfound: cli.print_unfound,
        },
    };

    let result = PdfDocument::from_bytes(&pdf_bytes, cli.password.as_deref())
        .and_then(|document| {
            index_names(
                &document,
                &names_text,
                &mut out,
                &options,
                &mut LogDiagnostics,
            )
        });

    if let Err(e) = result.and_then(|_| out.flush().map_err(Into::into)) {
        error!("{}: {}", cli.pdf_file.display(), e);
        process::exit(1);
    }
}

/// Print `message` with the usage help and exit
fn usage_error(message: String) -> ! {
    Cli::command().error(ErrorKind::Io, message).exit()
}
