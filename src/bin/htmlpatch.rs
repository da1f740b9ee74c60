//! Command-line front end: patches an HTML configuration file by path.
//!
//! ```text
//! htmlpatch web.html \
//!     --set "html/connectionStrings/add[@name='Db']/@connectionString=Server=db1" \
//!     --remove "html/appSettings/add[@key='Debug']"
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn, Level};

use htmlpatch::patch::{split_path, DEFAULT_SEPARATOR};
use htmlpatch::{ContentMode, HtmlDocument, PatchOptions};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// htmlpatch -- set and delete values in HTML documents by path.
#[derive(Parser, Debug)]
#[command(name = "htmlpatch", version, about, long_about = None)]
struct Cli {
    /// The document to patch (use `-` for stdin).
    file: String,

    /// Set PATH to VALUE. May be repeated; applied in order.
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    sets: Vec<(String, String)>,

    /// Delete the element or attribute at PATH. May be repeated; applied
    /// after all `--set` operations.
    #[arg(long = "remove", value_name = "PATH")]
    removes: Vec<String>,

    /// Character separating path items.
    #[arg(long, default_value_t = DEFAULT_SEPARATOR)]
    separator: char,

    /// Treat values as literal text instead of markup.
    #[arg(long)]
    text: bool,

    /// Input encoding label (e.g. `windows-1252`); detected when omitted.
    #[arg(long, value_name = "LABEL")]
    encoding: Option<String>,

    /// Save output to a file instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<String>,

    /// Log each created and removed node.
    #[arg(long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_READ_ERROR: u8 = 1;
const EXIT_PATCH_ERROR: u8 = 2;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    ExitCode::from(run(&cli))
}

fn run(cli: &Cli) -> u8 {
    // -- Read and parse ----------------------------------------------------
    let bytes = match read_input(&cli.file) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{}: failed to read: {e}", cli.file);
            return EXIT_READ_ERROR;
        }
    };

    let options = PatchOptions::default().content_mode(if cli.text {
        ContentMode::Text
    } else {
        ContentMode::Markup
    });
    let mut doc = match HtmlDocument::from_bytes(&bytes, cli.encoding.as_deref(), options) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{}: {e}", cli.file);
            return EXIT_READ_ERROR;
        }
    };
    for diagnostic in doc.diagnostics() {
        warn!("{}: {diagnostic}", cli.file);
    }

    // -- Patch -------------------------------------------------------------
    for (path, value) in &cli.sets {
        let items = split_path(path, cli.separator);
        debug!(path = %path, "set");
        if let Err(e) = doc.set_value(&items, value) {
            eprintln!("{}: {e}", cli.file);
            return EXIT_PATCH_ERROR;
        }
    }
    for path in &cli.removes {
        let items = split_path(path, cli.separator);
        debug!(path = %path, "remove");
        if let Err(e) = doc.delete_key(&items) {
            eprintln!("{}: {e}", cli.file);
            return EXIT_PATCH_ERROR;
        }
    }

    // -- Output ------------------------------------------------------------
    let out = match doc.to_bytes() {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{}: {e}", cli.file);
            return EXIT_PATCH_ERROR;
        }
    };
    if let Err(e) = write_output(cli.output.as_deref(), &out) {
        eprintln!("failed to write output: {e}");
        return EXIT_READ_ERROR;
    }

    EXIT_SUCCESS
}

/// Splits `PATH=VALUE` at the first `=` outside a filter's brackets.
fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let mut depth = 0usize;
    for (i, ch) in arg.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => return Ok((arg[..i].to_string(), arg[i + 1..].to_string())),
            _ => {}
        }
    }
    Err(format!("expected PATH=VALUE, got `{arg}`"))
}

fn read_input(filename: &str) -> io::Result<Vec<u8>> {
    if filename == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(filename)
    }
}

fn write_output(path: Option<&str>, bytes: &[u8]) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, bytes),
        None => io::stdout().write_all(bytes),
    }
}
