//! claim-forge – command-line claim PDF generator.
//!
//! Usage:
//!   claim-forge <form.json> [output.pdf] [--attach FILE]... [--assets DIR]
//!               [--date YYYY-MM-DD] [--title T] [--single-page]
//!               [--layout-json FILE] [--skip-validation]
//!
//! `form.json` holds the submitted form values as a JSON object. If
//! `output.pdf` is omitted the PDF is written next to the input file with the
//! same stem (e.g. `claim.json` → `claim.pdf`).

use std::{env, fs, path::PathBuf, process};

use chrono::NaiveDate;
use claim_forge::assets::{AssetSource, DirectoryAssets, NoAssets};
use claim_forge::attachment::{AttachmentResource, MediaType};
use claim_forge::forms::{fields, FormValues};
use claim_forge::pipeline::{assemble_layout, generate_claim_document, AssemblyConfig};
use claim_forge::validation::validate;

/// Exit code when the form has field errors.
const EXIT_INVALID: i32 = 2;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut attach: Vec<PathBuf> = Vec::new();
    let mut assets_dir: Option<PathBuf> = None;
    let mut date: Option<NaiveDate> = None;
    let mut title: Option<String> = None;
    let mut single_page = false;
    let mut layout_json: Option<PathBuf> = None;
    let mut skip_validation = false;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--attach" | "-a" => attach.push(PathBuf::from(flag_value(&mut iter, arg, &args[0]))),
            "--assets" => assets_dir = Some(PathBuf::from(flag_value(&mut iter, arg, &args[0]))),
            "--date" => {
                let raw = flag_value(&mut iter, arg, &args[0]);
                match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    Ok(d) => date = Some(d),
                    Err(e) => {
                        eprintln!("Invalid --date '{raw}': {e}");
                        process::exit(1);
                    }
                }
            }
            "--title" | "-t" => title = Some(flag_value(&mut iter, arg, &args[0]).to_string()),
            "--single-page" => single_page = true,
            "--layout-json" => {
                layout_json = Some(PathBuf::from(flag_value(&mut iter, arg, &args[0])))
            }
            "--skip-validation" => skip_validation = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    let input = match input_path {
        Some(p) => p,
        None => {
            eprintln!("Error: no form file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let output = output_path.unwrap_or_else(|| {
        let mut o = input.clone();
        o.set_extension("pdf");
        o
    });

    let mut values: FormValues = match fs::read_to_string(&input)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error reading form '{}': {e}", input.display());
            process::exit(1);
        }
    };

    if !attach.is_empty() {
        let mut attachments = values.attachments(fields::ATTACHMENTS).to_vec();
        for path in &attach {
            let data = match fs::read(path) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("Error reading attachment '{}': {e}", path.display());
                    process::exit(1);
                }
            };
            let name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("attachment")
                .to_string();
            attachments.push(AttachmentResource::new(name, MediaType::from_path(path), data));
        }
        values.insert(fields::ATTACHMENTS, attachments);
    }

    let default_title = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("claim-forge output")
        .to_string();

    let mut config = if single_page {
        AssemblyConfig::single_page()
    } else {
        AssemblyConfig::default()
    };
    config.title = title.unwrap_or(default_title);
    if let Some(d) = date {
        config.issue_date = d;
    }

    if !skip_validation {
        if let Err(errors) = validate(&values, config.issue_date) {
            eprintln!("The form has {} field error(s):", errors.len());
            for (field, message) in errors.iter() {
                eprintln!("  {field}: {message}");
            }
            process::exit(EXIT_INVALID);
        }
    }

    let assets: Box<dyn AssetSource> = match assets_dir {
        Some(dir) => Box::new(DirectoryAssets::new(dir)),
        None => Box::new(NoAssets),
    };

    if let Some(path) = &layout_json {
        match assemble_layout(&values, &config, assets.as_ref()) {
            Ok((layout, _)) => {
                if let Err(e) = fs::write(path, layout.to_json()) {
                    eprintln!("Error writing '{}': {e}", path.display());
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error generating PDF: {e}");
                process::exit(1);
            }
        }
    }

    match generate_claim_document(&values, &config, assets.as_ref()) {
        Ok(bytes) => {
            // Create output directory if necessary.
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = fs::create_dir_all(parent) {
                        eprintln!("Error creating output directory: {e}");
                        process::exit(1);
                    }
                }
            }
            if let Err(e) = fs::write(&output, &bytes) {
                eprintln!("Error writing '{}': {e}", output.display());
                process::exit(1);
            }
            let pages = lopdf::Document::load_mem(&bytes)
                .map(|doc| doc.get_pages().len())
                .unwrap_or(0);
            eprintln!(
                "Wrote '{}' ({} bytes, {} page{})",
                output.display(),
                bytes.len(),
                pages,
                if pages == 1 { "" } else { "s" }
            );
        }
        Err(e) => {
            eprintln!("Error generating PDF: {e}");
            process::exit(1);
        }
    }
}

/// Next argument as the value of `flag`, or exit with usage.
fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str, prog: &str) -> &'a str {
    match iter.next() {
        Some(v) => v,
        None => {
            eprintln!("Flag {flag} needs a value.");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("claim-forge – expense claim PDF generator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <form.json> [output.pdf] [--attach FILE]... [--assets DIR]");
    eprintln!("      [--date YYYY-MM-DD] [--title T] [--single-page] [--layout-json FILE]");
    eprintln!("      [--skip-validation]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <form.json>        Submitted form values as a JSON object");
    eprintln!("  [output.pdf]       Output path  (default: same stem as input with .pdf)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --attach, -a       Append a PDF, JPEG or PNG file (repeatable; type from extension)");
    eprintln!("  --assets           Directory holding arcadia.png and sma_logo.png");
    eprintln!("  --date             Issue date printed on the claim (default: today)");
    eprintln!("  --title, -t        Document title in PDF metadata (default: input filename stem)");
    eprintln!("  --single-page      Clip overflowing content instead of adding pages");
    eprintln!("  --layout-json      Also write the computed layout as JSON to FILE");
    eprintln!("  --skip-validation  Generate even when the form has field errors");
    eprintln!("  --help             Print this message");
}
