//! Convert command handler

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use humansize::{format_size, BINARY};

use conv2md::cli::ConvertArgs;
use conv2md::files::filename::{self, NameConfig};
use conv2md::{Config, Conversation, JsonConverter, MarkdownGenerator, Metadata, MetadataValue};

/// Run `convert`: parse the input file, render Markdown, then write it out.
pub fn handle(args: &ConvertArgs, config: &Config) -> Result<()> {
    if is_url(&args.input) {
        return handle_web(&args.input);
    }

    let input = Path::new(&args.input);
    if !input.exists() {
        bail!("File not found: {}", input.display());
    }
    if !input.is_file() {
        bail!("Not a file: {}", input.display());
    }

    let bytes = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let conversation = JsonConverter::new()
        .parse_bytes(&bytes)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    let metadata = (config.output.frontmatter && !args.no_frontmatter)
        .then(|| build_metadata(args, &conversation, input));

    let report = MarkdownGenerator::new().generate_report(&conversation, metadata.as_ref());
    if args.metrics {
        eprintln!("{}", report.metrics.to_json()?);
    }
    let markdown = report
        .markdown
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    match resolve_output(args.out.as_deref(), config, input)? {
        None => println!("{}", markdown),
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(&path, &markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Converted {} messages to {} ({})",
                conversation.len(),
                path.display(),
                format_size(markdown.len(), BINARY)
            );
        }
    }

    Ok(())
}

/// Website conversion is declared but not available.
pub fn handle_web(url: &str) -> Result<()> {
    bail!("Website conversion is not implemented yet: {}", url)
}

fn is_url(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Frontmatter fields: `source`, `title`, then `--meta` pairs (which win).
fn build_metadata(args: &ConvertArgs, conversation: &Conversation, input: &Path) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(
        "source".to_string(),
        MetadataValue::Text(input.display().to_string()),
    );

    let title = args
        .title
        .clone()
        .or_else(|| conversation.title.clone())
        .unwrap_or_else(|| input_stem(input));
    metadata.insert("title".to_string(), MetadataValue::Text(title));

    for (key, value) in &args.meta {
        metadata.insert(key.clone(), MetadataValue::infer(value));
    }
    metadata
}

fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Decide where the document goes. `None` means stdout.
///
/// A `.md` path is used as is; a directory (existing or ending in a
/// separator) gets a templated name; any other path is taken as the file.
fn resolve_output(out: Option<&Path>, config: &Config, input: &Path) -> Result<Option<PathBuf>> {
    let dir = match out {
        Some(path) if has_md_extension(path) => return Ok(Some(path.to_path_buf())),
        Some(path) if path.is_dir() || ends_with_separator(path) => path.to_path_buf(),
        Some(path) => return Ok(Some(path.to_path_buf())),
        None => match &config.output.directory {
            Some(dir) => dir.clone(),
            None => return Ok(None),
        },
    };

    let name = filename::generate(
        &input_stem(input),
        &config.output.filename_template,
        &NameConfig::default(),
    )
    .context("Invalid output filename template")?;
    Ok(Some(dir.join(name)))
}

fn has_md_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}
