//! Translates stack VM intermediate language into Hack assembly.

pub mod ast;
pub mod config;
pub mod error;
pub mod labels;
pub mod parser;
pub mod segment;
pub mod translator;

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

pub use config::Config;
pub use error::{Error, ParseErrorKind, Result};
pub use labels::LabelAllocator;
pub use translator::Translator;

/// Translate one unit of VM source, drawing generated labels from `labels`.
///
/// `unit` scopes the `static` segment and names the source in errors.
pub fn translate_source(
    unit: &str,
    source: &str,
    labels: &mut LabelAllocator,
) -> Result<Vec<String>> {
    let program = parser::parse(unit, source)?;
    log::debug!("Parsed {} instructions from {}", program.len(), unit);
    Translator::new(unit, labels).translate(&program)
}

fn unit_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(OsStr::to_str)
        .map(str::to_string)
        .ok_or_else(|| Error::UnitName(path.to_path_buf()))
}

pub fn translate_file(path: &Path, labels: &mut LabelAllocator) -> Result<Vec<String>> {
    let unit = unit_name(path)?;
    let source = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    log::info!("Translating {} as unit {}", path.display(), unit);
    translate_source(&unit, &source, labels)
}

/// The `.vm` files directly inside `dir`, sorted by path.
pub fn vm_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut sources = vec![];
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "vm") {
            sources.push(path);
        }
    }

    if sources.is_empty() {
        return Err(Error::NoSources(dir.to_path_buf()));
    }
    sources.sort();
    Ok(sources)
}

/// Translate everything `config` names into one assembly program.
///
/// All units share a single label allocator, so generated labels are unique
/// across the whole output.
pub fn translate(config: &Config) -> Result<Vec<String>> {
    let mut labels = LabelAllocator::new();
    let mut out = vec![];

    if config.bootstrap {
        out.extend(Translator::new("Bootstrap", &mut labels).bootstrap());
    }

    let sources = if config.input.is_dir() {
        vm_sources(&config.input)?
    } else {
        vec![config.input.clone()]
    };
    for source in &sources {
        out.extend(translate_file(source, &mut labels)?);
    }

    log::debug!("Allocated {} generated labels", labels.issued());
    Ok(out)
}

/// Translate and write the result, returning the path written.
pub fn run(config: &Config) -> Result<PathBuf> {
    let lines = translate(config)?;
    let output = config.output_path();

    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(&output, text).map_err(|e| Error::io(&output, e))?;

    log::info!("Wrote {} lines to {}", lines.len(), output.display());
    Ok(output)
}
