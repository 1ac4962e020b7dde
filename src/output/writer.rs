//! Corpus artifact writer
//!
//! The corpus is written once, at the end of a successful crawl, as a single
//! JSON object mapping law names to law text in traversal order.

use crate::output::OutputResult;
use crate::state::Corpus;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes the corpus to `path`, replacing any existing file
///
/// # Arguments
///
/// * `corpus` - The corpus to serialize
/// * `path` - Destination file
/// * `pretty` - Indent the JSON instead of writing one line
pub fn write_corpus(corpus: &Corpus, path: &Path, pretty: bool) -> OutputResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, corpus)?;
    } else {
        serde_json::to_writer(&mut writer, corpus)?;
    }

    writer.flush()?;
    tracing::info!("Wrote {} laws to {}", corpus.len(), path.display());
    Ok(())
}

/// Reads a corpus artifact back, keeping its entry order
pub fn read_corpus(path: &Path) -> OutputResult<Corpus> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
