use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path
};

use crate::{
    error::Result,
    model::Paper
};

// Utils to read and write the run's files on the local device.
pub struct LocalSaver;

impl LocalSaver {
    /// One JSON object per line. Blank lines are skipped; anything else that
    /// does not decode fails the whole read.
    pub fn load_jsonl(path: &Path) -> Result<Vec<Paper>> {
        let reader = BufReader::new(File::open(path)?);
        let mut papers = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            papers.push(serde_json::from_str(&line)?);
        }
        Ok(papers)
    }

    /// Truncates and rewrites the whole file.
    pub fn save_jsonl<'a>(path: &Path, papers: impl IntoIterator<Item = &'a Paper>) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        papers.into_iter().try_for_each(|paper| -> Result<()> {
            serde_json::to_writer(&mut file, paper)?;
            file.write_all(b"\n")?;
            Ok(())
        })?;
        file.flush()?;
        Ok(())
    }

    pub fn save_markdown(path: &Path, document: &str) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(document.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
