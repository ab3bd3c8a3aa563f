use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub fn get_path_from_str(input: &str) -> anyhow::Result<PathBuf> {
    let Some(rest) = input.strip_prefix('~') else {
        return Ok(PathBuf::from(input));
    };

    let home = home::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home dir"))?;
    let rest = rest.trim_start_matches(['/', '\\']);

    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

pub fn load_document_from_file(path: &Path) -> anyhow::Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON document", path.display()))
}
