// File loaders for moderation settings: extra lexicon terms and thresholds.
//
// Extra terms file: one term per line, blank lines ignored, `#` starts a
// comment line. Thresholds file: a JSON object with any subset of the
// ModerationConfig fields.

use crate::core::moderation::{Lexicon, ModerationConfig};
use anyhow::Context;
use std::path::Path;

pub fn parse_terms(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Append the terms in `path` to `lexicon`.
pub fn extend_from_file(lexicon: &mut Lexicon, path: &Path) -> anyhow::Result<usize> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading extra terms from {}", path.display()))?;

    let before = lexicon.len();
    lexicon.extend(parse_terms(&contents));
    let added = lexicon.len() - before;

    tracing::info!(path = %path.display(), added, "Loaded extra lexicon terms");
    Ok(added)
}

pub fn load_config(path: &Path) -> anyhow::Result<ModerationConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading moderation config from {}", path.display()))?;
    let config: ModerationConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing moderation config {}", path.display()))?;

    tracing::info!(path = %path.display(), "Loaded moderation thresholds");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_terms_skips_comments_and_blanks() {
        let terms = parse_terms("# okul argosu\n\n  zıpzıp  \nşapşal\n   # yorum\n");
        assert_eq!(terms, vec!["zıpzıp", "şapşal"]);
    }

    #[test]
    fn test_extend_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# ek kelimeler").unwrap();
        writeln!(file, "Zıpzıp").unwrap();
        writeln!(file, "bok").unwrap();

        let mut lexicon = Lexicon::standard();
        let before = lexicon.len();
        let added = extend_from_file(&mut lexicon, file.path()).unwrap();

        // "bok" is already listed
        assert_eq!(added, 1);
        assert_eq!(lexicon.len(), before + 1);
        assert!(lexicon.lookup().iter().any(|t| t == "zıpzıp"));
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "body_max_chars": 500, "max_char_run": 4 }}"#).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.body_max_chars, 500);
        assert_eq!(config.max_char_run, 4);
        assert_eq!(config.body_min_chars, 10);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/moderation.json")).is_err());
    }
}
