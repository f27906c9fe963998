//! Deterministic rendering of the assembled series as JavaScript modules

pub mod energy;
pub mod petroleum;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::info;

use crate::error::{PrepError, Result};

pub use energy::{NATIONAL_EXPORT, STATE_EXPORT, render_energy_module};
pub use petroleum::{DEFAULT_SHARE_EXPORT, SHARE_EXPORT, render_share_module};

/// Join rendered lines with `\n`, ending with a trailing newline
fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// List separator: every entry but the last gets a comma
fn separator(index: usize, len: usize) -> &'static str {
    if index + 1 == len { "" } else { "," }
}

/// JavaScript string literal for arbitrary text
fn js_string(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

/// Object key: bare when it is a valid identifier, quoted otherwise
fn js_key(key: &str) -> String {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    let ident = IDENT.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
    });
    if ident.is_match(key) {
        key.to_string()
    } else {
        js_string(key)
    }
}

fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PrepError::InvalidStructure(format!("not a file path: {}", path.display())))?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

/// Replace the file at `path` with `contents`.
///
/// Written to a sibling temporary file first and renamed into place, so the
/// destination is never left half-written.
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    let tmp_path = temp_path_for(path)?;

    let written = (|| -> std::io::Result<()> {
        let mut tmp = fs::File::create(&tmp_path)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    info!(path = %path.display(), bytes = contents.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator() {
        assert_eq!(separator(0, 3), ",");
        assert_eq!(separator(1, 3), ",");
        assert_eq!(separator(2, 3), "");
        assert_eq!(separator(0, 1), "");
    }

    #[test]
    fn test_js_literals() {
        assert_eq!(js_string("CA"), "\"CA\"");
        assert_eq!(js_string("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(js_key("TX"), "TX");
        assert_eq!(js_key("D.C."), "\"D.C.\"");
        assert_eq!(js_key("2X"), "\"2X\"");
    }

    #[test]
    fn test_write_output_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energyData.js");
        fs::write(&path, "stale contents that are longer than the new ones\n").unwrap();

        write_output(&path, "export const X = [];\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "export const X = [];\n");
        assert!(!dir.path().join(".energyData.js.tmp").exists());
    }

    #[test]
    fn test_write_output_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.js");
        assert!(matches!(write_output(&path, "x"), Err(PrepError::Io(_))));
        assert!(!path.exists());
    }
}
