//! Plaintext log of summit references that failed to resolve.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write as _};
use std::path::Path;

use sota_map_spot_models::SummitMiss;

use crate::EnrichError;

/// Appends the summit reference of every miss to `path`, one per line,
/// creating the file if needed. Does nothing when `misses` is empty.
///
/// # Errors
///
/// Returns [`EnrichError::Io`] if the file cannot be opened or written.
pub fn append_error_log(path: &Path, misses: &[SummitMiss]) -> Result<(), EnrichError> {
    if misses.is_empty() {
        return Ok(());
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for miss in misses {
        writeln!(writer, "{}", miss.summit_code)?;
    }
    writer.flush()?;

    log::info!(
        "Appended {} unknown summit(s) to {}",
        misses.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn miss(code: &str) -> SummitMiss {
        SummitMiss {
            summit_code: code.to_string(),
            activator_callsign: "M0ABC".to_string(),
            frequency_mhz: 7.032,
            mode: "CW".to_string(),
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sota_map_{name}_{}.txt", std::process::id()))
    }

    #[test]
    fn appends_across_runs() {
        let path = temp_path("errors_append");
        let _ = std::fs::remove_file(&path);

        append_error_log(&path, &[miss("G/LD-999")]).unwrap();
        append_error_log(&path, &[miss("SP/XX-001"), miss("W7A/XX-002")]).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "G/LD-999\nSP/XX-001\nW7A/XX-002\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn every_miss_gets_a_line() {
        let path = temp_path("errors_repeat");
        let _ = std::fs::remove_file(&path);

        append_error_log(&path, &[miss("G/LD-999"), miss("G/LD-999")]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "G/LD-999\nG/LD-999\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = std::env::temp_dir();
        assert!(matches!(
            append_error_log(&dir, &[miss("G/LD-999")]),
            Err(EnrichError::Io(_))
        ));
    }

    #[test]
    fn no_misses_creates_no_file() {
        let path = temp_path("errors_empty");
        let _ = std::fs::remove_file(&path);
        append_error_log(&path, &[]).unwrap();
        assert!(!path.exists());
    }
}
