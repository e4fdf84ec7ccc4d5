use std::path::Path;

use crate::error::{Error, Result};

/// Read a text file into one `String` per line, without line terminators.
pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn splits_lines_without_terminators() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"2011_09_26/drive_0001 0000000005 l\r\nscene two\nlast")
            .expect("write");
        let lines = read_lines(file.path()).expect("read");
        assert_eq!(
            lines,
            vec!["2011_09_26/drive_0001 0000000005 l", "scene two", "last"]
        );
    }

    #[test]
    fn trailing_newline_adds_no_entry() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"a\nb\n").expect("write");
        assert_eq!(read_lines(file.path()).expect("read"), vec!["a", "b"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = read_lines(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, Error::ReadFile { .. }));
    }
}
