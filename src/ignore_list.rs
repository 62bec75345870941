//! Plain-text ignore list: one path per line.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Default ignore-list file, relative to the working directory.
pub const DEFAULT_IGNORE_FILE: &str = "ignorelist.txt";

/// Read ignore paths from `path`. A missing file is an empty list.
pub fn load(path: &Path) -> io::Result<Vec<PathBuf>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no ignore list");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}

/// Append `entry` on its own line, creating the file if needed.
pub fn append(path: &Path, entry: &Path) -> io::Result<()> {
    let needs_newline = match fs::read(path) {
        Ok(bytes) => bytes.last().is_some_and(|b| *b != b'\n'),
        Err(err) if err.kind() == io::ErrorKind::NotFound => false,
        Err(err) => return Err(err),
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_newline {
        file.write_all(b"\n")?;
    }
    writeln!(file, "{}", entry.display())?;
    debug!(path = %path.display(), entry = %entry.display(), "appended to ignore list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(load(&temp.path().join(DEFAULT_IGNORE_FILE)).unwrap().is_empty());
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ignore.txt");
        fs::write(&path, "\n/var/cache\n  /home/me/vm  \n\n").unwrap();

        assert_eq!(load(&path).unwrap(), vec![PathBuf::from("/var/cache"), PathBuf::from("/home/me/vm")]);
    }

    #[test]
    fn test_append_keeps_one_path_per_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ignore.txt");
        fs::write(&path, "/first").unwrap();

        append(&path, Path::new("/second")).unwrap();
        append(&path, Path::new("/third")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "/first\n/second\n/third\n");
    }

    #[test]
    fn test_append_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new.txt");
        append(&path, Path::new("/x")).unwrap();
        assert_eq!(load(&path).unwrap(), vec![PathBuf::from("/x")]);
    }
}
