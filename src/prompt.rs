//! Interactive disposition of reported directories.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use humansize::{DECIMAL, format_size};
use tracing::{info, warn};

use crate::ignore_list;

/// A single answer to the disposition prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Delete,
    Ignore,
    Skip,
    List,
    Parent,
}

impl Disposition {
    /// Parse one answer; anything unrecognised is `None`.
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim() {
            "d" => Some(Self::Delete),
            "i" => Some(Self::Ignore),
            "s" => Some(Self::Skip),
            "l" => Some(Self::List),
            "p" => Some(Self::Parent),
            _ => None,
        }
    }
}

/// What finally happened to a prompted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Deleted(PathBuf),
    Ignored(PathBuf),
    Skipped,
}

/// Line-oriented prompt over arbitrary input and output.
pub struct Prompt<R, W> {
    input: R,
    output: W,
    ignore_file: PathBuf,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W, ignore_file: impl Into<PathBuf>) -> Self {
        Self {
            input,
            output,
            ignore_file: ignore_file.into(),
        }
    }

    /// Ask what to do with `path` until the operator settles on an outcome.
    pub fn run(&mut self, path: &Path) -> io::Result<Outcome> {
        let mut current = path.to_path_buf();
        loop {
            let Some(answer) = self.ask("What to do [d/i/s/l/p]: ")? else {
                return Ok(Outcome::Skipped);
            };

            match Disposition::parse(&answer) {
                Some(Disposition::Delete) => {
                    let question = format!("Confirm delete of {} [y/N]: ", current.display());
                    let confirmed = self.ask(&question)?.is_some_and(|a| a.trim().eq_ignore_ascii_case("y"));
                    if !confirmed {
                        continue;
                    }
                    match remove(&current) {
                        Ok(()) => {
                            info!(path = %current.display(), "deleted");
                            return Ok(Outcome::Deleted(current));
                        }
                        Err(err) => {
                            warn!(path = %current.display(), error = %err, "delete failed");
                            writeln!(self.output, "Failed to delete {}: {err}", current.display())?;
                        }
                    }
                }
                Some(Disposition::Ignore) => {
                    ignore_list::append(&self.ignore_file, &current)?;
                    return Ok(Outcome::Ignored(current));
                }
                Some(Disposition::Skip) => return Ok(Outcome::Skipped),
                Some(Disposition::List) => self.list(&current)?,
                Some(Disposition::Parent) => {
                    if let Some(parent) = current.parent() {
                        current = parent.to_path_buf();
                    }
                    writeln!(self.output, "{}", current.display())?;
                }
                None => {}
            }
        }
    }

    /// Print `question` and read one line; `None` at end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn list(&mut self, dir: &Path) -> io::Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                writeln!(self.output, "Cannot list {}: {err}", dir.display())?;
                return Ok(());
            }
        };

        let mut children: Vec<(PathBuf, Option<u64>)> = entries
            .filter_map(Result::ok)
            .map(|entry| {
                let size = entry.metadata().ok().filter(|m| m.is_file()).map(|m| m.len());
                (entry.path(), size)
            })
            .collect();
        children.sort();

        for (child, size) in children {
            match size {
                Some(size) => writeln!(self.output, "{} {}", child.display(), format_size(size, DECIMAL))?,
                None => writeln!(self.output, "{}", child.display())?,
            }
        }
        Ok(())
    }
}

fn remove(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
