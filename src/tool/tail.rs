//! Bounded tail of a (possibly huge) log file

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Caps applied to captured tool diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailLimits {
    pub max_bytes: u64,
    pub max_lines: usize,
}

impl Default for TailLimits {
    fn default() -> Self {
        Self {
            max_bytes: 64 * 1024,
            max_lines: 200,
        }
    }
}

/// Read at most the last `max_bytes` of `path`, then keep the last `max_lines` lines
///
/// Only the tail is ever loaded into memory. Read errors are folded into
/// the returned text since the tail is purely diagnostic.
pub fn read_tail(path: &Path, limits: TailLimits) -> String {
    match read_tail_bytes(path, limits.max_bytes) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let lines: Vec<&str> = text.lines().collect();
            let start = lines.len().saturating_sub(limits.max_lines);
            lines[start..].join("\n")
        }
        Err(e) => format!("<unable to read diagnostic log: {}>", e),
    }
}

fn read_tail_bytes(path: &Path, max_bytes: u64) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let size = file.seek(SeekFrom::End(0))?;
    file.seek(SeekFrom::Start(size.saturating_sub(max_bytes)))?;

    let mut buf = Vec::with_capacity(size.min(max_bytes) as usize);
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_short_file_is_returned_whole() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ffmpeg.log");
        fs::write(&path, "line one\nline two\n").unwrap();

        assert_eq!(read_tail(&path, TailLimits::default()), "line one\nline two");
    }

    #[test]
    fn test_line_cap_keeps_last_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ffmpeg.log");
        let content: String = (0..500).map(|i| format!("frame {}\n", i)).collect();
        fs::write(&path, content).unwrap();

        let tail = read_tail(
            &path,
            TailLimits {
                max_bytes: 1024 * 1024,
                max_lines: 3,
            },
        );
        assert_eq!(tail, "frame 497\nframe 498\nframe 499");
    }

    #[test]
    fn test_byte_cap_bounds_output() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ffmpeg.log");
        fs::write(&path, "x".repeat(10_000) + "\nlast line").unwrap();

        let tail = read_tail(
            &path,
            TailLimits {
                max_bytes: 64,
                max_lines: 200,
            },
        );
        assert!(tail.len() <= 64);
        assert!(tail.ends_with("last line"));
    }

    #[test]
    fn test_missing_file_yields_placeholder() {
        let tail = read_tail(Path::new("/nonexistent/ffmpeg.log"), TailLimits::default());
        assert!(tail.starts_with("<unable to read diagnostic log"));
    }
}
