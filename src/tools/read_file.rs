use serde::Deserialize;
use serde_json::{json, Value};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::{parse_input, Tool};
use crate::error::ToolError;
use crate::sandbox::{Access, WorkingRoot};

pub struct ReadFileTool {
    /// Paths are resolved relative to this.
    root: WorkingRoot,
    /// Maximum number of characters returned.
    max_chars: usize,
}

impl ReadFileTool {
    pub fn new(root: WorkingRoot, max_chars: usize) -> Self {
        Self { root, max_chars }
    }
}

#[derive(Deserialize)]
struct ReadFileInput {
    file_path: String,
}

/// Reads no more than is needed to hold `max_chars + 1` characters.
///
/// The extra character is what tells a file at the cap from a longer one.
fn read_prefix(path: &Path, max_chars: usize) -> Result<String, ToolError> {
    let limit = (max_chars as u64 + 1) * 4;
    let mut bytes = Vec::new();
    File::open(path)?.take(limit).read_to_end(&mut bytes)?;

    let end = match std::str::from_utf8(&bytes) {
        Ok(_) => bytes.len(),
        // A multi-byte character split by the byte limit.
        Err(e) if e.error_len().is_none() && bytes.len() as u64 == limit => e.valid_up_to(),
        Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e).into()),
    };
    bytes.truncate(end);
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Cuts `text` to at most `max_chars` characters.
///
/// Returns `None` when the text already fits.
fn truncate_chars(text: &str, max_chars: usize) -> Option<&str> {
    text.char_indices()
        .nth(max_chars)
        .map(|(byte_index, _)| &text[..byte_index])
}

#[async_trait::async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "get_file_content"
    }

    fn description(&self) -> &str {
        "Reads the content of a specified file, constrained to the working directory."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the file to read, relative to the working directory."
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, input: Value) -> Result<String, ToolError> {
        let input: ReadFileInput = parse_input(self.name(), input)?;
        let path = self.root.resolve(&input.file_path, Access::Read)?;

        if !path.is_file() {
            return Err(ToolError::NotAFile(input.file_path));
        }

        let content = read_prefix(&path, self.max_chars)?;
        match truncate_chars(&content, self.max_chars) {
            Some(head) => Ok(format!(
                "{head}[...File \"{}\" truncated at {} characters]",
                input.file_path, self.max_chars
            )),
            None => Ok(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{read_prefix, truncate_chars};
    use std::fs;

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), Some("hé"));
        assert_eq!(truncate_chars("héllo", 5), None);
        assert_eq!(truncate_chars("", 0), None);
    }

    #[test]
    fn test_read_prefix_stops_near_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.txt");
        fs::write(&path, "x".repeat(1_000_000)).unwrap();
        assert_eq!(read_prefix(&path, 10).unwrap().len(), 44);
    }

    #[test]
    fn test_read_prefix_drops_split_character() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("euro.txt");
        // 16-byte limit lands one byte into the sixth three-byte character.
        fs::write(&path, "€".repeat(8)).unwrap();
        assert_eq!(read_prefix(&path, 3).unwrap(), "€".repeat(5));
    }

    #[test]
    fn test_read_prefix_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [0x66, 0xff, 0x6f]).unwrap();
        assert!(read_prefix(&path, 10).is_err());
    }
}
