use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn save_bytes(content: &[u8], dir: &Path, filename: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    let mut file = File::create(&path)?;
    file.write_all(content)?;
    tracing::info!(path = %path.display(), "written");
    Ok(path)
}

pub fn save_text(content: &str, dir: &Path, filename: &str) -> std::io::Result<PathBuf> {
    save_bytes(content.as_bytes(), dir, filename)
}

pub fn save_json<T: serde::Serialize>(data: &T, dir: &Path, filename: &str) -> std::io::Result<PathBuf> {
    let json = serde_json::to_string_pretty(data)?;
    save_text(&json, dir, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/out");
        let path = save_text("hello", &dir, "a.txt").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn json_is_pretty_printed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = save_json(&serde_json::json!({ "a": 1 }), tmp.path(), "a.json").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{\n  \"a\": 1\n}");
    }
}
