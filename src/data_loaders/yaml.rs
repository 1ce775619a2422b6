use std::{fs, io, path::Path};

use serde_yaml::Value;

use crate::warn;

/// Reads a YAML document. A missing file is not worth a warning; an
/// unreadable or malformed one is.
pub fn load_yaml(path: &Path) -> Option<Value> {
    let txt = match fs::read_to_string(path) {
        Ok(txt) => txt,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read {}: {e}", path.display());
            return None;
        }
    };

    parse_yaml(&txt).or_else(|| {
        warn!("Failed to parse {} as YAML", path.display());
        None
    })
}

pub fn parse_yaml(txt: &str) -> Option<Value> {
    serde_yaml::from_str::<Value>(txt).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_yaml(&dir.path().join("absent.yaml")).is_none());
    }

    #[test]
    fn malformed_file_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "settings: [unterminated").unwrap();
        assert!(load_yaml(&path).is_none());
    }

    #[test]
    fn reads_a_mapping() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ok.yaml");
        fs::write(&path, "debug: true\n").unwrap();
        let value = load_yaml(&path).unwrap();
        assert_eq!(value["debug"].as_bool(), Some(true));
    }
}
