use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn to_json<T: Serialize>(obj: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(obj)?)
}

/// Writes an object as pretty JSON, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &str, obj: &T) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, to_json(obj)?)?;
    debug!("Wrote {}", path);
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let raw = fs_err::read_to_string(path)?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_file_roundtrip() {
        let path = std::env::temp_dir()
            .join("abstutil_io_test")
            .join("nested")
            .join("values.json");
        let path = path.to_str().unwrap().to_string();

        write_json(&path, &vec![1.5, 2.0, -3.25]).unwrap();
        let back: Vec<f64> = read_json(&path).unwrap();
        assert_eq!(back, vec![1.5, 2.0, -3.25]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result: Result<Vec<f64>> = read_json("/definitely/not/here.json");
        assert!(result.is_err());
    }
}
