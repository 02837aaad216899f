//! INI file configuration adapter.

use crate::domain::error::OracleFuseError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, OracleFuseError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| OracleFuseError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, OracleFuseError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| OracleFuseError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn typed_getters_read_values() {
        let content = r#"
[windows]
price = 30

[macd]
long_macd_threshold = 0.25
require_cross = on

[bootstrap]
symbols = MS,HOOD
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_int("windows", "price", 0), 30);
        assert_eq!(adapter.get_double("macd", "long_macd_threshold", 0.0), 0.25);
        assert!(adapter.get_bool("macd", "require_cross", false));
        assert_eq!(
            adapter.get_string("bootstrap", "symbols"),
            Some("MS,HOOD".to_string())
        );
    }

    #[test]
    fn missing_or_malformed_falls_back_to_default() {
        let adapter =
            FileConfigAdapter::from_string("[windows]\nprice = abc\nflag = maybe\n").unwrap();
        assert_eq!(adapter.get_int("windows", "price", 42), 42);
        assert_eq!(adapter.get_double("windows", "missing", 9.5), 9.5);
        assert!(adapter.get_bool("windows", "flag", true));
        assert!(!adapter.get_bool("windows", "flag", false));
        assert_eq!(adapter.get_string("nosuch", "key"), None);
    }

    #[test]
    fn bool_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[exit]\na = yes\nb = 1\nc = False\nd = off\n",
        )
        .unwrap();
        assert!(adapter.get_bool("exit", "a", false));
        assert!(adapter.get_bool("exit", "b", false));
        assert!(!adapter.get_bool("exit", "c", true));
        assert!(!adapter.get_bool("exit", "d", true));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[cadence]\nsample_hour = 11\n").unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_int("cadence", "sample_hour", 10), 11);
    }

    #[test]
    fn from_file_missing_is_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/oraclefuse.ini");
        assert!(matches!(result, Err(OracleFuseError::ConfigParse { .. })));
    }
}
