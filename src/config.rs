use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub employee_data_file: PathBuf,
    pub attendance_file: PathBuf,

    // Logging
    pub log_dir: PathBuf,
    pub log_file: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source; missing or unparseable values use defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            employee_data_file: var("EMPLOYEE_DATA_FILE", "employee_data.txt").into(),
            attendance_file: var("ATTENDANCE_FILE", "attendance.txt").into(),

            log_dir: var("LOG_DIR", "logs").into(),
            log_file: var("LOG_FILE", "app.log"),
            log_level: var("LOG_LEVEL", "info").parse().unwrap_or(Level::INFO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_classic_file_names() {
        let config = config_from(&[]);

        assert_eq!(config.employee_data_file, PathBuf::from("employee_data.txt"));
        assert_eq!(config.attendance_file, PathBuf::from("attendance.txt"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.log_file, "app.log");
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = config_from(&[
            ("EMPLOYEE_DATA_FILE", "/srv/hr/staff.txt"),
            ("ATTENDANCE_FILE", "/srv/hr/punches.txt"),
            ("LOG_LEVEL", "debug"),
        ]);

        assert_eq!(config.employee_data_file, PathBuf::from("/srv/hr/staff.txt"));
        assert_eq!(config.attendance_file, PathBuf::from("/srv/hr/punches.txt"));
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn bad_log_level_falls_back_to_info() {
        let config = config_from(&[("LOG_LEVEL", "chatty")]);
        assert_eq!(config.log_level, Level::INFO);
    }
}
