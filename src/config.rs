/// Application configuration
/// In debug builds: loads .env, then environment variables
/// In release builds: environment variables only
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Wire native file drops when the host supports them
    pub enable_file_drop: bool,
    /// Default tracing filter, used when RUST_LOG is unset
    pub log_filter: String,
    pub window_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_file_drop: true,
            log_filter: "info".to_string(),
            window_title: "Intake".to_string(),
        }
    }
}

impl Config {
    /// Load configuration based on build mode
    pub fn load() -> Self {
        #[cfg(debug_assertions)]
        {
            // Runs before logging is up, hence println
            if dotenvy::dotenv().is_ok() {
                println!("Config: Dev mode activated - loaded .env file");
            } else {
                println!("Config: No .env file found, using environment");
            }
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let enable_file_drop = lookup("INTAKE_ENABLE_FILE_DROP")
            .map(|v| parse_bool(&v))
            .unwrap_or(defaults.enable_file_drop);

        let log_filter = lookup("INTAKE_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let window_title = lookup("INTAKE_WINDOW_TITLE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.window_title);

        if !enable_file_drop {
            println!("Config: File drop disabled");
        }

        Self {
            enable_file_drop,
            log_filter,
            window_title,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(from_pairs(&[]), Config::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = from_pairs(&[
            ("INTAKE_ENABLE_FILE_DROP", "false"),
            ("INTAKE_LOG", "intake=debug"),
            ("INTAKE_WINDOW_TITLE", "Bulk Import"),
        ]);

        assert!(!config.enable_file_drop);
        assert_eq!(config.log_filter, "intake=debug");
        assert_eq!(config.window_title, "Bulk Import");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = from_pairs(&[("INTAKE_LOG", "  "), ("INTAKE_ENABLE_FILE_DROP", "TRUE")]);

        assert!(config.enable_file_drop);
        assert_eq!(config.log_filter, "info");
    }
}
