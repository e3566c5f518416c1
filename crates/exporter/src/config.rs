//! Exporter configuration. The values are fixed: the exporter reads no
//! environment variables and no configuration file.

pub const DEFAULT_BASE_URL: &str = "https://lichess.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Lichess host the game export is fetched from.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_public_lichess() {
        let config = ExporterConfig::default();
        assert_eq!(config.base_url, "https://lichess.org");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_environment_is_ignored() {
        std::env::set_var("LICHESS_BASE_URL", "http://localhost:9663");
        let config = ExporterConfig::default();
        std::env::remove_var("LICHESS_BASE_URL");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
