//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::SiteConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use std::io::Write;

    const SAMPLE: &str = r#"
[listener]
bind_address = "127.0.0.1:3000"

[observability]
log_format = "json"

[admin]
enabled = true
api_key = "secret"

[backgrounds.site_default]
desktop_url = "https://cdn.example.com/site.jpg"
overlay_opacity = 0.4

[[backgrounds.routes]]
path_pattern = "/"
priority = 10
desktop_url = "https://cdn.example.com/home.jpg"
mobile_url = "https://cdn.example.com/home-m.jpg"

[[backgrounds.routes]]
path_pattern = "/c/*"
active = false

[[backgrounds.categories]]
slug = "cosmetics"
mobile_url = "https://cdn.example.com/cosmetics-m.jpg"

[[backgrounds.products]]
slug = "amber-jar"
category = "cosmetics"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.timeouts.request_secs, 30);

        let backgrounds = &config.backgrounds;
        assert_eq!(backgrounds.site_default.as_ref().unwrap().overlay_opacity, Some(0.4));
        assert_eq!(backgrounds.routes.len(), 2);
        assert_eq!(backgrounds.routes[0].priority, 10);
        assert!(backgrounds.routes[0].active);
        assert!(!backgrounds.routes[1].active);
        assert_eq!(backgrounds.routes[1].overlay_opacity, None);
        assert_eq!(backgrounds.products[0].category.as_deref(), Some("cosmetics"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(!config.admin.enabled);
        assert!(config.backgrounds.site_default.is_none());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("[[backgrounds.routes]]\npriority = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_error() {
        let err = parse_config("[[backgrounds.routes]]\npath_pattern = \"no-slash\"\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.backgrounds.categories[0].slug, "cosmetics");

        let missing = load_config(Path::new("/nonexistent/backgrounds.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io(_)));
    }
}
