use crate::core::interactions::InteractionConfig;
use crate::utils::error::{PageError, Result};
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub render: RenderSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub interactions: InteractionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSection {
    pub dir: Option<String>,
    pub page: Option<String>,
    /// Path relative to `dir`, or an http(s) URL.
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderSection {
    pub trusted_content: Option<bool>,
    pub icon_file: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub filename: Option<String>,
}

impl SiteConfig {
    /// Loads and parses a site.toml file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PageError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PageError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` references with environment values.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PageError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(content) = &self.site.content {
            if content.starts_with("http://") || content.starts_with("https://") {
                validate_url("site.content", content)?;
            } else {
                validate_path("site.content", content)?;
            }
        }

        if let Some(page) = &self.site.page {
            validate_path("site.page", page)?;
        }

        if let Some(path) = &self.output.path {
            validate_path("output.path", path)?;
        }

        if let Some(timeout) = self.render.timeout_seconds {
            validate_range("render.timeout_seconds", timeout, 1, 300)?;
        }

        validate_range(
            "interactions.reveal.threshold",
            self.interactions.reveal.threshold,
            0.0,
            1.0,
        )?;

        if self.interactions.nav_shadow_threshold < 0.0 {
            return Err(PageError::InvalidConfigValueError {
                field: "interactions.nav_shadow_threshold".to_string(),
                value: self.interactions.nav_shadow_threshold.to_string(),
                reason: "Scroll threshold cannot be negative".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_site_config() {
        let toml_content = r#"
[site]
dir = "site"
page = "index.html"
content = "data.json"

[render]
trusted_content = true
icon_file = "icons.toml"

[output]
path = "./dist"

[interactions]
nav_shadow_threshold = 80.0

[interactions.reveal]
threshold = 0.25
root_margin_bottom = -50.0
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.site.dir.as_deref(), Some("site"));
        assert_eq!(config.render.trusted_content, Some(true));
        assert_eq!(config.interactions.nav_shadow_threshold, 80.0);
        assert_eq!(config.interactions.reveal.threshold, 0.25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert!(config.site.page.is_none());
        assert_eq!(config.interactions.nav_shadow_threshold, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PORTFOLIO_TEST_CONTENT_URL", "https://cdn.example.com/data.json");

        let config = SiteConfig::from_toml_str(
            r#"
[site]
content = "${PORTFOLIO_TEST_CONTENT_URL}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.site.content.as_deref(),
            Some("https://cdn.example.com/data.json")
        );

        std::env::remove_var("PORTFOLIO_TEST_CONTENT_URL");
    }

    #[test]
    fn test_config_validation() {
        let config = SiteConfig::from_toml_str(
            r#"
[interactions.reveal]
threshold = 1.5
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = SiteConfig::from_toml_str(
            r#"
[site]
content = "https://"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = SiteConfig::from_toml_str("[site\npage = 1").unwrap_err();
        assert!(matches!(err, PageError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[site]\npage = \"home.html\"\n")
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.site.page.as_deref(), Some("home.html"));
    }
}
