use super::SiteConfig;
use crate::utils::error::{Result, SitesError};
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，未列出的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        let config: SiteConfig = toml::from_str(&processed)?;
        if config.root_domain.trim().is_empty() {
            return Err(SitesError::MissingConfigError {
                field: "root_domain".to_string(),
            });
        }
        Ok(config)
    }
}

/// 替換環境變數 (例如 ${KISLAP_API_BASE_URL})；未設定的保持原樣
fn substitute_env_vars(content: &str) -> String {
    ENV_VAR
        .replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::color::ColorFormat;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_toml_config() {
        let config = SiteConfig::from_toml_str(
            r#"
root_domain = "kislap.test"
color_format = "hsl"
reserved_subdomains = ["www", "shop"]
"#,
        )
        .unwrap();

        assert_eq!(config.root_domain, "kislap.test");
        assert_eq!(config.color_format, ColorFormat::Hsl);
        assert_eq!(config.reserved_subdomains, vec!["www", "shop"]);
        // unspecified fields keep their defaults
        assert_eq!(config.listen_addr, "0.0.0.0:3000");
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SITES_TEST_API_BASE", "https://api.kislap.app");

        let config = SiteConfig::from_toml_str(
            r#"
api_base_url = "${SITES_TEST_API_BASE}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://api.kislap.app");

        std::env::remove_var("SITES_TEST_API_BASE");
    }

    #[test]
    fn test_unset_variable_stays_literal_and_fails_validation() {
        let config = SiteConfig::from_toml_str(
            r#"
api_base_url = "${SITES_TEST_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "${SITES_TEST_DEFINITELY_UNSET}");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let err = SiteConfig::from_toml_str("root_domain = ").unwrap_err();
        assert!(matches!(err, SitesError::TomlError(_)));

        let err = SiteConfig::from_toml_str("root_domain = \"  \"").unwrap_err();
        assert!(matches!(err, SitesError::MissingConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"listen_addr = \"127.0.0.1:8080\"\nrequest_timeout_secs = 10\n")
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_prefers_file_but_keeps_log_switches() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"root_domain = \"kislap.test\"\n").unwrap();

        let cli = SiteConfig {
            root_domain: "ignored.example".to_string(),
            verbose: true,
            config: Some(temp_file.path().to_path_buf()),
            ..SiteConfig::default()
        };
        let resolved = cli.resolve().unwrap();
        assert_eq!(resolved.root_domain, "kislap.test");
        assert!(resolved.verbose);
        assert_eq!(resolved.config.as_deref(), Some(temp_file.path()));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SiteConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SitesError::IoError(_)));
    }
}
