pub mod toml_config;

use crate::core::color::ColorFormat;
use crate::core::tenant::{HostResolver, DEFAULT_RESERVED_SUBDOMAINS};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_domain, validate_range, validate_socket_addr, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 60;

fn default_reserved_subdomains() -> Vec<String> {
    DEFAULT_RESERVED_SUBDOMAINS
        .iter()
        .map(|label| label.to_string())
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "kislap-sites")]
#[command(about = "Serves published Kislap sites on tenant subdomains")]
#[serde(default)]
pub struct SiteConfig {
    #[arg(long, env = "KISLAP_LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: String,

    /// Apex domain tenants live under
    #[arg(long, env = "KISLAP_ROOT_DOMAIN", default_value = "kislap.app")]
    pub root_domain: String,

    #[arg(long, env = "KISLAP_API_BASE_URL", default_value = "http://api.kislap.test")]
    pub api_base_url: String,

    #[arg(long, env = "KISLAP_REQUEST_TIMEOUT_SECS", default_value = "5")]
    pub request_timeout_secs: u64,

    /// Notation for compiled theme colors (oklch, hsl, rgb, hex)
    #[arg(long, env = "KISLAP_COLOR_FORMAT", default_value = "oklch")]
    pub color_format: ColorFormat,

    /// Subdomains that belong to the platform, not to tenants
    #[arg(
        long,
        env = "KISLAP_RESERVED_SUBDOMAINS",
        value_delimiter = ',',
        default_values_t = default_reserved_subdomains()
    )]
    pub reserved_subdomains: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Load settings from a TOML file instead of flags
    #[arg(long)]
    #[serde(skip)]
    pub config: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            root_domain: "kislap.app".to_string(),
            api_base_url: "http://api.kislap.test".to_string(),
            request_timeout_secs: 5,
            color_format: ColorFormat::Oklch,
            reserved_subdomains: default_reserved_subdomains(),
            verbose: false,
            json_logs: false,
            config: None,
        }
    }
}

impl SiteConfig {
    /// When `--config` is given the file supplies every setting; the two
    /// logging switches can still be turned on from the command line.
    pub fn resolve(self) -> Result<Self> {
        let Some(path) = self.config.clone() else {
            return Ok(self);
        };
        let mut loaded = Self::from_file(&path)?;
        loaded.verbose |= self.verbose;
        loaded.json_logs |= self.json_logs;
        loaded.config = Some(path);
        Ok(loaded)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn host_resolver(&self) -> HostResolver {
        HostResolver::new(&self.root_domain, &self.reserved_subdomains)
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("listen_addr", &self.listen_addr)?;
        validate_domain("root_domain", &self.root_domain)?;
        validate_url("api_base_url", &self.api_base_url)?;
        validate_range(
            "request_timeout_secs",
            self.request_timeout_secs,
            MIN_REQUEST_TIMEOUT_SECS,
            MAX_REQUEST_TIMEOUT_SECS,
        )?;
        Ok(())
    }
}
