//! Security headers configuration.

use super::{env_flag, env_parse, env_string};

/// Configuration for security headers middleware
#[derive(Clone)]
pub struct SecurityHeadersConfig {
    pub csp_enabled: bool,
    pub csp_directives: String,
    pub hsts_enabled: bool,
    pub hsts_max_age: u32,
    pub frame_options: String,
    pub content_type_options: bool,
    pub xss_protection: bool,
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            csp_enabled: true,
            csp_directives: "default-src 'none'; frame-ancestors 'none'".to_string(),
            hsts_enabled: true,
            hsts_max_age: 31536000, // 1 year
            frame_options: "DENY".to_string(),
            content_type_options: true,
            xss_protection: true,
            referrer_policy: "no-referrer".to_string(),
        }
    }
}

impl SecurityHeadersConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            csp_enabled: env_flag("SECURITY_CSP_ENABLED", defaults.csp_enabled),
            csp_directives: env_string("CSP_DIRECTIVES").unwrap_or(defaults.csp_directives),
            hsts_enabled: env_flag("HSTS_ENABLED", defaults.hsts_enabled),
            hsts_max_age: env_parse("HSTS_MAX_AGE").unwrap_or(defaults.hsts_max_age),
            frame_options: env_string("X_FRAME_OPTIONS").unwrap_or(defaults.frame_options),
            content_type_options: env_flag("X_CONTENT_TYPE_OPTIONS", defaults.content_type_options),
            xss_protection: env_flag("X_XSS_PROTECTION", defaults.xss_protection),
            referrer_policy: env_string("REFERRER_POLICY").unwrap_or(defaults.referrer_policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_security_config_reads_overrides() {
        unsafe {
            env::set_var("X_FRAME_OPTIONS", "SAMEORIGIN");
            env::set_var("HSTS_ENABLED", "false");
            env::set_var("HSTS_MAX_AGE", "not-a-number");
        }

        let config = SecurityHeadersConfig::from_env();
        assert_eq!(config.frame_options, "SAMEORIGIN");
        assert!(!config.hsts_enabled);
        assert_eq!(config.hsts_max_age, 31536000, "Unparsable values fall back to the default");

        unsafe {
            env::remove_var("X_FRAME_OPTIONS");
            env::remove_var("HSTS_ENABLED");
            env::remove_var("HSTS_MAX_AGE");
        }
    }
}
