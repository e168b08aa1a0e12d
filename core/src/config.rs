//! Environment-driven configuration.

/// Environment variable holding the remote base address.
pub const API_URL_VAR: &str = "NOTES_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Remote base address without trailing slashes. Empty means same-origin
    /// relative requests.
    pub api_base_url: String,
}

impl Config {
    /// Reads [`API_URL_VAR`]; an unset or blank value yields an empty base.
    pub fn from_env() -> Self {
        Self::from_base_url(std::env::var(API_URL_VAR).ok().as_deref())
    }

    pub fn from_base_url(value: Option<&str>) -> Self {
        let api_base_url = value
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_default();
        Self { api_base_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_blank_means_same_origin() {
        assert_eq!(Config::from_base_url(None).api_base_url, "");
        assert_eq!(Config::from_base_url(Some("  ")).api_base_url, "");
    }

    #[test]
    fn base_url_is_trimmed() {
        let config = Config::from_base_url(Some(" https://notes.example.com/api/// "));
        assert_eq!(config.api_base_url, "https://notes.example.com/api");
    }
}
