use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use spindel::config::load_config;
///
/// let config = load_config(Path::new("spindel.toml")).unwrap();
/// println!("Crawling {}", config.crawler.seed);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    parse_config(&read_config_file(path)?)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a crawl's output can be tied to the exact
/// configuration that produced it.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    read_config_file(path).map(|content| hash_content(&content))
}

/// Loads a configuration and returns both the config and its hash
///
/// The file is read once, so the hash always matches the parsed content.
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let content = read_config_file(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

fn read_config_file(path: &Path) -> ConfigResult<String> {
    tracing::debug!("Reading configuration from {}", path.display());
    std::fs::read_to_string(path).map_err(ConfigError::Io)
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use crate::url::LinkBase;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let config_content = r#"
[crawler]
seed = "http://example.com/"
fetch-workers = 4
parse-workers = 2
max-attempts = 3
retry-delay-ms = 0
link-base = "page"
allowed-extensions = ["html", "htm"]

[http]
user-agent = "TestCrawler/1.0"
timeout-secs = 5
connect-timeout-secs = 2

[logging]
level = "debug"
file = "crawl.log"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.seed, "http://example.com/");
        assert_eq!(config.crawler.fetch_workers, 4);
        assert_eq!(config.crawler.parse_workers, 2);
        assert_eq!(config.crawler.max_attempts, 3);
        assert_eq!(config.crawler.retry_delay_ms, 0);
        assert_eq!(config.crawler.link_base, LinkBase::Page);
        assert_eq!(config.crawler.allowed_extensions, vec!["html", "htm"]);
        assert_eq!(config.http.user_agent, "TestCrawler/1.0");
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.file, Some(PathBuf::from("crawl.log")));
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let file = create_temp_config("[crawler]\nseed = \"https://example.com/docs/\"\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.fetch_workers, 10);
        assert_eq!(config.crawler.parse_workers, 10);
        assert_eq!(config.crawler.max_attempts, 10);
        assert_eq!(config.crawler.retry_delay_ms, 100);
        assert_eq!(config.crawler.link_base, LinkBase::Root);
        assert_eq!(
            config.crawler.allowed_extensions,
            vec!["html", "css", "js", "php"]
        );
        assert_eq!(config.http.user_agent, "spindel/0.1.0");
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_load_config_without_seed() {
        let file = create_temp_config("[crawler]\nfetch-workers = 2\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
seed = "http://example.com/"
fetch-workers = 0
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_config_with_unknown_link_base() {
        let config_content = r#"
[crawler]
seed = "http://example.com/"
link-base = "document"
"#;

        let file = create_temp_config(config_content);
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_config_from_str() {
        let config = parse_config("[crawler]\nseed = \"http://example.com/\"\n").unwrap();
        assert_eq!(config.crawler.seed, "http://example.com/");
        assert!(parse_config("[crawler]\nseed = \"mailto:me@example.com\"\n").is_err());
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("[crawler]\nseed = \"http://example.com/\"\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();

        assert_eq!(config.crawler.seed, "http://example.com/");
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }

    #[test]
    fn test_config_hash_matches_sha256() {
        let empty = create_temp_config("");
        assert_eq!(
            compute_config_hash(empty.path()).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );

        let abc = create_temp_config("abc");
        assert_eq!(
            compute_config_hash(abc.path()).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hash_changes_with_any_edit() {
        let original = create_temp_config("[crawler]\nseed = \"http://example.com/\"\n");
        let edited = create_temp_config("[crawler]\nseed = \"http://example.com/\" \n");

        assert_ne!(
            compute_config_hash(original.path()).unwrap(),
            compute_config_hash(edited.path()).unwrap()
        );
    }
}
