use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Server config pointing at a mock server
#[allow(dead_code)]
pub fn server_config(base_url: &str) -> swarmchat::config::ServerConfig {
    swarmchat::config::ServerConfig {
        base_url: base_url.to_string(),
        request_timeout_seconds: 5,
    }
}
