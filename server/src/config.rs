use std::path::PathBuf;

use anyhow::Result;

/// Runtime configuration, sourced from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Backing JSON file holding the employee collection.
    pub data_file: PathBuf,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let data_file = std::env::var("EMPLOYEE_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/employees.json"));

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();

        Ok(Self {
            data_file,
            cors_allowed_origins,
        })
    }
}
