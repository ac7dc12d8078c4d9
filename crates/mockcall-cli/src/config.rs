//! Configuration management for Mockcall CLI
//!
//! Stores backend credentials and the candidate profile in
//! ~/.config/mockcall/config.toml

use anyhow::{Context, Result};
use mockcall::{InterviewContext, InterviewType};
use mockcall_client::config::{ENV_API_KEY, ENV_API_URL};
use mockcall_client::BackendConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "mockcall";
const CONFIG_FILE: &str = "config.toml";

/// Candidate details injected into every call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    /// Plain-text CV, read at call time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_path: Option<PathBuf>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// CLI Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub profile: CandidateProfile,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            profile: CandidateProfile::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key);
    }

    /// Backend settings; `MOCKCALL_API_URL` / `MOCKCALL_API_KEY` win over the file
    pub fn backend(&self) -> BackendConfig {
        let base_url = std::env::var(ENV_API_URL).unwrap_or_else(|_| self.base_url.clone());
        let api_key = std::env::var(ENV_API_KEY).ok().or_else(|| self.api_key.clone());

        let config = BackendConfig::new(base_url);
        match api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }

    /// Interview context for a call, built from the stored profile
    pub fn interview_context(
        &self,
        interview_id: &str,
        interview_type: InterviewType,
        agent_id: Option<String>,
    ) -> Result<InterviewContext> {
        let profile = &self.profile;
        let mut context = InterviewContext::new(interview_id, interview_type)
            .with_candidate(profile.name.clone())
            .with_role(profile.role.clone())
            .with_company(profile.company.clone())
            .with_topics(profile.topics.clone());

        if let Some(path) = &profile.cv_path {
            let cv = fs::read_to_string(path)
                .with_context(|| format!("Failed to read CV from {:?}", path))?;
            context = context.with_cv(cv);
        }
        if let Some(agent_id) = agent_id {
            context = context.with_agent_id(agent_id);
        }

        context.validate()?;
        Ok(context)
    }
}
