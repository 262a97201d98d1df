/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use crate::consts::NULL_TIME;
use crate::database::get_project_by_name;
use crate::input::{check_project_name, parse_repository_url};
use crate::types::*;
use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateProject {
    pub name: String,
    pub repository: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Declarative project list applied at start-up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateConfiguration {
    #[serde(default)]
    pub projects: Vec<StateProject>,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Validation error in field '{field}': {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

fn default_true() -> bool {
    true
}

impl StateConfiguration {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file {}", path))?;
        serde_json::from_str(&content).context("Failed to parse state file")
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen_names = HashSet::new();

        for project in &self.projects {
            if !seen_names.insert(project.name.as_str()) {
                errors.push(ValidationError {
                    field: format!("projects.{}.name", project.name),
                    message: "Duplicate project name found".to_string(),
                });
            }

            if let Err(e) = check_project_name(&project.name) {
                errors.push(ValidationError {
                    field: format!("projects.{}.name", project.name),
                    message: e,
                });
            }

            if let Err(e) = parse_repository_url(&project.repository) {
                errors.push(ValidationError {
                    field: format!("projects.{}.repository", project.name),
                    message: e.to_string(),
                });
            }
        }

        errors
    }

    /// Creates missing projects and updates existing ones by name.
    pub async fn apply(&self, db: &DatabaseConnection) -> Result<()> {
        let errors = self.validate();

        if !errors.is_empty() {
            for error in &errors {
                warn!(field = %error.field, "{}", error.message);
            }
            anyhow::bail!("State file has {} validation error(s)", errors.len());
        }

        for project in &self.projects {
            let existing = get_project_by_name(db, &project.name)
                .await
                .with_context(|| format!("Failed to query project {}", project.name))?;

            match existing {
                Some(existing) => {
                    if existing.repository == project.repository && existing.active == project.active {
                        continue;
                    }

                    let mut aproject: AProject = existing.into();
                    aproject.repository = Set(project.repository.clone());
                    aproject.active = Set(project.active);
                    aproject
                        .update(db)
                        .await
                        .with_context(|| format!("Failed to update project {}", project.name))?;

                    info!(project = %project.name, "Updated project from state file");
                }
                None => {
                    let aproject = AProject {
                        id: Set(Uuid::new_v4()),
                        name: Set(project.name.clone()),
                        repository: Set(project.repository.clone()),
                        active: Set(project.active),
                        last_check_at: Set(*NULL_TIME),
                        created_at: Set(Utc::now().naive_utc()),
                    };

                    aproject
                        .insert(db)
                        .await
                        .with_context(|| format!("Failed to create project {}", project.name))?;

                    info!(project = %project.name, "Created project from state file");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_project(name: &str, repository: &str) -> StateProject {
        StateProject {
            name: name.to_string(),
            repository: repository.to_string(),
            active: true,
        }
    }

    #[test]
    fn test_parse_state_defaults() {
        let state: StateConfiguration = serde_json::from_str(
            r#"{ "projects": [{ "name": "genai-stack", "repository": "https://github.com/docker/genai-stack" }] }"#,
        )
        .unwrap();

        assert_eq!(state.projects.len(), 1);
        assert!(state.projects[0].active);

        let empty: StateConfiguration = serde_json::from_str("{}").unwrap();
        assert!(empty.projects.is_empty());
    }

    #[test]
    fn test_validate_state() {
        let state = StateConfiguration {
            projects: vec![
                state_project("genai-stack", "https://github.com/docker/genai-stack"),
                state_project("genai-stack", "https://github.com/docker/genai-stack"),
                state_project("Bad Name", "https://github.com/a/b"),
                state_project("no-repo", "https://github.com/only-owner"),
            ],
        };

        let errors = state.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert_eq!(errors.len(), 3);
        assert!(fields.contains(&"projects.genai-stack.name"));
        assert!(fields.contains(&"projects.Bad Name.name"));
        assert!(fields.contains(&"projects.no-repo.repository"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{ "projects": [{ "name": "cargo", "repository": "https://github.com/rust-lang/cargo", "active": false }] }"#,
        )
        .unwrap();

        let state = StateConfiguration::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(state.projects.len(), 1);
        assert!(!state.projects[0].active);
        assert!(state.validate().is_empty());

        assert!(StateConfiguration::from_file("/nonexistent/state.json").is_err());
    }
}
