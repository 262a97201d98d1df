/*
 * SPDX-FileCopyrightText: 2024 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only OR WL-1.0
 */

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::fmt;
use tracing::debug;

use super::consts::*;
use super::error::SourceError;
use super::types::{RemoteCommit, RepositoryRef};

/// Read access to a repository host.
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Latest commits of the default branch, in the order the host returns them.
    async fn list_commits(&self, repository: &RepositoryRef)
    -> Result<Vec<RemoteCommit>, SourceError>;

    /// Unified diff text of a single commit.
    async fn fetch_diff(&self, repository: &RepositoryRef, hash: &str)
    -> Result<String, SourceError>;
}

#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl GithubClient {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(GithubClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, url: &str, media_type: &str) -> reqwest::RequestBuilder {
        let request = self
            .http
            .get(url)
            .header(ACCEPT, media_type)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);

        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl CommitSource for GithubClient {
    async fn list_commits(
        &self,
        repository: &RepositoryRef,
    ) -> Result<Vec<RemoteCommit>, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/commits",
            self.api_url, repository.owner, repository.name
        );

        debug!(repository = %repository, "Listing commits");

        let response = self
            .get(&url, GITHUB_JSON_MEDIA_TYPE)
            .query(&[("per_page", GITHUB_PAGE_SIZE)])
            .send()
            .await?;

        let commits: Vec<GithubCommit> = check_status("GitHub", response).await?.json().await?;

        Ok(commits.into_iter().map(RemoteCommit::from).collect())
    }

    async fn fetch_diff(
        &self,
        repository: &RepositoryRef,
        hash: &str,
    ) -> Result<String, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}",
            self.api_url, repository.owner, repository.name, hash
        );

        debug!(repository = %repository, commit_hash = %hash, "Fetching diff");

        let response = self.get(&url, GITHUB_DIFF_MEDIA_TYPE).send().await?;

        Ok(check_status("GitHub", response).await?.text().await?)
    }
}

/// Turns non-success responses into [`SourceError::Status`] carrying the body.
pub async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, SourceError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(SourceError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

/// Sorts newest first and keeps the first [`COMMIT_LIST_LIMIT`] commits.
pub fn latest_commits(mut commits: Vec<RemoteCommit>) -> Vec<RemoteCommit> {
    commits.sort_by(|a, b| b.committed_at.cmp(&a.committed_at));
    commits.truncate(COMMIT_LIST_LIMIT);
    commits
}

#[derive(Debug, Deserialize)]
struct GithubCommit {
    sha: String,
    #[serde(default)]
    commit: GithubCommitDetail,
    author: Option<GithubUser>,
}

#[derive(Debug, Default, Deserialize)]
struct GithubCommitDetail {
    message: Option<String>,
    author: Option<GithubGitAuthor>,
}

#[derive(Debug, Deserialize)]
struct GithubGitAuthor {
    name: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    avatar_url: Option<String>,
}

fn parse_commit_date(date: Option<&str>) -> NaiveDateTime {
    date.and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|d| d.naive_utc())
        .unwrap_or(*NULL_TIME)
}

impl From<GithubCommit> for RemoteCommit {
    fn from(commit: GithubCommit) -> Self {
        let git_author = commit.commit.author;

        RemoteCommit {
            hash: commit.sha,
            message: commit.commit.message.unwrap_or_default(),
            author_name: git_author
                .as_ref()
                .and_then(|a| a.name.clone())
                .unwrap_or_default(),
            author_avatar: commit
                .author
                .and_then(|a| a.avatar_url)
                .unwrap_or_default(),
            committed_at: parse_commit_date(git_author.as_ref().and_then(|a| a.date.as_deref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_RESPONSE: &str = r#"[
        {
            "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
            "commit": {
                "message": "Fix all the bugs",
                "author": { "name": "Monalisa Octocat", "email": "octocat@github.com", "date": "2024-03-01T16:00:49Z" }
            },
            "author": { "login": "octocat", "avatar_url": "https://github.com/images/error/octocat_happy.gif" }
        },
        {
            "sha": "a1b2c3",
            "commit": { "message": null, "author": null },
            "author": null
        }
    ]"#;

    fn remote(hash: &str, timestamp: i64) -> RemoteCommit {
        RemoteCommit {
            hash: hash.to_string(),
            message: String::new(),
            author_name: String::new(),
            author_avatar: String::new(),
            committed_at: DateTime::from_timestamp(timestamp, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn test_github_commit_mapping() {
        let commits: Vec<GithubCommit> = serde_json::from_str(LIST_RESPONSE).unwrap();
        let commits: Vec<RemoteCommit> = commits.into_iter().map(RemoteCommit::from).collect();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].hash, "6dcb09b5b57875f334f61aebed695e2e4193db5e");
        assert_eq!(commits[0].message, "Fix all the bugs");
        assert_eq!(commits[0].author_name, "Monalisa Octocat");
        assert_eq!(
            commits[0].author_avatar,
            "https://github.com/images/error/octocat_happy.gif"
        );
        assert_eq!(
            commits[0].committed_at.to_string(),
            "2024-03-01 16:00:49"
        );
    }

    #[test]
    fn test_github_commit_missing_fields_default() {
        let commits: Vec<GithubCommit> = serde_json::from_str(LIST_RESPONSE).unwrap();
        let commit = RemoteCommit::from(commits.into_iter().nth(1).unwrap());

        assert_eq!(commit.hash, "a1b2c3");
        assert_eq!(commit.message, "");
        assert_eq!(commit.author_name, "");
        assert_eq!(commit.author_avatar, "");
        assert_eq!(commit.committed_at, *NULL_TIME);
    }

    #[test]
    fn test_latest_commits_sorted_and_limited() {
        let commits = (0..25).map(|i| remote(&format!("c{}", i), i * 60)).collect();
        let latest = latest_commits(commits);

        assert_eq!(latest.len(), COMMIT_LIST_LIMIT);
        assert_eq!(latest[0].hash, "c24");
        assert!(
            latest
                .windows(2)
                .all(|w| w[0].committed_at >= w[1].committed_at)
        );
    }

    #[test]
    fn test_latest_commits_short_list() {
        let latest = latest_commits(vec![remote("old", 10), remote("new", 20)]);
        assert_eq!(
            latest.iter().map(|c| c.hash.as_str()).collect::<Vec<_>>(),
            vec!["new", "old"]
        );
        assert!(latest_commits(vec![]).is_empty());
    }

    #[test]
    fn test_github_client_debug_hides_token() {
        let client = GithubClient::new("https://api.github.com/", Some("ghp_secret".to_string())).unwrap();
        let debug = format!("{:?}", client);

        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("https://api.github.com\""));
    }
}
