/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use url::Url;

use super::consts::*;
use super::error::PollError;
use super::types::RepositoryRef;

pub fn port_in_range(s: &str) -> Result<u16, String> {
    let port: usize = s
        .parse()
        .map_err(|_| format!("`{s}` is not a port number"))?;

    if PORT_RANGE.contains(&port) {
        Ok(port as u16)
    } else {
        Err(format!(
            "port not in range {}-{}",
            PORT_RANGE.start(),
            PORT_RANGE.end()
        ))
    }
}

pub fn greater_than_zero<
    T: std::str::FromStr + std::cmp::PartialOrd + std::fmt::Display + Default,
>(
    s: &str,
) -> Result<T, String> {
    let num: T = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))?;

    if num > T::default() {
        Ok(num)
    } else {
        Err(format!("`{}` is not larger than 0", s))
    }
}

/// Splits a repository URL like `https://github.com/<owner>/<repo>` into its
/// owner and repository name. A missing scheme defaults to https and a
/// trailing `.git` is dropped.
pub fn parse_repository_url(url: &str) -> Result<RepositoryRef, PollError> {
    let invalid = || PollError::InvalidInput(format!("Invalid repository URL: {}", url));

    let url_trimmed = url.trim();
    let parsed = match Url::parse(url_trimmed) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", url_trimmed)).map_err(|_| invalid())?
        }
        Err(_) => return Err(invalid()),
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let mut segments = parsed
        .path_segments()
        .ok_or_else(invalid)?
        .filter(|s| !s.is_empty());

    let owner = segments.next().ok_or_else(invalid)?;
    let name = segments.next().ok_or_else(invalid)?;
    let name = name.strip_suffix(".git").unwrap_or(name);

    if name.is_empty() {
        return Err(invalid());
    }

    Ok(RepositoryRef {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

pub fn check_project_name(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if s != s.to_lowercase() {
        return Err("Name must be lowercase".to_string());
    }

    if s.contains(|c: char| !c.is_ascii_alphanumeric() && c != '-') {
        return Err("Name can only contain letters, numbers, and dashes".to_string());
    }

    if s.starts_with('-') || s.ends_with('-') {
        return Err("Name can only start and end with letters or numbers".to_string());
    }

    Ok(())
}

pub fn load_secret(f: &str) -> String {
    let s = std::fs::read_to_string(f).unwrap_or_default();
    s.trim().replace(char::from(25), "")
}

/// Prefers the secret file over the inline value. Blank secrets count as unset.
pub fn resolve_secret(value: Option<&str>, file: Option<&str>) -> Option<String> {
    let secret = match file {
        Some(f) => load_secret(f),
        None => value.map(|v| v.trim().to_string()).unwrap_or_default(),
    };

    if secret.is_empty() { None } else { Some(secret) }
}
