/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::{DateTime, NaiveDateTime};
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const PORT_RANGE: RangeInclusive<usize> = 1..=65535;

pub static NULL_TIME: LazyLock<NaiveDateTime> =
    LazyLock::new(|| DateTime::from_timestamp(0, 0).unwrap_or_default().naive_utc());

/// Number of commits kept from each listing, newest first.
pub const COMMIT_LIST_LIMIT: usize = 10;
pub const GITHUB_PAGE_SIZE: u32 = 30;
pub const GITHUB_API_VERSION: &str = "2022-11-28";
pub const GITHUB_JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
pub const GITHUB_DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

pub const USER_AGENT: &str = concat!("commitwise/", env!("CARGO_PKG_VERSION"));

pub const SUMMARY_FALLBACK: &str = "something went wrong";

pub const SCHEDULER_TICK_SECONDS: u64 = 5;

pub const SUMMARY_PROMPT: &str = r#"You are an experienced software engineer who writes short, precise summaries of git diffs.

How to read the diff:
1. Every changed file starts with metadata lines, for example:
   diff --git a/lib/index.js b/lib/index.js
   index aadf691..bfef603 100644
   --- a/lib/index.js
   +++ b/lib/index.js
   which means `lib/index.js` was modified.
2. A line starting with `+` was added and a line starting with `-` was removed.
   Any other line is context and is not part of the change.

What to write:
- Find the important changes across all files.
- Describe each group of changes briefly and name the affected files in brackets.
- Use a numbered list when the commit does several things (features, fixes, refactors).
- When more than two files change for the same reason, describe the overall effect instead of listing every file.

Example:
1. Raised the number of returned recordings from 10 to 100 [packages/server/recordings_api.ts], [packages/server/constants.ts].
2. Fixed a typo in the GitHub action name [.github/workflows/gpt-commit-summarizer.yml].
3. Moved the `octokit` setup into its own module [src/octokit.ts], [src/index.ts].

Summarize this git diff:
"#;
