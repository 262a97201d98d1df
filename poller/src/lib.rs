/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod pipeline;
pub mod scheduler;


use shared::types::ServerState;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawns the poll scheduler. It stops, together with all running polls,
/// once `shutdown` is cancelled.
pub fn start_poller(state: Arc<ServerState>, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(scheduler::schedule_poll_loop(state, shutdown))
}
