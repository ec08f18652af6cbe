pub mod feature;
pub mod idea;
pub mod init;
pub mod journey;
pub mod note;
pub mod project;
pub mod serve;
pub mod skill;
pub mod state;

use anyhow::Context;
use journey_core::types::ProjectStatus;
use journey_core::Store;
use std::path::Path;

pub(crate) fn open_store(root: &Path) -> anyhow::Result<Store> {
    Store::open(root).with_context(|| format!("failed to open journey at {}", root.display()))
}

pub(crate) fn parse_status(raw: &str) -> anyhow::Result<ProjectStatus> {
    raw.parse::<ProjectStatus>()
        .context("expected one of: idea, in_progress, completed")
}
