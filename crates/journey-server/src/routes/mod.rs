pub mod events;
pub mod features;
pub mod generate;
pub mod ideas;
pub mod notes;
pub mod projects;
pub mod skills;
pub mod state;

use serde::Deserialize;

/// Body for the `.../order` endpoints: move the item at `from` to `to`.
#[derive(Debug, Deserialize)]
pub struct OrderBody {
    pub from: usize,
    pub to: usize,
}
