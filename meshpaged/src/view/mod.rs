pub mod builder;
pub mod hash;
pub mod ladder;
pub mod services;
pub mod url;

use anyhow::Result;
use shared::types::{MeshSnapshot, ViewEntry};
use crate::config::ViewConfig;
use crate::filter::index::SearchIndex;
use self::builder::ViewBuilder;

/// The built view together with everything derived from it.
#[derive(Debug, Clone)]
pub struct MeshView {
    pub entries: Vec<ViewEntry>,
    pub index: SearchIndex,
    pub hash: String,
}

impl MeshView {
    pub fn build(snapshot: &MeshSnapshot, config: &ViewConfig) -> Result<Self> {
        let ladder = config.ladder()?;
        let entries = ViewBuilder::new(&ladder, &config.domain_suffix).build(
            &snapshot.etx,
            &snapshot.hosts,
            &snapshot.services,
        );
        let index = SearchIndex::from_view(&entries);
        let hash = hash::compute_hash(&entries)?;

        tracing::info!(
            "Built view: {} of {} nodes, {} searchable entries, hash {}",
            entries.iter().filter(|e| e.as_node().is_some()).count(),
            snapshot.etx.len(),
            index.len(),
            hash
        );

        Ok(Self { entries, index, hash })
    }
}
