use serde::Serialize;
use shared::types::{EntityId, SearchEntry, ServiceView, ViewEntry};

/// Flat (id, search key) list the filter matches against.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Index every node, LAN host and service of a built view, in view order.
    pub fn from_view(view: &[ViewEntry]) -> Self {
        let mut entries = Vec::new();

        for node in view.iter().filter_map(ViewEntry::as_node) {
            let node_id = EntityId::node(&node.address);
            entries.push(SearchEntry {
                id: node_id.clone(),
                search_key: node.search_key.clone(),
            });
            push_services(&mut entries, &node_id, &node.services);

            for (position, lan) in node.lan_hosts.iter().enumerate() {
                let host_id = EntityId::host(&node.address, position);
                entries.push(SearchEntry {
                    id: host_id.clone(),
                    search_key: lan.search_key.clone(),
                });
                push_services(&mut entries, &host_id, &lan.services);
            }
        }

        Self { entries }
    }

    /// Ids whose search key contains `needle`. `needle` must already be lowercase.
    pub fn matching<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a EntityId> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.search_key.contains(needle))
            .map(|e| &e.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl FromIterator<SearchEntry> for SearchIndex {
    fn from_iter<I: IntoIterator<Item = SearchEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn push_services(entries: &mut Vec<SearchEntry>, owner: &EntityId, services: &[ServiceView]) {
    entries.extend(services.iter().enumerate().map(|(i, s)| SearchEntry {
        id: EntityId::service(owner, i),
        search_key: s.search_key.clone(),
    }));
}
