use shared::protocol::WILDCARD_PREFIX;
use shared::types::{
    HostEntry, HostTable, LanHostView, LinkQuality, NodeView, ServiceTable, ViewEntry,
};
use crate::view::ladder::Ladder;
use crate::view::services::ServiceResolver;

/// Turns the raw lookup tables into the grouped node view.
pub struct ViewBuilder<'a> {
    ladder: &'a Ladder,
    domain_suffix: &'a str,
}

impl<'a> ViewBuilder<'a> {
    pub fn new(ladder: &'a Ladder, domain_suffix: &'a str) -> Self {
        Self { ladder, domain_suffix }
    }

    /// Build the view. `links` must be sorted ascending by etx; its order is
    /// kept as display order and drives bucket assignment.
    pub fn build(
        &self,
        links: &[LinkQuality],
        hosts: &HostTable,
        services: &ServiceTable,
    ) -> Vec<ViewEntry> {
        let resolver = ServiceResolver::new(services, self.domain_suffix);
        let mut cursor = self.ladder.cursor();
        let mut current_group = None;
        let mut entries = Vec::new();

        for link in links {
            let address = link.address.as_str();
            let Some(hostlist) = hosts.get(address) else {
                tracing::debug!("Skipping {}: no host entries", address);
                continue;
            };
            let Some(hostname) = primary_hostname(hostlist, address) else {
                tracing::debug!("Skipping {}: no canonical hostname", address);
                continue;
            };

            let position = cursor.advance(link.etx);
            let rung = cursor.rung();
            if current_group != Some(position) {
                entries.push(ViewEntry::Group {
                    label: rung.label.clone(),
                    threshold: rung.below,
                });
                current_group = Some(position);
            }

            let lan_hosts = lan_hostnames(hostlist, address)
                .map(|lan| LanHostView::new(lan, resolver.resolve(address, lan)))
                .collect();

            entries.push(ViewEntry::Node(NodeView {
                address: link.address.clone(),
                hostname: hostname.to_string(),
                etx: link.etx,
                bucket_label: rung.label.clone(),
                search_key: hostname.to_lowercase(),
                link_target: format!("http://{}.{}", hostname, self.domain_suffix),
                services: resolver.resolve(address, hostname),
                lan_hosts,
            }));
        }

        entries
    }
}

fn is_own_entry(entry: &HostEntry, address: &str) -> bool {
    entry.alias.as_deref().map_or(true, |alias| alias == address)
}

/// First non-empty hostname that names the node itself.
fn primary_hostname<'h>(hostlist: &'h [HostEntry], address: &str) -> Option<&'h str> {
    hostlist
        .iter()
        .find(|h| is_own_entry(h, address))
        .map(|h| h.hostname.as_str())
        .filter(|h| !h.is_empty())
}

/// Hosts behind the node, in listing order, without wildcard entries.
fn lan_hostnames<'h>(
    hostlist: &'h [HostEntry],
    address: &'h str,
) -> impl Iterator<Item = &'h str> + 'h {
    hostlist
        .iter()
        .filter(move |h| !is_own_entry(h, address))
        .map(|h| h.hostname.as_str())
        .filter(|h| !h.starts_with(WILDCARD_PREFIX))
}
