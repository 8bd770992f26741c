use shared::protocol::{DEFAULT_WEB_PORTS, UNBROWSABLE_PORT};
use shared::types::{ServiceTable, ServiceView};
use crate::view::url::ServiceUrl;

/// Attributes advertised services to hostnames and builds their links.
pub struct ServiceResolver<'a> {
    services: &'a ServiceTable,
    domain_suffix: &'a str,
}

impl<'a> ServiceResolver<'a> {
    pub fn new(services: &'a ServiceTable, domain_suffix: &'a str) -> Self {
        Self { services, domain_suffix }
    }

    /// Services advertised under `address` whose URL host is `hostname`,
    /// in advertisement order. Entries with a malformed URL are skipped.
    pub fn resolve(&self, address: &str, hostname: &str) -> Vec<ServiceView> {
        let Some(entries) = self.services.get(address) else {
            return Vec::new();
        };

        entries
            .iter()
            .filter_map(|entry| {
                let url = match ServiceUrl::parse(&entry.url) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::warn!(
                            "Skipping service {:?} on {}: bad url {:?}: {}",
                            entry.name,
                            address,
                            entry.url,
                            e
                        );
                        return None;
                    }
                };
                if !url.host_is(hostname) {
                    return None;
                }

                let (display_name, category_tag) = split_category(&entry.name);
                let link_target = self.link_target(&url, hostname);
                Some(ServiceView::new(display_name, category_tag, link_target))
            })
            .collect()
    }

    fn link_target(&self, url: &ServiceUrl<'_>, hostname: &str) -> Option<String> {
        match url.port {
            Some(UNBROWSABLE_PORT) => None,
            Some(port) if !DEFAULT_WEB_PORTS.contains(&port) => Some(format!(
                "{}://{}.{}:{}{}",
                url.scheme, hostname, self.domain_suffix, port, url.rest
            )),
            _ => Some(format!(
                "{}://{}.{}{}",
                url.scheme, hostname, self.domain_suffix, url.rest
            )),
        }
    }
}

/// Split "Label[tag]" into ("Label", Some("tag")). The tag runs from the last
/// '[' to the trailing ']'.
fn split_category(name: &str) -> (&str, Option<&str>) {
    if let Some(inner) = name.strip_suffix(']') {
        if let Some(open) = inner.rfind('[') {
            return (&inner[..open], Some(&inner[open + 1..]));
        }
    }
    (name, None)
}
