use std::collections::{BTreeSet, HashMap};
use std::fmt;
use serde::{Serialize, Deserialize};

/// Mesh network address of a node, e.g. "10.54.1.1"
pub type NodeAddress = String;

/// Per-node LAN host list, keyed by the owning node's address
pub type HostTable = HashMap<NodeAddress, Vec<HostEntry>>;

/// Per-node advertised services, keyed by the advertising node's address
pub type ServiceTable = HashMap<NodeAddress, Vec<ServiceEntry>>;

/// Link quality towards one node. Accepts the `[address, etx]` pair form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkQuality {
    pub address: NodeAddress,

    /// Expected transmission count, lower is better
    pub etx: f64,
}

/// A hostname known for a node. Accepts the `[hostname, alias]` pair form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    pub hostname: String,

    /// Address the hostname resolves to when it is not the node itself.
    /// Absent for the node's canonical hostname.
    #[serde(default)]
    pub alias: Option<NodeAddress>,
}

/// A service advertised by a node, as published by the mesh status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    /// Display name, optionally suffixed with a category tag: "Label[tag]"
    #[serde(rename = "n")]
    pub name: String,

    /// Fully qualified URL, e.g. "http://node-a:8080/path"
    #[serde(rename = "u")]
    pub url: String,
}

/// One static snapshot of the three lookup tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    /// Sorted ascending by etx by the producer
    #[serde(default)]
    pub etx: Vec<LinkQuality>,
    #[serde(default)]
    pub hosts: HostTable,
    #[serde(default)]
    pub services: ServiceTable,
}

/// A service attributed to a node or LAN host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceView {
    pub display_name: String,
    pub category_tag: Option<String>,
    pub search_key: String,

    /// Absent when the service is not browsable
    pub link_target: Option<String>,
}

impl ServiceView {
    pub fn new(display_name: &str, category_tag: Option<&str>, link_target: Option<String>) -> Self {
        Self {
            display_name: display_name.to_string(),
            category_tag: category_tag.map(str::to_string),
            search_key: display_name.to_lowercase(),
            link_target,
        }
    }
}

/// A device discovered behind a mesh node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanHostView {
    pub hostname: String,
    pub search_key: String,
    pub services: Vec<ServiceView>,
}

impl LanHostView {
    pub fn new(hostname: &str, services: Vec<ServiceView>) -> Self {
        Self {
            hostname: hostname.to_string(),
            search_key: hostname.to_lowercase(),
            services,
        }
    }
}

/// A reachable mesh node with everything shown for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub address: NodeAddress,
    pub hostname: String,
    pub etx: f64,
    pub bucket_label: String,
    pub search_key: String,

    /// Link to the node's own web interface
    pub link_target: String,
    pub services: Vec<ServiceView>,
    pub lan_hosts: Vec<LanHostView>,
}

/// Element of the built view: group headers interleaved with node records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewEntry {
    /// Starts a new quality bucket. `threshold` is None for the unbounded tail.
    Group { label: String, threshold: Option<f64> },
    Node(NodeView),
}

impl ViewEntry {
    pub fn as_node(&self) -> Option<&NodeView> {
        match self {
            ViewEntry::Node(node) => Some(node),
            ViewEntry::Group { .. } => None,
        }
    }
}

/// Identifier of a searchable element of the view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn node(address: &str) -> Self {
        Self(format!("node:{}", address))
    }

    /// `position` is the host's place in the node's LAN host list; hostnames
    /// may repeat within one node.
    pub fn host(address: &str, position: usize) -> Self {
        Self(format!("host:{}/{}", address, position))
    }

    /// Service `index` of the node or LAN host identified by `owner`
    pub fn service(owner: &EntityId, index: usize) -> Self {
        Self(format!("{}/service/{}", owner.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One (id, search key) pair of the flat search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub id: EntityId,
    pub search_key: String,
}

/// Filter input events raised by the search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum InputEvent {
    KeyUp { value: String },
    Click { value: String },
    /// Enter pressed; filtered like any other input, never submitted
    Submit { value: String },
}

impl InputEvent {
    pub fn value(&self) -> &str {
        match self {
            InputEvent::KeyUp { value }
            | InputEvent::Click { value }
            | InputEvent::Submit { value } => value,
        }
    }
}

/// What the presentation layer should do with the raw event after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disposition {
    pub prevent_default: bool,
}

/// Current filtering state as seen by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub filtering: bool,
    pub filter: String,
    pub matched: BTreeSet<EntityId>,
}
