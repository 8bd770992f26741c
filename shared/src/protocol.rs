/// Domain appended to mesh hostnames when building browsable links
pub const DEFAULT_DOMAIN_SUFFIX: &str = "local.mesh";

/// Quiet period before a filter keystroke is evaluated
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Hostnames with this prefix are wildcard DNS entries, never real LAN hosts
pub const WILDCARD_PREFIX: &str = "*.";

/// Ports whose links are written without an explicit port
pub const DEFAULT_WEB_PORTS: [u16; 2] = [80, 443];

/// Port advertised by services that are informational only
pub const UNBROWSABLE_PORT: u16 = 0;
