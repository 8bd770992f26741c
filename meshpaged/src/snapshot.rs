use std::path::Path;
use anyhow::{Context, Result};
use shared::types::MeshSnapshot;

/// Load the lookup tables published by the mesh status collector.
pub fn load(path: impl AsRef<Path>) -> Result<MeshSnapshot> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mesh snapshot: {}", path.display()))?;

    let snapshot = parse(&contents)
        .with_context(|| format!("Failed to parse mesh snapshot: {}", path.display()))?;

    tracing::info!(
        "Loaded snapshot: {} links, {} host lists, {} service lists",
        snapshot.etx.len(),
        snapshot.hosts.len(),
        snapshot.services.len()
    );
    Ok(snapshot)
}

pub fn parse(contents: &str) -> Result<MeshSnapshot> {
    let snapshot: MeshSnapshot = serde_json::from_str(contents)?;

    if !snapshot.etx.windows(2).all(|w| w[0].etx <= w[1].etx) {
        tracing::warn!("Link table is not sorted by etx; bucket assignment follows table order");
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = parse(
            r#"{
                "etx": [["10.0.0.1", 0.8], ["10.0.0.2", 1.5]],
                "hosts": { "10.0.0.1": [["node-a", null]] }
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.etx.len(), 2);
        assert_eq!(snapshot.hosts["10.0.0.1"][0].hostname, "node-a");
        assert!(snapshot.services.is_empty());
    }

    #[test]
    fn test_rejects_malformed_snapshot() {
        assert!(parse(r#"{"etx": [["10.0.0.1"]]}"#).is_err());
        assert!(parse("not json").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load("/nonexistent/mesh.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read mesh snapshot"));
    }
}
