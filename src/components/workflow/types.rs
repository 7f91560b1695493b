use serde::{Deserialize, Serialize};

/// A positioned, titled, content-bearing step in the workflow graph.
/// `x`/`y` are canvas logical coordinates of the node's top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub title: String,
	#[serde(default)]
	pub content: String,
}

/// A directed reference between two node ids. Carries no identity of its
/// own; duplicates and self-loops are allowed to accumulate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	pub from: String,
	pub to: String,
}

/// The persisted form of the whole graph, stored as one JSON blob.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn snapshot_wire_format() {
		let snapshot = Snapshot {
			nodes: vec![Node {
				id: "1".into(),
				x: 50.0,
				y: 75.0,
				title: "Step".into(),
				content: "prompt text".into(),
			}],
			edges: vec![Edge {
				from: "1".into(),
				to: "2".into(),
			}],
		};
		let value = serde_json::to_value(&snapshot).unwrap();
		assert_eq!(
			value,
			serde_json::json!({
				"nodes": [{"id": "1", "x": 50.0, "y": 75.0, "title": "Step", "content": "prompt text"}],
				"edges": [{"from": "1", "to": "2"}],
			})
		);
	}

	#[test]
	fn missing_edges_field_defaults_empty() {
		let snapshot: Snapshot =
			serde_json::from_str(r#"{"nodes": [{"id": "a", "x": 0, "y": 0, "title": "t"}]}"#)
				.unwrap();
		assert_eq!(snapshot.nodes.len(), 1);
		assert_eq!(snapshot.nodes[0].content, "");
		assert!(snapshot.edges.is_empty());
	}

	#[test]
	fn malformed_payload_is_an_error() {
		assert!(serde_json::from_str::<Snapshot>("not json").is_err());
		assert!(serde_json::from_str::<Snapshot>(r#"{"nodes": 3}"#).is_err());
	}
}
