use std::collections::HashMap;

use super::types::{Edge, Node, Snapshot};

/// Title given to nodes created without one.
pub const PLACEHOLDER_TITLE: &str = "New step";
/// Where freshly added nodes land on the canvas.
pub const DEFAULT_POSITION: (f64, f64) = (50.0, 50.0);

/// Optional fields for [`GraphDocument::add_node`]. Anything left `None`
/// gets the documented default.
#[derive(Clone, Debug, Default)]
pub struct NodeInit {
	pub id: Option<String>,
	pub position: Option<(f64, f64)>,
	pub title: Option<String>,
	pub content: Option<String>,
}

/// The authoritative in-memory graph: nodes in insertion order with an id
/// index alongside, plus the edge list. Rendering is a derived view and is
/// never consulted for logical state; all mutation goes through the narrow
/// methods here.
pub struct GraphDocument {
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
	edges: Vec<Edge>,
	id_base: u64,
	id_seq: u64,
}

impl GraphDocument {
	/// `id_base` seeds fresh-id generation; callers pass the current epoch
	/// millis so ids stay unique across sessions the way the stored graphs
	/// expect.
	pub fn new(id_base: u64) -> Self {
		Self {
			nodes: Vec::new(),
			index: HashMap::new(),
			edges: Vec::new(),
			id_base,
			id_seq: 0,
		}
	}

	/// Unique within this document even when many nodes are created in the
	/// same millisecond tick.
	fn fresh_id(&mut self) -> String {
		loop {
			let candidate = (self.id_base + self.id_seq).to_string();
			self.id_seq += 1;
			if !self.index.contains_key(&candidate) {
				return candidate;
			}
		}
	}

	/// Appends a node and returns it. A supplied id that would collide with
	/// an existing node is replaced with a fresh one; id uniqueness holds for
	/// the lifetime of the loaded graph.
	pub fn add_node(&mut self, init: NodeInit) -> &Node {
		let id = match init.id {
			Some(id) if !self.index.contains_key(&id) => id,
			_ => self.fresh_id(),
		};
		let (x, y) = init.position.unwrap_or(DEFAULT_POSITION);
		let node = Node {
			id: id.clone(),
			x,
			y,
			title: init.title.unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
			content: init.content.unwrap_or_default(),
		};
		self.index.insert(id, self.nodes.len());
		self.nodes.push(node);
		// Index entry was just inserted for this slot.
		&self.nodes[self.nodes.len() - 1]
	}

	/// Appends unconditionally: no self-loop check, no duplicate check, no
	/// existence check on either id. Unresolvable edges are skipped at
	/// render time instead.
	pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
		self.edges.push(Edge {
			from: from.into(),
			to: to.into(),
		});
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).and_then(|&i| self.nodes.get(i))
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Moves a node's top-left anchor. Returns false for an unknown id.
	pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> bool {
		let Some(node) = self.index.get(id).and_then(|&i| self.nodes.get_mut(i)) else {
			return false;
		};
		node.x = x;
		node.y = y;
		true
	}

	/// Writes both editable fields back, as the edit dialog's save does.
	pub fn update_node(&mut self, id: &str, title: String, content: String) -> bool {
		let Some(node) = self.index.get(id).and_then(|&i| self.nodes.get_mut(i)) else {
			return false;
		};
		node.title = title;
		node.content = content;
		true
	}

	pub fn serialize(&self) -> Snapshot {
		Snapshot {
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
		}
	}

	/// Drops all current state and rebuilds from the snapshot. Nodes go
	/// through the same creation path as [`Self::add_node`], keeping their
	/// stored id, position, title and content; the edge list is replaced
	/// verbatim (dangling references included).
	pub fn restore(&mut self, snapshot: Snapshot) {
		self.nodes.clear();
		self.index.clear();
		self.edges.clear();
		for node in snapshot.nodes {
			self.add_node(NodeInit {
				id: Some(node.id),
				position: Some((node.x, node.y)),
				title: Some(node.title),
				content: Some(node.content),
			});
		}
		self.edges = snapshot.edges;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fresh_ids_are_unique_within_one_tick() {
		let mut doc = GraphDocument::new(1_700_000_000_000);
		let mut ids: Vec<String> = (0..100)
			.map(|_| doc.add_node(NodeInit::default()).id.clone())
			.collect();
		ids.sort();
		ids.dedup();
		assert_eq!(ids.len(), 100);
	}

	#[test]
	fn add_node_defaults() {
		let mut doc = GraphDocument::new(0);
		let node = doc.add_node(NodeInit::default());
		assert_eq!((node.x, node.y), DEFAULT_POSITION);
		assert_eq!(node.title, PLACEHOLDER_TITLE);
		assert_eq!(node.content, "");
	}

	#[test]
	fn colliding_explicit_id_gets_a_fresh_one() {
		let mut doc = GraphDocument::new(0);
		let first = doc.add_node(NodeInit {
			id: Some("dup".into()),
			..NodeInit::default()
		});
		assert_eq!(first.id, "dup");
		let second = doc
			.add_node(NodeInit {
				id: Some("dup".into()),
				..NodeInit::default()
			})
			.id
			.clone();
		assert_ne!(second, "dup");
		assert_eq!(doc.nodes().len(), 2);
	}

	#[test]
	fn add_edge_is_unchecked() {
		let mut doc = GraphDocument::new(0);
		let id = doc.add_node(NodeInit::default()).id.clone();
		doc.add_edge(id.clone(), id.clone()); // self-loop
		doc.add_edge(id.clone(), id.clone()); // duplicate
		doc.add_edge("ghost", "nobody"); // neither endpoint exists
		assert_eq!(doc.edges().len(), 3);
	}

	#[test]
	fn serialize_restore_round_trip() {
		let mut doc = GraphDocument::new(100);
		let a = doc
			.add_node(NodeInit {
				position: Some((50.0, 50.0)),
				title: Some("A".into()),
				content: Some("first".into()),
				..NodeInit::default()
			})
			.id
			.clone();
		let b = doc
			.add_node(NodeInit {
				position: Some((200.0, 50.0)),
				title: Some("B".into()),
				..NodeInit::default()
			})
			.id
			.clone();
		doc.add_edge(a.clone(), b.clone());
		doc.add_edge("dangling", b);

		let snapshot = doc.serialize();
		let mut fresh = GraphDocument::new(0);
		fresh.restore(snapshot.clone());
		assert_eq!(fresh.serialize(), snapshot);
		assert_eq!(fresh.node(&a).map(|n| n.content.as_str()), Some("first"));
	}

	#[test]
	fn empty_round_trip() {
		let mut doc = GraphDocument::new(0);
		let snapshot = doc.serialize();
		doc.restore(snapshot.clone());
		assert_eq!(doc.serialize(), snapshot);
		assert!(doc.nodes().is_empty());
	}

	#[test]
	fn restore_replaces_prior_state() {
		let mut doc = GraphDocument::new(0);
		let old = doc.add_node(NodeInit::default()).id.clone();
		doc.add_edge(old.clone(), old.clone());

		let mut other = GraphDocument::new(500);
		let kept = other
			.add_node(NodeInit {
				title: Some("kept".into()),
				..NodeInit::default()
			})
			.id
			.clone();
		doc.restore(other.serialize());

		assert!(doc.node(&old).is_none());
		assert_eq!(doc.nodes().len(), 1);
		assert_eq!(doc.node(&kept).map(|n| n.title.as_str()), Some("kept"));
		assert!(doc.edges().is_empty());
	}

	#[test]
	fn update_node_writes_both_fields() {
		let mut doc = GraphDocument::new(0);
		let id = doc.add_node(NodeInit::default()).id.clone();
		assert!(doc.update_node(&id, "Renamed".into(), "body".into()));
		let node = doc.node(&id).unwrap();
		assert_eq!(node.title, "Renamed");
		assert_eq!(node.content, "body");
		assert!(!doc.update_node("ghost", String::new(), String::new()));
	}
}
