use log::{info, warn};
use web_sys::Storage;

use super::types::Snapshot;

/// Single well-known localStorage key holding the whole graph.
const STORAGE_KEY: &str = "promptflow";

fn local_storage() -> Option<Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

/// Overwrites the stored snapshot. Serialization or storage failures are
/// logged and otherwise swallowed; the editor keeps running on its
/// in-memory state.
pub fn save(snapshot: &Snapshot) {
	let Some(storage) = local_storage() else {
		warn!("localStorage unavailable, snapshot not saved");
		return;
	};
	match serde_json::to_string(snapshot) {
		Ok(json) => {
			if storage.set_item(STORAGE_KEY, &json).is_err() {
				warn!("failed to write snapshot to localStorage");
			}
		}
		Err(err) => warn!("failed to serialize snapshot: {err}"),
	}
}

/// Reads the stored snapshot. An absent key, unavailable storage, or an
/// unparsable payload all mean "nothing to load" and yield `None`.
pub fn load() -> Option<Snapshot> {
	let raw = local_storage()?.get_item(STORAGE_KEY).ok().flatten()?;
	match serde_json::from_str(&raw) {
		Ok(snapshot) => {
			info!("restored snapshot from localStorage");
			Some(snapshot)
		}
		Err(err) => {
			warn!("ignoring unparsable snapshot: {err}");
			None
		}
	}
}
