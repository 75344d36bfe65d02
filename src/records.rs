//! Flattening the generic tree into waypoint rows
//!
//! JourneyMap has changed its storage layout between versions, so rows are
//! found by trying a chain of strategies against the generic tree. The first
//! strategy that yields at least one row wins:
//!
//! 1. [`grouped`]: `groups.<id>.(waypoints|wps|points|entries).<wp>`
//! 2. [`root_level`]: `(waypoints|wps|points|entries).<wp>` at the root
//! 3. [`heuristic_scan`]: breadth-first search for the first container whose
//!    children mostly look like waypoints
//!
//! Every strategy is a pure function of the tree.

use indexmap::IndexMap;
use std::collections::VecDeque;
use tracing::debug;

use crate::generic::Value;

/// Keys that may hold a map of waypoints
const WAYPOINT_MAP_KEYS: &[&str] = &["waypoints", "wps", "points", "entries"];
/// Keys of a group object that identify the group
const GROUP_ID_KEYS: &[&str] = &["id", "groupId", "name", "label", "key"];

/// Column names, in output order
pub const FIELDS: [&str; 12] = [
    "guid",
    "name",
    "groupId",
    "primaryDimension",
    "x",
    "y",
    "z",
    "enabled",
    "persistent",
    "color",
    "iconKey",
    "note",
];

/// One flattened waypoint; every field is optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaypointRecord {
    pub guid: Option<Value>,
    pub name: Option<Value>,
    pub group_id: Option<Value>,
    pub primary_dimension: Option<Value>,
    pub x: Option<Value>,
    pub y: Option<Value>,
    pub z: Option<Value>,
    pub enabled: Option<Value>,
    pub persistent: Option<Value>,
    pub color: Option<Value>,
    pub icon_key: Option<Value>,
    pub note: Option<Value>,
}

impl WaypointRecord {
    /// Flatten a waypoint object. `group_id` stays `None` when no alias is
    /// present so the calling strategy can pick the default.
    pub fn from_mapping(m: &IndexMap<String, Value>) -> Self {
        let pos = m.get("pos").and_then(Value::as_mapping);
        let coord = |key: &str| {
            m.get(key)
                .or_else(|| pos.and_then(|p| p.get(key)))
                .cloned()
        };

        WaypointRecord {
            guid: first(m, &["guid", "id", "uuid", "key"]),
            name: first(m, &["name", "label", "title"]),
            group_id: first(m, &["groupId", "group", "grp"]),
            primary_dimension: first(
                m,
                &["primaryDimension", "dimension", "dim", "primaryDim"],
            ),
            x: coord("x"),
            y: coord("y"),
            z: coord("z"),
            enabled: first(m, &["enabled", "isEnabled"]),
            persistent: first(m, &["persistent", "isPersistent", "save"]),
            color: first(m, &["color", "colour", "rgb"]),
            icon_key: first(m, &["iconKey", "icon", "marker"]),
            note: first(m, &["note", "description", "desc"]),
        }
    }

    /// Field values in [`FIELDS`] order
    pub fn values(&self) -> [Option<&Value>; 12] {
        [
            self.guid.as_ref(),
            self.name.as_ref(),
            self.group_id.as_ref(),
            self.primary_dimension.as_ref(),
            self.x.as_ref(),
            self.y.as_ref(),
            self.z.as_ref(),
            self.enabled.as_ref(),
            self.persistent.as_ref(),
            self.color.as_ref(),
            self.icon_key.as_ref(),
            self.note.as_ref(),
        ]
    }

    fn with_default_group(mut self, default_group_id: &str) -> Self {
        if self.group_id.is_none() {
            self.group_id = Some(Value::String(default_group_id.to_string()));
        }
        self
    }

    fn with_fallback_guid(mut self, key: &str) -> Self {
        if self.guid.is_none() {
            self.guid = Some(Value::String(key.to_string()));
        }
        self
    }
}

/// A record extraction strategy
pub type Strategy = fn(&IndexMap<String, Value>, &str) -> Vec<WaypointRecord>;

/// Strategies in precedence order
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("grouped", grouped),
    ("root-level", root_level),
    ("heuristic", heuristic_scan),
];

/// Run the strategy chain. An empty result means no known shape was found.
pub fn extract_records(tree: &Value, default_group_id: &str) -> Vec<WaypointRecord> {
    let wrapped;
    let top = match tree.as_mapping() {
        Some(map) => map,
        None => {
            let mut map = IndexMap::new();
            map.insert("root".to_string(), tree.clone());
            wrapped = map;
            &wrapped
        }
    };

    for (name, strategy) in STRATEGIES {
        let rows = strategy(top, default_group_id);
        debug!("{} strategy found {} waypoints", name, rows.len());
        if !rows.is_empty() {
            return rows;
        }
    }
    Vec::new()
}

/// `groups.<id>.<waypoint map>.<wp>`
pub fn grouped(top: &IndexMap<String, Value>, default_group_id: &str) -> Vec<WaypointRecord> {
    let Some(groups) = top.get("groups").and_then(Value::as_mapping) else {
        return Vec::new();
    };

    let mut rows = Vec::new();
    for (group_key, group) in groups {
        let Some(group) = group.as_mapping() else {
            continue;
        };
        let Some(wps) = first_ref(group, WAYPOINT_MAP_KEYS).and_then(Value::as_mapping) else {
            continue;
        };

        for (wp_key, wp) in wps {
            let Some(wp) = wp.as_mapping() else {
                continue;
            };
            let mut row = WaypointRecord::from_mapping(wp).with_fallback_guid(wp_key);
            if row.group_id.is_none() {
                row.group_id = Some(
                    first(group, GROUP_ID_KEYS)
                        .unwrap_or_else(|| Value::String(group_key.clone())),
                );
            }
            rows.push(row.with_default_group(default_group_id));
        }
    }
    rows
}

/// `<waypoint map>.<wp>` directly under the root
pub fn root_level(top: &IndexMap<String, Value>, default_group_id: &str) -> Vec<WaypointRecord> {
    let Some(wps) = first_ref(top, WAYPOINT_MAP_KEYS).and_then(Value::as_mapping) else {
        return Vec::new();
    };

    wps.iter()
        .filter_map(|(key, wp)| {
            wp.as_mapping().map(|wp| {
                WaypointRecord::from_mapping(wp)
                    .with_fallback_guid(key)
                    .with_default_group(default_group_id)
            })
        })
        .collect()
}

/// Breadth-first search for the first mapping or sequence where at least half
/// (minimum one) of the children look like waypoints
pub fn heuristic_scan(
    top: &IndexMap<String, Value>,
    default_group_id: &str,
) -> Vec<WaypointRecord> {
    let mut queue: VecDeque<Vec<&Value>> = VecDeque::new();
    queue.push_back(top.values().collect());

    while let Some(children) = queue.pop_front() {
        let hits = children.iter().filter(|v| looks_like_waypoint(v)).count();
        if hits >= (children.len() / 2).max(1) {
            return children
                .iter()
                .filter_map(|v| v.as_mapping())
                .map(|m| WaypointRecord::from_mapping(m).with_default_group(default_group_id))
                .collect();
        }

        for child in children {
            match child {
                Value::Mapping(map) => queue.push_back(map.values().collect()),
                Value::Sequence(items) => queue.push_back(items.iter().collect()),
                _ => {}
            }
        }
    }
    Vec::new()
}

/// Direct `x`,`y`,`z` keys or a `pos` mapping holding them
pub fn looks_like_waypoint(value: &Value) -> bool {
    let Some(m) = value.as_mapping() else {
        return false;
    };
    let has_xyz = |m: &IndexMap<String, Value>| {
        m.contains_key("x") && m.contains_key("y") && m.contains_key("z")
    };
    has_xyz(m) || m.get("pos").and_then(Value::as_mapping).is_some_and(has_xyz)
}

fn first_ref<'a>(m: &'a IndexMap<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| m.get(*k))
}

fn first(m: &IndexMap<String, Value>, keys: &[&str]) -> Option<Value> {
    first_ref(m, keys).cloned()
}

/// CSV text with a header row, or `None` when there are no rows
pub fn to_csv(rows: &[WaypointRecord]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let mut out = FIELDS.join(",");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = row.values().iter().map(|v| csv_cell(*v)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    Some(out)
}

fn csv_cell(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_compact_string(),
    };
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text
    }
}
