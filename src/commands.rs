//! `/waypoint create` command generation
//!
//! Works on the typed tree rather than the generic view so packed RGB ints and
//! other numeric tags keep their original type.

use indexmap::IndexMap;
use tracing::debug;

use crate::color::map_color;
use crate::config::Config;
use crate::nbt::Tag;
use crate::utils::title_case;

pub const DEFAULT_NAME: &str = "Unnamed";
pub const DEFAULT_DIMENSION: &str = "minecraft:overworld";
const DEFAULT_COORDS: (i32, i32, i32) = (0, 64, 0);

/// Commands keyed by raw group display name, groups in first-seen order
pub type GroupedCommands = IndexMap<String, Vec<String>>;

/// `group id -> display name` from the root `groups` compound.
/// Missing or empty names fall back to the id.
pub fn group_names(root: &Tag) -> IndexMap<String, String> {
    let mut names = IndexMap::new();
    if let Some(groups) = root.get_compound("groups").and_then(Tag::as_compound) {
        for (id, group) in groups {
            let name = group.get_str("name").unwrap_or(id);
            names.insert(id.clone(), name.to_string());
        }
    }
    names
}

/// Build the grouped command lines. Each group's lines are sorted.
///
/// Waypoints are read from the root `waypoints` compound first, then from the
/// `waypoints` compound of each group, where they default to that group's id.
pub fn build_commands(root: &Tag, config: &Config) -> GroupedCommands {
    let names = group_names(root);
    let mut grouped = GroupedCommands::new();

    if let Some(wps) = root.get_compound("waypoints").and_then(Tag::as_compound) {
        for wp in wps.values() {
            push_command(&mut grouped, &names, wp, &config.default_group_id, config);
        }
    }

    if let Some(groups) = root.get_compound("groups").and_then(Tag::as_compound) {
        for (group_id, group) in groups {
            let Some(wps) = group.get_compound("waypoints").and_then(Tag::as_compound) else {
                continue;
            };
            for wp in wps.values() {
                push_command(&mut grouped, &names, wp, group_id, config);
            }
        }
    }

    for lines in grouped.values_mut() {
        lines.sort();
    }

    debug!(
        "Built {} commands across {} groups",
        grouped.values().map(Vec::len).sum::<usize>(),
        grouped.len()
    );
    grouped
}

fn push_command(
    grouped: &mut GroupedCommands,
    names: &IndexMap<String, String>,
    wp: &Tag,
    fallback_group_id: &str,
    config: &Config,
) {
    let group_id = wp.get_str("groupId").unwrap_or(fallback_group_id);
    if config.is_system_group(group_id) {
        return;
    }

    let group_name = names
        .get(group_id)
        .map(String::as_str)
        .unwrap_or(&config.default_group_id);

    let cmd = waypoint_command(wp, group_name, config);
    grouped.entry(group_name.to_string()).or_default().push(cmd);
}

/// Render one `waypoint create` line for a waypoint in `group_name`.
/// A non-compound `wp` has no fields and renders with every default.
pub fn waypoint_command(wp: &Tag, group_name: &str, config: &Config) -> String {
    let title_group = title_case(group_name);
    let name = wp.get_str("name").unwrap_or(DEFAULT_NAME);

    let (default_x, default_y, default_z) = DEFAULT_COORDS;
    let x = coord(wp, "x").unwrap_or(default_x);
    let mut y = coord(wp, "y").unwrap_or(default_y);
    let mut z = coord(wp, "z").unwrap_or(default_z);

    if title_group.to_lowercase() == config.offset_group.to_lowercase() {
        y = y.wrapping_add(config.y_offset);
        z = z.wrapping_add(config.z_offset);
    }

    let dimension = wp.get_str("primaryDimension").unwrap_or(DEFAULT_DIMENSION);
    let color = map_color(&config.palette, wp.get("color"));

    let display = if name.starts_with('[') && name.contains(']') {
        name.replace('"', "\\\"")
    } else {
        format!("[{}] {}", title_group, name).replace('"', "\\\"")
    };

    let mut cmd = format!(
        "waypoint create \"{}\" {} {} {} {} {}",
        display, dimension, x, y, z, color
    );
    if !config.player.is_empty() {
        cmd.push(' ');
        cmd.push_str(&config.player);
    }
    cmd
}

/// Direct numeric child, else `pos.<key>`
fn coord(wp: &Tag, key: &str) -> Option<i32> {
    wp.get(key)
        .and_then(Tag::as_i32)
        .or_else(|| wp.get_compound("pos")?.get(key)?.as_i32())
}

/// Text file body: a `# Group:` header per group, a blank line, the sorted
/// commands, and a blank separator line
pub fn render_commands(grouped: &GroupedCommands) -> String {
    let mut out = String::new();
    for (group, lines) in grouped {
        out.push_str("# Group: ");
        out.push_str(group);
        out.push_str("\n\n");
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nbt::{decode, writer::NbtWriter};

    fn root(data: Vec<u8>) -> Tag {
        decode(&data).unwrap().tag
    }

    fn sample() -> Tag {
        root(
            NbtWriter::root("")
                .begin_compound("groups")
                .begin_compound("farm_g")
                .string("name", "farm_stuff")
                .end()
                .begin_compound("ws")
                .string("name", "waystones")
                .end()
                .begin_compound("journeymap_death")
                .string("name", "Deaths")
                .end()
                .end()
                .begin_compound("waypoints")
                .begin_compound("a")
                .string("name", "Wheat")
                .string("groupId", "farm_g")
                .int("x", 10)
                .int("y", 70)
                .int("z", -5)
                .int("color", 0x55FF55)
                .end()
                .begin_compound("b")
                .string("name", "Portal")
                .string("groupId", "ws")
                .begin_compound("pos")
                .int("x", 100)
                .int("y", 64)
                .int("z", 200)
                .end()
                .string("primaryDimension", "minecraft:the_nether")
                .string("color", "#FFAA00")
                .end()
                .begin_compound("c")
                .string("name", "I died here")
                .string("groupId", "journeymap_death")
                .int("x", 1)
                .end()
                .begin_compound("d")
                .string("name", "[Base] \"Home\"")
                .string("groupId", "farm_g")
                .end()
                .begin_compound("e")
                .string("name", "Barn")
                .string("groupId", "farm_g")
                .long("x", 5)
                .end()
                .end()
                .finish(),
        )
    }

    #[test]
    fn test_group_names() {
        let names = group_names(&sample());
        assert_eq!(names["farm_g"], "farm_stuff");
        assert_eq!(names["ws"], "waystones");
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_group_name_defaults_to_id() {
        let tag = root(
            NbtWriter::root("")
                .begin_compound("groups")
                .begin_compound("mines")
                .string("name", "")
                .end()
                .end()
                .finish(),
        );
        assert_eq!(group_names(&tag)["mines"], "mines");
    }

    #[test]
    fn test_build_commands() {
        let grouped = build_commands(&sample(), &Config::default());
        let groups: Vec<_> = grouped.keys().cloned().collect();
        assert_eq!(groups, ["farm_stuff", "waystones"]);

        assert_eq!(
            grouped["farm_stuff"],
            vec![
                r#"waypoint create "[Base] \"Home\"" minecraft:overworld 0 64 0 white"#,
                r#"waypoint create "[Farm_Stuff] Barn" minecraft:overworld 5 64 0 white"#,
                r#"waypoint create "[Farm_Stuff] Wheat" minecraft:overworld 10 70 -5 green"#,
            ]
        );

        assert_eq!(
            grouped["waystones"],
            vec![r#"waypoint create "[Waystones] Portal" minecraft:the_nether 100 61 199 gold"#]
        );
    }

    #[test]
    fn test_system_groups_never_emitted() {
        let grouped = build_commands(&sample(), &Config::default());
        let text = render_commands(&grouped);
        assert!(!text.contains("I died here"));
        assert!(!text.contains("Deaths"));

        let mut config = Config::default();
        config.system_groups.clear();
        let grouped = build_commands(&sample(), &config);
        assert_eq!(grouped["Deaths"].len(), 1);
    }

    #[test]
    fn test_offsets_only_for_offset_group() {
        let mut config = Config::default();
        config.y_offset = -10;
        config.z_offset = 7;
        let grouped = build_commands(&sample(), &config);

        assert!(grouped["waystones"][0].contains(" 100 54 207 "));
        assert!(grouped["farm_stuff"].iter().any(|c| c.contains(" 10 70 -5 ")));
    }

    #[test]
    fn test_player_suffix() {
        let mut config = Config::default();
        config.player = "Steve".to_string();
        let grouped = build_commands(&sample(), &config);
        assert!(grouped.values().flatten().all(|c| c.ends_with(" Steve")));
    }

    #[test]
    fn test_missing_group_uses_default_name() {
        let tag = root(
            NbtWriter::root("")
                .begin_compound("waypoints")
                .begin_compound("x")
                .string("name", "Lost")
                .string("groupId", "unknown")
                .end()
                .begin_compound("y")
                .end()
                .end()
                .finish(),
        );

        let grouped = build_commands(&tag, &Config::default());
        assert_eq!(
            grouped["Global"],
            vec![
                "waypoint create \"[Global] Lost\" minecraft:overworld 0 64 0 white",
                "waypoint create \"[Global] Unnamed\" minecraft:overworld 0 64 0 white",
            ]
        );
    }

    #[test]
    fn test_non_compound_waypoint_renders_defaults() {
        let tag = root(
            NbtWriter::root("")
                .begin_compound("waypoints")
                .int("stray", 7)
                .string("label", "not a waypoint")
                .end()
                .finish(),
        );

        let grouped = build_commands(&tag, &Config::default());
        let default_line = "waypoint create \"[Global] Unnamed\" minecraft:overworld 0 64 0 white";
        assert_eq!(grouped["Global"], vec![default_line, default_line]);
    }

    #[test]
    fn test_group_nested_waypoints() {
        let tag = root(
            NbtWriter::root("")
                .begin_compound("groups")
                .begin_compound("waystones")
                .string("name", "Waystones")
                .begin_compound("waypoints")
                .begin_compound("w1")
                .string("name", "Stone")
                .int("x", 200)
                .int("y", 64)
                .int("z", 300)
                .int("color", 255)
                .end()
                .end()
                .end()
                .end()
                .finish(),
        );

        let grouped = build_commands(&tag, &Config::default());
        assert_eq!(
            grouped["Waystones"],
            vec!["waypoint create \"[Waystones] Stone\" minecraft:overworld 200 61 299 dark_blue"]
        );
    }

    #[test]
    fn test_render_commands() {
        let mut grouped = GroupedCommands::new();
        grouped.insert("b".into(), vec!["cmd1".into(), "cmd2".into()]);
        grouped.insert("a".into(), vec!["cmd3".into()]);
        assert_eq!(
            render_commands(&grouped),
            "# Group: b\n\ncmd1\ncmd2\n\n# Group: a\n\ncmd3\n\n"
        );
        assert_eq!(render_commands(&GroupedCommands::new()), "");
    }
}
