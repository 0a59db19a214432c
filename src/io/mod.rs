pub mod output;
pub mod writers;

use crate::aggregation::GroupRegistry;
use crate::core::EntityRecord;
use crate::errors::Error;
use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Path that stands for standard input.
pub const STDIN_PATH: &str = "-";

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)?;
    Ok(())
}

/// Read entity input from a file, or from stdin for `-`.
pub fn read_input(path: &Path) -> std::result::Result<String, Error> {
    if path == Path::new(STDIN_PATH) {
        let mut contents = String::new();
        std::io::stdin()
            .read_to_string(&mut contents)
            .map_err(|source| Error::Io {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(contents);
    }

    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse entity records from JSON.
///
/// Accepts a top-level array or an object with an `entities` array. Entries
/// that are not objects are skipped with a warning; malformed fields inside
/// an object only blank that field.
pub fn parse_entities(contents: &str, origin: &str) -> std::result::Result<Vec<EntityRecord>, Error> {
    let value: Value =
        serde_json::from_str(contents).map_err(|e| Error::invalid_input(origin, e))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("entities") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::invalid_input(
                    origin,
                    "expected an array of entities or an object with an `entities` array",
                ))
            }
        },
        _ => {
            return Err(Error::invalid_input(
                origin,
                "expected an array of entities",
            ))
        }
    };

    let mut entities = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            log::warn!("Skipping entry {} in {}: not an object", index, origin);
            continue;
        }
        match serde_json::from_value::<EntityRecord>(item) {
            Ok(entity) => entities.push(entity),
            Err(e) => log::warn!("Skipping entry {} in {}: {}", index, origin, e),
        }
    }

    log::debug!("Parsed {} entities from {}", entities.len(), origin);
    Ok(entities)
}

pub fn load_entities(path: &Path) -> std::result::Result<Vec<EntityRecord>, Error> {
    let contents = read_input(path)?;
    parse_entities(&contents, &path.display().to_string())
}

/// Load a standalone group registry. `.json` files are read as JSON,
/// anything else as TOML.
pub fn load_registry(path: &Path) -> std::result::Result<GroupRegistry, Error> {
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let origin = path.display().to_string();

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let registry = if is_json {
        serde_json::from_str::<GroupRegistry>(&contents)
            .map_err(|e| Error::registry(&origin, e))?
    } else {
        toml::from_str::<GroupRegistry>(&contents).map_err(|e| Error::registry(&origin, e))?
    };

    log::debug!("Loaded {} groups from {}", registry.len(), origin);
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_entities_array() {
        let entities = parse_entities(
            indoc! {r#"
                [
                    {"id": "a", "primary": {"breakfix": 1}},
                    {"id": "b", "single_network_mode": true}
                ]
            "#},
            "test",
        )
        .unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].primary.breakfix, Some(1));
        assert!(entities[1].single_network_mode);
    }

    #[test]
    fn test_parse_entities_wrapped_object() {
        let entities = parse_entities(r#"{"entities": [{"id": "a"}]}"#, "test").unwrap();
        assert_eq!(entities.len(), 1);
    }

    #[test]
    fn test_parse_entities_skips_non_objects() {
        let entities = parse_entities(r#"[{"id": "a"}, 42, "b", null]"#, "test").unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, "a");
    }

    #[test]
    fn test_parse_entities_rejects_bad_shapes() {
        assert!(matches!(
            parse_entities("not json", "test"),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            parse_entities(r#"{"units": []}"#, "test"),
            Err(Error::InvalidInput { .. })
        ));
        assert!(matches!(
            parse_entities("17", "test"),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_load_registry_by_extension() {
        let temp = TempDir::new().unwrap();

        let json_path = temp.path().join("groups.json");
        fs::write(
            &json_path,
            r#"{"north": {"name": "Northern", "short_code": "N", "parent": "HQ"}}"#,
        )
        .unwrap();
        assert_eq!(load_registry(&json_path).unwrap().len(), 1);

        let toml_path = temp.path().join("groups.toml");
        fs::write(&toml_path, "[south]\nname = \"Southern\"\n").unwrap();
        let registry = load_registry(&toml_path).unwrap();
        assert_eq!(registry.describe(Some("south")).name, "Southern");

        let broken = temp.path().join("broken.json");
        fs::write(&broken, "[1, 2]").unwrap();
        assert!(matches!(load_registry(&broken), Err(Error::Registry { .. })));
    }

    #[test]
    fn test_load_entities_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_entities(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
