use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bucket name used for missing group keys and for the parent of
/// unregistered groups.
pub const UNKNOWN_GROUP: &str = "Unknown";

const UNKNOWN_SHORT_CODE: &str = "UNK";
const SHORT_CODE_LEN: usize = 6;

/// Display information for one organizational group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupDescriptor {
    pub name: String,
    #[serde(alias = "short")]
    pub short_code: String,
    /// Parent command the group reports to
    #[serde(alias = "parent_command")]
    pub parent: String,
}

impl GroupDescriptor {
    pub fn new(
        name: impl Into<String>,
        short_code: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short_code: short_code.into(),
            parent: parent.into(),
        }
    }

    /// Descriptor for units without a group key.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_GROUP, UNKNOWN_SHORT_CODE, UNKNOWN_GROUP)
    }

    /// Descriptor built from a raw key that the registry does not know.
    pub fn synthesized(key: &str) -> Self {
        Self::new(key, short_code_for(key), UNKNOWN_GROUP)
    }

    /// Fill blank fields of a registered descriptor from its key.
    fn completed(mut self, key: &str) -> Self {
        if self.name.trim().is_empty() {
            self.name = key.to_string();
        }
        if self.short_code.trim().is_empty() {
            self.short_code = short_code_for(key);
        }
        if self.parent.trim().is_empty() {
            self.parent = UNKNOWN_GROUP.to_string();
        }
        self
    }
}

fn short_code_for(key: &str) -> String {
    key.chars().take(SHORT_CODE_LEN).collect()
}

/// Group key to descriptor mapping, supplied by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupRegistry {
    groups: BTreeMap<String, GroupDescriptor>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, key: impl Into<String>, descriptor: GroupDescriptor) -> Self {
        self.insert(key, descriptor);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, descriptor: GroupDescriptor) {
        self.groups.insert(key.into(), descriptor);
    }

    pub fn get(&self, key: &str) -> Option<&GroupDescriptor> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &GroupDescriptor)> {
        self.groups.iter()
    }

    /// Entries of `other` replace entries with the same key.
    pub fn merge(&mut self, other: GroupRegistry) {
        self.groups.extend(other.groups);
    }

    /// Resolve a group key. Never fails: missing keys and an unregistered
    /// `Unknown` key map to the `Unknown` descriptor, other unregistered keys
    /// get a synthesized one.
    pub fn describe(&self, key: Option<&str>) -> GroupDescriptor {
        match key {
            None => GroupDescriptor::unknown(),
            Some(key) => match self.groups.get(key) {
                Some(descriptor) => descriptor.clone().completed(key),
                None if key == UNKNOWN_GROUP => GroupDescriptor::unknown(),
                None => GroupDescriptor::synthesized(key),
            },
        }
    }
}
