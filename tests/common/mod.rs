// Test utility module for fleetrisk integration tests
#![allow(dead_code)]

use fleetrisk::config::ThresholdConfig;
use fleetrisk::core::EntityRecord;
use fleetrisk::risk::{classify, Classification, RiskTier};
use fleetrisk::testkit::reference_time;
use std::fs;
use std::path::{Path, PathBuf};

pub fn classify_default(entity: &EntityRecord) -> Classification {
    classify(entity, &ThresholdConfig::default(), reference_time())
}

pub fn tier_of(entity: &EntityRecord, config: &ThresholdConfig) -> RiskTier {
    classify(entity, config, reference_time()).tier
}

/// Write `contents` to `name` inside `dir` and return the path.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}
