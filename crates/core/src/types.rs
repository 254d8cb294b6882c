//! Domain types shared by the generator and its consumers.
//!
//! A [`Template`] is the per-family prototype; a [`TestInstance`] is the
//! concrete record the orchestrator provisions. Both own their metadata, so a
//! clone never aliases another value's storage.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One instance metadata entry.
///
/// Values are opaque to the generator: composed scripts or flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

impl MetadataItem {
    /// Builds a metadata item from a key and a value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for MetadataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.key, self.value.len())
    }
}

/// Base configuration shared by all images of one OS family/variant.
///
/// Fields are private; a template cannot be changed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    metadata: Vec<MetadataItem>,
    assert_timeout: Duration,
    machine_type: String,
}

impl Template {
    pub fn new(
        metadata: Vec<MetadataItem>,
        assert_timeout: Duration,
        machine_type: impl Into<String>,
    ) -> Self {
        Self {
            metadata,
            assert_timeout,
            machine_type: machine_type.into(),
        }
    }

    pub fn metadata(&self) -> &[MetadataItem] {
        &self.metadata
    }

    pub fn assert_timeout(&self) -> Duration {
        self.assert_timeout
    }

    pub fn machine_type(&self) -> &str {
        &self.machine_type
    }

    /// Looks up a metadata value by key.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        find_value(&self.metadata, key)
    }

    /// Returns the first metadata key that appears more than once.
    pub fn duplicate_metadata_key(&self) -> Option<&str> {
        self.metadata.iter().enumerate().find_map(|(i, item)| {
            self.metadata[..i]
                .iter()
                .any(|prev| prev.key == item.key)
                .then_some(item.key.as_str())
        })
    }

    /// Creates an independent instance of this template.
    ///
    /// The metadata vector is duplicated, so the result can be mutated
    /// without affecting the template or any other instance.
    pub fn instantiate(&self, name: impl Into<String>, image: impl Into<String>) -> TestInstance {
        TestInstance {
            name: name.into(),
            image: image.into(),
            metadata: self.metadata.clone(),
            assert_timeout: self.assert_timeout,
            machine_type: self.machine_type.clone(),
        }
    }
}

/// A single patch test VM configuration consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInstance {
    /// Test instance name, unique within one suite
    pub name: String,
    /// Image to provision
    pub image: String,
    /// Ordered metadata entries; keys are unique
    pub metadata: Vec<MetadataItem>,
    /// Upper bound for post-boot verification
    #[serde(
        rename = "assert_timeout_secs",
        serialize_with = "serialize_secs",
        deserialize_with = "deserialize_secs"
    )]
    pub assert_timeout: Duration,
    /// VM shape
    pub machine_type: String,
}

impl TestInstance {
    /// Looks up a metadata value by key.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        find_value(&self.metadata, key)
    }
}

impl fmt::Display for TestInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] on {} (timeout {}s)",
            self.name,
            self.image,
            self.machine_type,
            self.assert_timeout.as_secs()
        )
    }
}

fn find_value<'a>(items: &'a [MetadataItem], key: &str) -> Option<&'a str> {
    items
        .iter()
        .find(|item| item.key == key)
        .map(|item| item.value.as_str())
}

fn serialize_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}
