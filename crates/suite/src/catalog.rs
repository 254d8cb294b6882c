//! Image catalog: instance name to image id, per family and lifecycle stage.
//!
//! The built-in catalog lists public image families. A TOML file can replace
//! it:
//!
//! ```toml
//! [[set]]
//! family = "apt"
//! stage = "head"
//!
//! [set.images]
//! apt-head-debian12 = "projects/debian-cloud/global/images/family/debian-12"
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::SuiteError;

/// OS family an image set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFamily {
    Windows,
    Apt,
    El7,
    El8,
    El9,
    Suse,
}

impl ImageFamily {
    pub const ALL: [ImageFamily; 6] = [
        Self::Windows,
        Self::Apt,
        Self::El7,
        Self::El8,
        Self::El9,
        Self::Suse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Apt => "apt",
            Self::El7 => "el7",
            Self::El8 => "el8",
            Self::El9 => "el9",
            Self::Suse => "suse",
        }
    }
}

impl fmt::Display for ImageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Newest image of each family
    Head,
    /// Older, pinned images
    Old,
    /// Images that have a downgrade candidate available
    Downgrade,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Old => "old",
            Self::Downgrade => "downgrade",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one image set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogKey {
    pub family: ImageFamily,
    pub stage: Stage,
}

impl CatalogKey {
    pub const fn new(family: ImageFamily, stage: Stage) -> Self {
        Self { family, stage }
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.stage)
    }
}

/// Instance name to image id, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogEntry(BTreeMap<String, String>);

static EMPTY_ENTRY: CatalogEntry = CatalogEntry::new();

impl CatalogEntry {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds or replaces an image; returns the previous image for `name`.
    pub fn insert(&mut self, name: impl Into<String>, image: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), image.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_image(&self, image: &str) -> bool {
        self.0.values().any(|v| v == image)
    }

    /// `(name, image)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, i)| (n.as_str(), i.as_str()))
    }
}

impl<N: Into<String>, I: Into<String>> FromIterator<(N, I)> for CatalogEntry {
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(n, i)| (n.into(), i.into()))
                .collect(),
        )
    }
}

/// All image sets known to the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCatalog {
    sets: BTreeMap<CatalogKey, CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    set: Vec<CatalogSetFile>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogSetFile {
    family: ImageFamily,
    stage: Stage,
    #[serde(default)]
    images: BTreeMap<String, String>,
}

impl ImageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (key, images) in BUILTIN_SETS {
            catalog.insert(*key, images.iter().copied().collect());
        }
        catalog
    }

    /// Parses a TOML catalog.
    pub fn parse(toml_str: &str) -> Result<Self, SuiteError> {
        let file: CatalogFile =
            toml::from_str(toml_str).map_err(|e| SuiteError::CatalogParse(e.to_string()))?;

        let mut catalog = Self::new();
        for set in file.set {
            let key = CatalogKey::new(set.family, set.stage);
            if catalog.sets.contains_key(&key) {
                return Err(SuiteError::CatalogParse(format!("duplicate set {key}")));
            }
            catalog.insert(key, CatalogEntry(set.images));
        }
        debug!(sets = catalog.sets.len(), "parsed image catalog");
        Ok(catalog)
    }

    /// Reads and parses a TOML catalog file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let path = path.as_ref();
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SuiteError::CatalogLoad {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
        let catalog = Self::parse(&content)?;
        info!(
            path = %path.display(),
            sets = catalog.sets.len(),
            images = catalog.image_count(),
            "loaded image catalog"
        );
        Ok(catalog)
    }

    /// Adds or replaces a set.
    pub fn insert(&mut self, key: CatalogKey, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.sets.insert(key, entry)
    }

    pub fn get(&self, key: CatalogKey) -> Option<&CatalogEntry> {
        self.sets.get(&key)
    }

    /// Set for `key`, or an empty set when absent.
    pub fn entry(&self, key: CatalogKey) -> &CatalogEntry {
        self.sets.get(&key).unwrap_or(&EMPTY_ENTRY)
    }

    pub fn contains(&self, key: CatalogKey) -> bool {
        self.sets.contains_key(&key)
    }

    pub fn sets(&self) -> btree_map::Iter<'_, CatalogKey, CatalogEntry> {
        self.sets.iter()
    }

    /// Number of sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of images across all sets.
    pub fn image_count(&self) -> usize {
        self.sets.values().map(CatalogEntry::len).sum()
    }
}

type BuiltinSet = (CatalogKey, &'static [(&'static str, &'static str)]);

const BUILTIN_SETS: &[BuiltinSet] = &[
    (
        CatalogKey::new(ImageFamily::Windows, Stage::Head),
        &[
            ("windows-head-2016-dc", "projects/windows-cloud/global/images/family/windows-2016"),
            ("windows-head-2016-core", "projects/windows-cloud/global/images/family/windows-2016-core"),
            ("windows-head-2019-dc", "projects/windows-cloud/global/images/family/windows-2019"),
            ("windows-head-2019-core", "projects/windows-cloud/global/images/family/windows-2019-core"),
            ("windows-head-2022-dc", "projects/windows-cloud/global/images/family/windows-2022"),
            ("windows-head-2022-core", "projects/windows-cloud/global/images/family/windows-2022-core"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::Windows, Stage::Old),
        &[
            ("windows-old-2016-dc", "projects/windows-cloud/global/images/windows-server-2016-dc-v20230912"),
            ("windows-old-2019-dc", "projects/windows-cloud/global/images/windows-server-2019-dc-v20230912"),
            ("windows-old-2022-dc", "projects/windows-cloud/global/images/windows-server-2022-dc-v20230912"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::Apt, Stage::Head),
        &[
            ("apt-head-debian11", "projects/debian-cloud/global/images/family/debian-11"),
            ("apt-head-debian12", "projects/debian-cloud/global/images/family/debian-12"),
            ("apt-head-ubuntu2004", "projects/ubuntu-os-cloud/global/images/family/ubuntu-2004-lts"),
            ("apt-head-ubuntu2204", "projects/ubuntu-os-cloud/global/images/family/ubuntu-2204-lts"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::Apt, Stage::Old),
        &[
            ("apt-old-debian11", "projects/debian-cloud/global/images/debian-11-bullseye-v20230912"),
            ("apt-old-ubuntu2004", "projects/ubuntu-os-cloud/global/images/ubuntu-2004-focal-v20230918"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::Apt, Stage::Downgrade),
        &[("apt-downgrade-debian10", "projects/debian-cloud/global/images/family/debian-10")],
    ),
    (
        CatalogKey::new(ImageFamily::El7, Stage::Head),
        &[
            ("el7-head-centos7", "projects/centos-cloud/global/images/family/centos-7"),
            ("el7-head-rhel7", "projects/rhel-cloud/global/images/family/rhel-7"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::El7, Stage::Old),
        &[
            ("el7-old-centos7", "projects/centos-cloud/global/images/centos-7-v20230912"),
            ("el7-old-rhel7", "projects/rhel-cloud/global/images/rhel-7-v20230912"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::El8, Stage::Head),
        &[
            ("el8-head-rhel8", "projects/rhel-cloud/global/images/family/rhel-8"),
            ("el8-head-rocky8", "projects/rocky-linux-cloud/global/images/family/rocky-linux-8"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::El8, Stage::Old),
        &[
            ("el8-old-rhel8", "projects/rhel-cloud/global/images/rhel-8-v20230912"),
            ("el8-old-rocky8", "projects/rocky-linux-cloud/global/images/rocky-linux-8-v20230912"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::El9, Stage::Head),
        &[
            ("el9-head-centos-stream9", "projects/centos-cloud/global/images/family/centos-stream-9"),
            ("el9-head-rhel9", "projects/rhel-cloud/global/images/family/rhel-9"),
            ("el9-head-rocky9", "projects/rocky-linux-cloud/global/images/family/rocky-linux-9"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::El9, Stage::Old),
        &[
            ("el9-old-rhel9", "projects/rhel-cloud/global/images/rhel-9-v20230912"),
            ("el9-old-rocky9", "projects/rocky-linux-cloud/global/images/rocky-linux-9-v20230912"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::Suse, Stage::Head),
        &[
            ("suse-head-sles12", "projects/suse-cloud/global/images/family/sles-12"),
            ("suse-head-sles15", "projects/suse-cloud/global/images/family/sles-15"),
        ],
    ),
    (
        CatalogKey::new(ImageFamily::Suse, Stage::Old),
        &[("suse-old-sles15", "projects/suse-cloud/global/images/sles-15-sp4-v20230912")],
    ),
];
