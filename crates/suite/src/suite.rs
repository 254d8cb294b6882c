//! Suite selectors: fixed (template, image set) subsets.

use std::fmt;
use std::str::FromStr;

use patchmatrix_core::types::TestInstance;

use crate::catalog::{CatalogKey, ImageFamily, Stage};
use crate::error::SuiteError;
use crate::matrix::MatrixContext;
use crate::template::TemplateId;

/// A named selection of templates and image sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suite {
    /// Every family, newest images
    Head,
    /// Every family, legacy images
    Old,
    /// apt, newest images
    AptHead,
    /// apt downgrade template, downgrade images
    AptDowngrade,
    /// EL7/EL8/EL9, newest images
    YumHead,
    /// SUSE, newest images
    SuseHead,
}

type Pair = (TemplateId, CatalogKey);

const fn pair(template: TemplateId, family: ImageFamily, stage: Stage) -> Pair {
    (template, CatalogKey::new(family, stage))
}

const HEAD_PAIRS: &[Pair] = &[
    pair(TemplateId::Windows, ImageFamily::Windows, Stage::Head),
    pair(TemplateId::El7, ImageFamily::El7, Stage::Head),
    pair(TemplateId::El8, ImageFamily::El8, Stage::Head),
    pair(TemplateId::El9, ImageFamily::El9, Stage::Head),
    pair(TemplateId::Apt, ImageFamily::Apt, Stage::Head),
    pair(TemplateId::Suse, ImageFamily::Suse, Stage::Head),
];

const OLD_PAIRS: &[Pair] = &[
    pair(TemplateId::Windows, ImageFamily::Windows, Stage::Old),
    pair(TemplateId::El7, ImageFamily::El7, Stage::Old),
    pair(TemplateId::El8, ImageFamily::El8, Stage::Old),
    pair(TemplateId::El9, ImageFamily::El9, Stage::Old),
    pair(TemplateId::Apt, ImageFamily::Apt, Stage::Old),
    pair(TemplateId::Suse, ImageFamily::Suse, Stage::Old),
];

const APT_HEAD_PAIRS: &[Pair] = &[pair(TemplateId::Apt, ImageFamily::Apt, Stage::Head)];

const APT_DOWNGRADE_PAIRS: &[Pair] = &[pair(
    TemplateId::AptDowngrade,
    ImageFamily::Apt,
    Stage::Downgrade,
)];

const YUM_HEAD_PAIRS: &[Pair] = &[
    pair(TemplateId::El7, ImageFamily::El7, Stage::Head),
    pair(TemplateId::El8, ImageFamily::El8, Stage::Head),
    pair(TemplateId::El9, ImageFamily::El9, Stage::Head),
];

const SUSE_HEAD_PAIRS: &[Pair] = &[pair(TemplateId::Suse, ImageFamily::Suse, Stage::Head)];

impl Suite {
    pub const ALL: [Suite; 6] = [
        Self::Head,
        Self::Old,
        Self::AptHead,
        Self::AptDowngrade,
        Self::YumHead,
        Self::SuseHead,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Old => "old",
            Self::AptHead => "apt-head",
            Self::AptDowngrade => "apt-downgrade",
            Self::YumHead => "yum-head",
            Self::SuseHead => "suse-head",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Head => "all families, newest images",
            Self::Old => "all families, legacy images",
            Self::AptHead => "apt only, newest images",
            Self::AptDowngrade => "apt only, downgrade images",
            Self::YumHead => "yum family only, newest images",
            Self::SuseHead => "SUSE only, newest images",
        }
    }

    /// The template to image-set association this suite expands.
    pub fn pairs(&self) -> &'static [(TemplateId, CatalogKey)] {
        match self {
            Self::Head => HEAD_PAIRS,
            Self::Old => OLD_PAIRS,
            Self::AptHead => APT_HEAD_PAIRS,
            Self::AptDowngrade => APT_DOWNGRADE_PAIRS,
            Self::YumHead => YUM_HEAD_PAIRS,
            Self::SuseHead => SUSE_HEAD_PAIRS,
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Suite {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|suite| suite.name() == wanted)
            .ok_or_else(|| SuiteError::UnknownSuite(s.to_owned()))
    }
}

/// All families, newest images.
pub fn head_image_suite(ctx: &MatrixContext) -> Vec<TestInstance> {
    ctx.select(Suite::Head)
}

/// All families, legacy images.
pub fn old_image_suite(ctx: &MatrixContext) -> Vec<TestInstance> {
    ctx.select(Suite::Old)
}

pub fn apt_head_image_suite(ctx: &MatrixContext) -> Vec<TestInstance> {
    ctx.select(Suite::AptHead)
}

pub fn apt_downgrade_image_suite(ctx: &MatrixContext) -> Vec<TestInstance> {
    ctx.select(Suite::AptDowngrade)
}

pub fn yum_head_image_suite(ctx: &MatrixContext) -> Vec<TestInstance> {
    ctx.select(Suite::YumHead)
}

pub fn suse_head_image_suite(ctx: &MatrixContext) -> Vec<TestInstance> {
    ctx.select(Suite::SuseHead)
}
