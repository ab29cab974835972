use std::fmt;

use common::upload::AssetPolicy;
use common::upload::validator::{AVATAR_MAX_BYTES, DEFAULT_MAX_BYTES};
use serde::{Deserialize, Serialize};

/// Record types that own at most one image each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OwnerKind {
    Events,
    Members,
    Mentors,
    Slides,
    Startups,
    Sponsors,
    SiteConfig,
}

impl OwnerKind {
    /// Storage bucket the kind's images are written to.
    pub fn bucket(self) -> &'static str {
        match self {
            OwnerKind::Events => "event-images",
            OwnerKind::Members => "member-avatars",
            OwnerKind::Mentors => "mentor-photos",
            OwnerKind::Slides => "slides",
            OwnerKind::Startups => "startup-logos",
            OwnerKind::Sponsors => "sponsor-logos",
            OwnerKind::SiteConfig => "site-assets",
        }
    }

    /// Photos of people are capped lower; logos may be SVG.
    pub fn policy(self) -> AssetPolicy {
        match self {
            OwnerKind::Members | OwnerKind::Mentors => AssetPolicy::raster(AVATAR_MAX_BYTES),
            OwnerKind::Events | OwnerKind::Slides => AssetPolicy::raster(DEFAULT_MAX_BYTES),
            OwnerKind::Startups | OwnerKind::Sponsors | OwnerKind::SiteConfig => {
                AssetPolicy::raster(DEFAULT_MAX_BYTES).with_svg()
            }
        }
    }

    /// Singular, human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            OwnerKind::Events => "Event",
            OwnerKind::Members => "Member",
            OwnerKind::Mentors => "Mentor",
            OwnerKind::Slides => "Slide",
            OwnerKind::Startups => "Startup",
            OwnerKind::Sponsors => "Sponsor",
            OwnerKind::SiteConfig => "Site config",
        }
    }
}

/// One owner record: its kind plus primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerRef {
    pub kind: OwnerKind,
    pub id: i32,
}

impl OwnerRef {
    pub fn new(kind: OwnerKind, id: i32) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.id)
    }
}
