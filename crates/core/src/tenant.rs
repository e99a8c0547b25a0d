// Tenant configuration domain types
//
// A tenant is branding (colors, logo, brand name, layout) plus a set of named
// feature flags. Two update paths exist and they differ on purpose:
// - apply_patch: shallow per-field overwrite; a supplied `features` map
//   replaces the stored map wholesale
// - merge_features: key-by-key merge; keys absent from the delta are kept

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Feature name to enabled state. Ordered so the persisted document is stable.
pub type FeatureFlags = BTreeMap<String, bool>;

/// Navigation layout of the tenant UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Side navigation.
    #[default]
    Side,
    /// Top navigation.
    Top,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Side => write!(f, "side"),
            Layout::Top => write!(f, "top"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown layout: {0:?} (expected \"side\" or \"top\")")]
pub struct UnknownLayout(pub String);

impl FromStr for Layout {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "side" => Ok(Layout::Side),
            "top" => Ok(Layout::Top),
            other => Err(UnknownLayout(other.to_string())),
        }
    }
}

/// Fully resolved tenant configuration. No field is ever left unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TenantConfig {
    /// Feature flags for this tenant.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object, example = json!({"feature1": true})))]
    pub features: FeatureFlags,
    /// Primary theme color.
    #[cfg_attr(feature = "openapi", schema(example = "#2563eb"))]
    pub primary_color: String,
    /// Secondary theme color.
    #[cfg_attr(feature = "openapi", schema(example = "#a21caf"))]
    pub secondary_color: String,
    /// Absolute logo URL, or a path relative to the service's static assets.
    pub logo: String,
    /// Display name of the tenant brand.
    pub brand_name: String,
    /// Navigation layout.
    pub layout: Layout,
}

/// Create input. Unset fields are filled from [`TenantDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTenant {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo: Option<String>,
    pub brand_name: Option<String>,
    pub layout: Option<Layout>,
    pub features: Option<FeatureFlags>,
}

/// Partial update. Present fields overwrite, `features` replaces the whole map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantPatch {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo: Option<String>,
    pub brand_name: Option<String>,
    pub layout: Option<Layout>,
    pub features: Option<FeatureFlags>,
}

impl TenantPatch {
    pub fn is_empty(&self) -> bool {
        *self == TenantPatch::default()
    }
}

impl TenantConfig {
    /// Shallow merge of a partial update into this record.
    pub fn apply_patch(&mut self, patch: TenantPatch) {
        if let Some(primary_color) = patch.primary_color {
            self.primary_color = primary_color;
        }
        if let Some(secondary_color) = patch.secondary_color {
            self.secondary_color = secondary_color;
        }
        if let Some(logo) = patch.logo {
            self.logo = logo;
        }
        if let Some(brand_name) = patch.brand_name {
            self.brand_name = brand_name;
        }
        if let Some(layout) = patch.layout {
            self.layout = layout;
        }
        if let Some(features) = patch.features {
            self.features = features;
        }
    }

    /// Merge a feature delta key by key and return the resulting full map.
    pub fn merge_features(&mut self, delta: FeatureFlags) -> &FeatureFlags {
        self.features.extend(delta);
        &self.features
    }

    /// Whether the logo needs a base URL prefix before it is shown to clients.
    pub fn has_relative_logo(&self) -> bool {
        !(self.logo.starts_with("http://") || self.logo.starts_with("https://"))
    }
}

/// Process-wide defaults applied when a tenant is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantDefaults {
    pub primary_color: String,
    pub secondary_color: String,
    pub logo: String,
    pub brand_name: String,
    pub layout: Layout,
    pub features: FeatureFlags,
}

impl Default for TenantDefaults {
    fn default() -> Self {
        let features = (1..=5)
            .map(|n| (format!("feature{n}"), true))
            .collect::<FeatureFlags>();

        Self {
            primary_color: "#2563eb".to_string(),
            secondary_color: "#a21caf".to_string(),
            logo: "https://placehold.co/100x50?text=Tenant".to_string(),
            brand_name: "Mint Tenants".to_string(),
            layout: Layout::Side,
            features,
        }
    }
}

impl TenantDefaults {
    /// Build a full configuration from create input.
    ///
    /// Empty branding strings count as unset. A supplied feature map is used
    /// verbatim and is never merged with the baseline set.
    pub fn resolve(&self, input: NewTenant) -> TenantConfig {
        fn or_default(value: Option<String>, default: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        }

        TenantConfig {
            features: input.features.unwrap_or_else(|| self.features.clone()),
            primary_color: or_default(input.primary_color, &self.primary_color),
            secondary_color: or_default(input.secondary_color, &self.secondary_color),
            logo: or_default(input.logo, &self.logo),
            brand_name: or_default(input.brand_name, &self.brand_name),
            layout: input.layout.unwrap_or(self.layout),
        }
    }
}
