//! Background record types.
//!
//! These are read-only snapshots as far as resolution is concerned. Records are
//! written by the admin API or the configuration file and handed to the
//! resolver already fetched.

use serde::{Deserialize, Serialize};

/// Overlay opacity used whenever a tier does not specify one.
pub const DEFAULT_OVERLAY_OPACITY: f64 = 0.35;

/// The image pair and overlay a record may carry.
///
/// Shared by categories, products and the site default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundFields {
    pub desktop_url: Option<String>,
    pub mobile_url: Option<String>,
    pub overlay_opacity: Option<f64>,
}

impl BackgroundFields {
    pub fn new(desktop_url: Option<&str>, mobile_url: Option<&str>, overlay_opacity: Option<f64>) -> Self {
        Self {
            desktop_url: desktop_url.map(str::to_string),
            mobile_url: mobile_url.map(str::to_string),
            overlay_opacity,
        }
    }

    /// True if either image URL is present. A mobile-only record counts.
    pub fn declares_image(&self) -> bool {
        non_empty(&self.desktop_url).is_some() || non_empty(&self.mobile_url).is_some()
    }
}

/// The single site-wide fallback record.
pub type SiteDefaultBackground = BackgroundFields;

/// An admin-configured mapping from a path pattern to a background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteBackgroundRule {
    /// Exact path, or a prefix followed by `/*`.
    pub path_pattern: String,

    /// Higher priority rules are consulted first.
    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub desktop_url: Option<String>,

    #[serde(default)]
    pub mobile_url: Option<String>,

    #[serde(default)]
    pub overlay_opacity: Option<f64>,

    /// Inactive rules never take part in resolution.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl RouteBackgroundRule {
    /// An active rule with no images and default opacity.
    pub fn new(path_pattern: impl Into<String>, priority: i32) -> Self {
        Self {
            path_pattern: path_pattern.into(),
            priority,
            desktop_url: None,
            mobile_url: None,
            overlay_opacity: None,
            active: true,
        }
    }

    pub fn with_desktop(mut self, url: impl Into<String>) -> Self {
        self.desktop_url = Some(url.into());
        self
    }

    pub fn with_mobile(mut self, url: impl Into<String>) -> Self {
        self.mobile_url = Some(url.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.overlay_opacity = Some(opacity);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// The content entity a page is rendering, if any.
///
/// A product may point at its parent category, which is consulted only when
/// the product itself has no image.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityBackground {
    Category(BackgroundFields),
    Product {
        own: BackgroundFields,
        category: Option<BackgroundFields>,
    },
}

impl EntityBackground {
    pub fn own(&self) -> &BackgroundFields {
        match self {
            EntityBackground::Category(fields) => fields,
            EntityBackground::Product { own, .. } => own,
        }
    }

    pub fn parent_category(&self) -> Option<&BackgroundFields> {
        match self {
            EntityBackground::Category(_) => None,
            EntityBackground::Product { category, .. } => category.as_ref(),
        }
    }
}

/// Which precedence level produced a resolved background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    RouteRule,
    Entity,
    ParentCategory,
    SiteDefault,
    HardDefault,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::RouteRule => "route_rule",
            Tier::Entity => "entity",
            Tier::ParentCategory => "parent_category",
            Tier::SiteDefault => "site_default",
            Tier::HardDefault => "hard_default",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The background a page should paint.
///
/// Opacity is always populated. Both URLs being `None` means the page renders
/// its decorative fallback instead of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBackground {
    pub desktop_url: Option<String>,
    pub mobile_url: Option<String>,
    pub overlay_opacity: f64,
}

impl Default for ResolvedBackground {
    fn default() -> Self {
        Self {
            desktop_url: None,
            mobile_url: None,
            overlay_opacity: DEFAULT_OVERLAY_OPACITY,
        }
    }
}

/// Treats an empty string the same as a missing URL.
pub(crate) fn non_empty(url: &Option<String>) -> Option<&str> {
    url.as_deref().filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declares_image() {
        assert!(!BackgroundFields::default().declares_image());
        assert!(BackgroundFields::new(None, Some("m.jpg"), None).declares_image());
        assert!(BackgroundFields::new(Some("d.jpg"), None, None).declares_image());
        // Empty strings are not images
        assert!(!BackgroundFields::new(Some(""), Some(""), Some(0.5)).declares_image());
    }

    #[test]
    fn test_rule_defaults_from_json() {
        let rule: RouteBackgroundRule = serde_json::from_str(r#"{"path_pattern": "/"}"#).unwrap();
        assert_eq!(rule, RouteBackgroundRule::new("/", 0));
        assert!(rule.active);
    }

    #[test]
    fn test_entity_accessors() {
        let cat = BackgroundFields::new(Some("cat.jpg"), None, None);
        let product = EntityBackground::Product {
            own: BackgroundFields::default(),
            category: Some(cat.clone()),
        };
        assert_eq!(product.parent_category(), Some(&cat));
        assert_eq!(EntityBackground::Category(cat.clone()).parent_category(), None);
        assert_eq!(EntityBackground::Category(cat.clone()).own(), &cat);
    }
}
