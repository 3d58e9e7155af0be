//! Background precedence resolution.
//!
//! # Precedence (first match wins)
//! 1. Route rule whose pattern matches the path
//! 2. The entity's own images
//! 3. The entity's parent category images
//! 4. The site default record
//! 5. No image, default opacity
//!
//! A tier contributes its desktop, mobile and opacity together; tiers are never
//! mixed field by field. Opacity is passed through unclamped.

use crate::background::types::{
    non_empty, BackgroundFields, EntityBackground, ResolvedBackground, RouteBackgroundRule,
    SiteDefaultBackground, Tier, DEFAULT_OVERLAY_OPACITY,
};
use crate::routing::matcher::matches;
use crate::routing::RouteRuleSet;

/// Resolve the background for `path`.
///
/// `rules` are expected active-only and ordered by priority descending, as
/// returned by [`RouteRuleSet`](crate::routing::RouteRuleSet). Any input may be
/// absent; absence only moves resolution to the next tier.
pub fn resolve(
    path: &str,
    rules: &[RouteBackgroundRule],
    entity: Option<&EntityBackground>,
    site_default: Option<&SiteDefaultBackground>,
) -> ResolvedBackground {
    resolve_with_tier(path, rules, entity, site_default).0
}

/// Same as [`resolve`], also reporting which tier decided.
pub fn resolve_with_tier(
    path: &str,
    rules: &[RouteBackgroundRule],
    entity: Option<&EntityBackground>,
    site_default: Option<&SiteDefaultBackground>,
) -> (ResolvedBackground, Tier) {
    let matched = rules
        .iter()
        .filter(|r| r.active)
        .find(|r| matches(path, &r.path_pattern));
    decide(path, matched, entity, site_default)
}

/// Same as [`resolve_with_tier`], matching through a compiled [`RouteRuleSet`].
pub fn resolve_in_rule_set(
    path: &str,
    rules: &RouteRuleSet,
    entity: Option<&EntityBackground>,
    site_default: Option<&SiteDefaultBackground>,
) -> (ResolvedBackground, Tier) {
    decide(path, rules.find(path), entity, site_default)
}

fn decide(
    path: &str,
    matched: Option<&RouteBackgroundRule>,
    entity: Option<&EntityBackground>,
    site_default: Option<&SiteDefaultBackground>,
) -> (ResolvedBackground, Tier) {
    let (resolved, tier) = pick(matched, entity, site_default);
    tracing::trace!(
        path = %path,
        tier = %tier,
        desktop_url = ?resolved.desktop_url,
        mobile_url = ?resolved.mobile_url,
        overlay_opacity = resolved.overlay_opacity,
        "Background resolved"
    );
    (resolved, tier)
}

fn pick(
    matched: Option<&RouteBackgroundRule>,
    entity: Option<&EntityBackground>,
    site_default: Option<&SiteDefaultBackground>,
) -> (ResolvedBackground, Tier) {
    if let Some(rule) = matched {
        // Route rules are taken verbatim
        let resolved = ResolvedBackground {
            desktop_url: rule.desktop_url.clone(),
            mobile_url: rule.mobile_url.clone(),
            overlay_opacity: rule.overlay_opacity.unwrap_or(DEFAULT_OVERLAY_OPACITY),
        };
        return (resolved, Tier::RouteRule);
    }

    if let Some(entity) = entity {
        if entity.own().declares_image() {
            return (from_fields(entity.own()), Tier::Entity);
        }
        if let Some(category) = entity.parent_category().filter(|c| c.declares_image()) {
            return (from_fields(category), Tier::ParentCategory);
        }
    }

    match site_default {
        Some(site) => (from_fields(site), Tier::SiteDefault),
        None => (ResolvedBackground::default(), Tier::HardDefault),
    }
}

fn from_fields(fields: &BackgroundFields) -> ResolvedBackground {
    ResolvedBackground {
        desktop_url: non_empty(&fields.desktop_url).map(str::to_string),
        mobile_url: non_empty(&fields.mobile_url).map(str::to_string),
        overlay_opacity: fields.overlay_opacity.unwrap_or(DEFAULT_OVERLAY_OPACITY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(desktop: Option<&str>, mobile: Option<&str>, opacity: Option<f64>) -> BackgroundFields {
        BackgroundFields::new(desktop, mobile, opacity)
    }

    fn product(own: BackgroundFields, category: Option<BackgroundFields>) -> EntityBackground {
        EntityBackground::Product { own, category }
    }

    #[test]
    fn test_route_rule_beats_everything() {
        let rules = vec![RouteBackgroundRule::new("/", 1)
            .with_desktop("rule-d")
            .with_mobile("rule-m")
            .with_opacity(0.6)];
        let entity = product(
            fields(Some("entity-d"), Some("entity-m"), Some(0.1)),
            Some(fields(Some("cat-d"), None, None)),
        );
        let site = fields(Some("site-d"), Some("site-m"), Some(0.9));

        let (resolved, tier) = resolve_with_tier("/", &rules, Some(&entity), Some(&site));
        assert_eq!(tier, Tier::RouteRule);
        assert_eq!(
            resolved,
            ResolvedBackground {
                desktop_url: Some("rule-d".into()),
                mobile_url: Some("rule-m".into()),
                overlay_opacity: 0.6,
            }
        );
    }

    #[test]
    fn test_route_rule_without_images_still_wins() {
        let rules = vec![RouteBackgroundRule::new("/company", 0)];
        let site = fields(Some("site-d"), None, Some(0.9));
        let (resolved, tier) = resolve_with_tier("/company", &rules, None, Some(&site));
        assert_eq!(tier, Tier::RouteRule);
        assert_eq!(resolved, ResolvedBackground::default());
    }

    #[test]
    fn test_route_rule_takes_urls_verbatim() {
        let rules = vec![RouteBackgroundRule::new("/", 0).with_desktop("")];
        let resolved = resolve("/", &rules, None, None);
        assert_eq!(resolved.desktop_url.as_deref(), Some(""));
    }

    #[test]
    fn test_inactive_rule_is_skipped() {
        let rules = vec![RouteBackgroundRule::new("/", 0).with_desktop("rule").inactive()];
        let site = fields(Some("site"), None, None);
        let (resolved, tier) = resolve_with_tier("/", &rules, None, Some(&site));
        assert_eq!(tier, Tier::SiteDefault);
        assert_eq!(resolved.desktop_url.as_deref(), Some("site"));
    }

    #[test]
    fn test_entity_desktop_only() {
        let entity = EntityBackground::Category(fields(Some("B"), None, None));
        let site = fields(Some("site"), Some("site-m"), Some(0.8));
        let (resolved, tier) = resolve_with_tier("/c/cosmetics", &[], Some(&entity), Some(&site));
        assert_eq!(tier, Tier::Entity);
        assert_eq!(
            resolved,
            ResolvedBackground {
                desktop_url: Some("B".into()),
                mobile_url: None,
                overlay_opacity: 0.35,
            }
        );
    }

    #[test]
    fn test_entity_mobile_only_short_circuits() {
        let entity = product(
            fields(None, Some("own-m"), Some(0.5)),
            Some(fields(Some("cat-d"), Some("cat-m"), None)),
        );
        let (resolved, tier) = resolve_with_tier("/p/jar", &[], Some(&entity), None);
        assert_eq!(tier, Tier::Entity);
        assert_eq!(resolved.desktop_url, None);
        assert_eq!(resolved.mobile_url.as_deref(), Some("own-m"));
        assert_eq!(resolved.overlay_opacity, 0.5);
    }

    #[test]
    fn test_entity_opacity_alone_does_not_count() {
        let entity = product(fields(None, None, Some(0.9)), None);
        let site = fields(Some("site"), None, None);
        let (resolved, tier) = resolve_with_tier("/p/jar", &[], Some(&entity), Some(&site));
        assert_eq!(tier, Tier::SiteDefault);
        assert_eq!(resolved.overlay_opacity, 0.35);
    }

    #[test]
    fn test_falls_through_to_parent_category() {
        let entity = product(
            BackgroundFields::default(),
            Some(fields(None, Some("cat-m"), Some(0.15))),
        );
        let site = fields(Some("site"), None, None);
        let (resolved, tier) = resolve_with_tier("/p/jar", &[], Some(&entity), Some(&site));
        assert_eq!(tier, Tier::ParentCategory);
        assert_eq!(
            resolved,
            ResolvedBackground {
                desktop_url: None,
                mobile_url: Some("cat-m".into()),
                overlay_opacity: 0.15,
            }
        );
    }

    #[test]
    fn test_category_without_images_falls_to_site_default() {
        let entity = product(BackgroundFields::default(), Some(BackgroundFields::default()));
        let site = fields(None, Some("site-m"), None);
        let (resolved, tier) = resolve_with_tier("/p/jar", &[], Some(&entity), Some(&site));
        assert_eq!(tier, Tier::SiteDefault);
        assert_eq!(resolved.mobile_url.as_deref(), Some("site-m"));
    }

    #[test]
    fn test_site_default_without_images_still_applies() {
        let site = fields(None, None, Some(0.7));
        let (resolved, tier) = resolve_with_tier("/", &[], None, Some(&site));
        assert_eq!(tier, Tier::SiteDefault);
        assert_eq!(resolved.overlay_opacity, 0.7);
        assert_eq!(resolved.desktop_url, None);
    }

    #[test]
    fn test_all_tiers_empty() {
        let (resolved, tier) = resolve_with_tier("/", &[], None, None);
        assert_eq!(tier, Tier::HardDefault);
        assert_eq!(
            resolved,
            ResolvedBackground {
                desktop_url: None,
                mobile_url: None,
                overlay_opacity: 0.35,
            }
        );
    }

    #[test]
    fn test_opacity_passed_through_unclamped() {
        let entity = EntityBackground::Category(fields(Some("d"), None, Some(1.7)));
        assert_eq!(resolve("/", &[], Some(&entity), None).overlay_opacity, 1.7);
        let rules = vec![RouteBackgroundRule::new("/", 0).with_opacity(-0.2)];
        assert_eq!(resolve("/", &rules, None, None).overlay_opacity, -0.2);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let rules = RouteRuleSet::new(vec![RouteBackgroundRule::new("/x/*", 3).with_mobile("m")]);
        let entity = product(fields(Some("e"), None, None), None);
        let site = fields(Some("s"), None, None);
        for path in ["/x/1", "/y"] {
            let first = resolve(path, rules.as_slice(), Some(&entity), Some(&site));
            let second = resolve(path, rules.as_slice(), Some(&entity), Some(&site));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_wildcard_rule_beats_entity_end_to_end() {
        let rules = RouteRuleSet::new(vec![RouteBackgroundRule::new("/c/*", 10)
            .with_desktop("A")
            .with_opacity(0.2)]);
        let entity = EntityBackground::Category(fields(Some("B"), None, None));
        let resolved = resolve("/c/cosmetics", rules.as_slice(), Some(&entity), None);
        assert_eq!(
            resolved,
            ResolvedBackground {
                desktop_url: Some("A".into()),
                mobile_url: None,
                overlay_opacity: 0.2,
            }
        );
    }

    #[test]
    fn test_rule_set_resolution_agrees_with_slice() {
        let raw = vec![
            RouteBackgroundRule::new("/c/cosmetics", 1).with_desktop("exact"),
            RouteBackgroundRule::new("/c/*", 5).with_desktop("wildcard").with_opacity(0.2),
            RouteBackgroundRule::new("/", 9).with_mobile("home").inactive(),
        ];
        let rules = RouteRuleSet::new(raw);
        let entity = product(fields(None, None, None), Some(fields(None, Some("cat-m"), None)));
        let site = fields(Some("site"), None, None);

        for path in ["/", "/c", "/c/cosmetics", "/cabinets", "/p/jar"] {
            assert_eq!(
                resolve_in_rule_set(path, &rules, Some(&entity), Some(&site)),
                resolve_with_tier(path, rules.as_slice(), Some(&entity), Some(&site)),
                "{path}"
            );
        }
        let (resolved, tier) = resolve_in_rule_set("/cabinets", &rules, None, None);
        assert_eq!(tier, Tier::RouteRule);
        assert_eq!(resolved.desktop_url.as_deref(), Some("wildcard"));
    }
}
