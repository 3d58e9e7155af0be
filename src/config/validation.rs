//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check path patterns only use the supported wildcard form
//! - Validate value ranges (opacity in [0, 1]) and image URLs
//! - Check referential integrity (products reference existing categories)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - The same record checks back the admin API writes
//! - The resolver does not depend on validation; unvalidated records still
//!   resolve, with opacity passed through as stored

use std::collections::HashSet;

use url::Url;

use crate::background::{BackgroundFields, RouteBackgroundRule};
use crate::config::schema::SiteConfig;
use crate::routing::matcher::PathPattern;

/// A single semantic problem, located by `field`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: path pattern must not be empty")]
    EmptyPattern { field: String },

    #[error("{field}: path pattern `{pattern}` must start with '/'")]
    RelativePattern { field: String, pattern: String },

    #[error("{field}: `*` is only supported as a trailing `/*` in `{pattern}`")]
    UnsupportedWildcard { field: String, pattern: String },

    #[error("{field}: overlay opacity {value} is outside [0, 1]")]
    OpacityOutOfRange { field: String, value: f64 },

    #[error("{field}: `{url}` is not an absolute http(s) URL")]
    InvalidUrl { field: String, url: String },

    #[error("{field}: slug must not be empty")]
    EmptySlug { field: String },

    #[error("{field}: duplicate slug `{slug}`")]
    DuplicateSlug { field: String, slug: String },

    #[error("{field}: unknown category `{slug}`")]
    UnknownCategory { field: String, slug: String },

    #[error("admin.api_key must be set when the admin API is enabled")]
    MissingApiKey,
}

/// Validate a whole configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingApiKey);
    }

    let backgrounds = &config.backgrounds;
    if let Some(site) = &backgrounds.site_default {
        check_background(site, "backgrounds.site_default", &mut errors);
    }

    for (i, rule) in backgrounds.routes.iter().enumerate() {
        check_route_rule(rule, &format!("backgrounds.routes[{i}]"), &mut errors);
    }

    let mut categories = HashSet::new();
    for (i, category) in backgrounds.categories.iter().enumerate() {
        let field = format!("backgrounds.categories[{i}]");
        check_slug(&category.slug, &field, &mut categories, &mut errors);
        check_background(&category.background(), &field, &mut errors);
    }

    let mut products = HashSet::new();
    for (i, product) in backgrounds.products.iter().enumerate() {
        let field = format!("backgrounds.products[{i}]");
        check_slug(&product.slug, &field, &mut products, &mut errors);
        check_background(&product.background(), &field, &mut errors);
        if let Some(category) = &product.category {
            if !categories.contains(category.as_str()) {
                errors.push(ValidationError::UnknownCategory {
                    field: format!("{field}.category"),
                    slug: category.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a route rule submitted through the admin API.
pub fn validate_route_rule(rule: &RouteBackgroundRule) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_route_rule(rule, "rule", &mut errors);
    into_result(errors)
}

/// Validate a background record submitted through the admin API.
pub fn validate_background(fields: &BackgroundFields, field: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_background(fields, field, &mut errors);
    into_result(errors)
}

/// Validate a slug submitted through the admin API.
pub fn validate_slug(slug: &str, field: &str) -> Result<(), Vec<ValidationError>> {
    if slug.trim().is_empty() {
        return Err(vec![ValidationError::EmptySlug { field: field.to_string() }]);
    }
    Ok(())
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_route_rule(rule: &RouteBackgroundRule, field: &str, errors: &mut Vec<ValidationError>) {
    let pattern = &rule.path_pattern;
    let pattern_field = format!("{field}.path_pattern");

    if pattern.is_empty() {
        errors.push(ValidationError::EmptyPattern { field: pattern_field });
    } else {
        if !pattern.starts_with('/') {
            errors.push(ValidationError::RelativePattern {
                field: pattern_field.clone(),
                pattern: pattern.clone(),
            });
        }
        let literal = match PathPattern::parse(pattern) {
            PathPattern::Exact(path) => path,
            PathPattern::Prefix(prefix) => prefix,
        };
        if literal.contains('*') {
            errors.push(ValidationError::UnsupportedWildcard {
                field: pattern_field,
                pattern: pattern.clone(),
            });
        }
    }

    check_opacity(rule.overlay_opacity, field, errors);
    check_url(rule.desktop_url.as_deref(), &format!("{field}.desktop_url"), errors);
    check_url(rule.mobile_url.as_deref(), &format!("{field}.mobile_url"), errors);
}

fn check_background(fields: &BackgroundFields, field: &str, errors: &mut Vec<ValidationError>) {
    check_opacity(fields.overlay_opacity, field, errors);
    check_url(fields.desktop_url.as_deref(), &format!("{field}.desktop_url"), errors);
    check_url(fields.mobile_url.as_deref(), &format!("{field}.mobile_url"), errors);
}

fn check_opacity(opacity: Option<f64>, field: &str, errors: &mut Vec<ValidationError>) {
    if let Some(value) = opacity {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            errors.push(ValidationError::OpacityOutOfRange {
                field: format!("{field}.overlay_opacity"),
                value,
            });
        }
    }
}

fn check_url(url: Option<&str>, field: &str, errors: &mut Vec<ValidationError>) {
    let Some(url) = url else { return };
    let valid = Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field: field.to_string(),
            url: url.to_string(),
        });
    }
}

fn check_slug<'a>(slug: &'a str, field: &str, seen: &mut HashSet<&'a str>, errors: &mut Vec<ValidationError>) {
    if slug.trim().is_empty() {
        errors.push(ValidationError::EmptySlug {
            field: format!("{field}.slug"),
        });
    } else if !seen.insert(slug) {
        errors.push(ValidationError::DuplicateSlug {
            field: format!("{field}.slug"),
            slug: slug.to_string(),
        });
    }
}
