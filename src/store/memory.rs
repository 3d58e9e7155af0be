//! In-process background store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::background::{
    resolve_in_rule_set, BackgroundFields, EntityBackground, ResolvedBackground, RouteBackgroundRule,
    SiteDefaultBackground, Tier,
};
use crate::config::BackgroundsConfig;
use crate::routing::RouteRuleSet;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("route rule {0} not found")]
    RuleNotFound(Uuid),

    #[error("category `{0}` not found")]
    CategoryNotFound(String),

    #[error("category `{slug}` is still used by products {products:?}")]
    CategoryInUse { slug: String, products: Vec<String> },

    #[error("product `{0}` not found")]
    ProductNotFound(String),

    #[error("site default background is not set")]
    SiteDefaultNotSet,
}

/// A route rule together with its store identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRule {
    pub id: Uuid,
    pub rule: RouteBackgroundRule,
    /// Insertion order, used to keep equal priorities stable.
    #[serde(skip)]
    seq: u64,
}

/// A product's background and the slug of its parent category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductBackground {
    pub category: Option<String>,
    pub background: BackgroundFields,
}

/// Which catalog entity a page is rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRef {
    Category(String),
    Product(String),
}

/// One generation of every background record.
///
/// Never mutated once published; writers build the next generation and swap
/// it in whole.
#[derive(Debug, Clone, Default)]
pub struct BackgroundSnapshot {
    /// Every rule, inactive included, in insertion order.
    stored: Vec<StoredRule>,
    /// Active rules, priority descending. Rebuilt from `stored` on write.
    rules: RouteRuleSet,
    site_default: Option<SiteDefaultBackground>,
    categories: HashMap<String, BackgroundFields>,
    products: HashMap<String, ProductBackground>,
}

impl BackgroundSnapshot {
    /// Active rules in resolution order.
    pub fn rules(&self) -> &RouteRuleSet {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.stored.len()
    }

    pub fn site_default(&self) -> Option<&SiteDefaultBackground> {
        self.site_default.as_ref()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    /// Look up an entity, joining a product's parent category.
    ///
    /// A product whose category is missing resolves without one.
    pub fn entity_for(&self, entity: &EntityRef) -> Option<EntityBackground> {
        match entity {
            EntityRef::Category(slug) => self.categories.get(slug).cloned().map(EntityBackground::Category),
            EntityRef::Product(slug) => {
                let product = self.products.get(slug)?;
                let category = product
                    .category
                    .as_deref()
                    .and_then(|c| self.categories.get(c))
                    .cloned();
                Some(EntityBackground::Product {
                    own: product.background.clone(),
                    category,
                })
            }
        }
    }

    /// Resolve `path` for an optional catalog entity, using only this generation.
    ///
    /// Unknown entities are treated as absent.
    pub fn resolve(&self, path: &str, entity: Option<&EntityRef>) -> (ResolvedBackground, Tier) {
        let entity = entity.and_then(|e| self.entity_for(e));
        resolve_in_rule_set(path, &self.rules, entity.as_ref(), self.site_default.as_ref())
    }

    fn reindex(&mut self) {
        self.rules = self.stored.iter().map(|s| s.rule.clone()).collect();
    }

    fn products_in(&self, category: &str) -> Vec<String> {
        let mut slugs: Vec<_> = self
            .products
            .iter()
            .filter(|(_, p)| p.category.as_deref() == Some(category))
            .map(|(slug, _)| slug.clone())
            .collect();
        slugs.sort();
        slugs
    }
}

/// Concurrent store for background records.
///
/// Every record lives in one [`BackgroundSnapshot`] behind an `ArcSwap`, so a
/// reader sees rules, site default and catalog from the same generation.
/// Reads are a single `Arc` load. Writes clone the current generation, change
/// the clone and swap it in, retrying if another writer got there first.
#[derive(Debug, Default)]
pub struct BackgroundStore {
    records: ArcSwap<BackgroundSnapshot>,
    next_seq: AtomicU64,
}

impl BackgroundStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from configuration.
    pub fn from_config(config: &BackgroundsConfig) -> Self {
        let store = Self::new();
        store.replace_from_config(config);
        store
    }

    /// Replace every record with the contents of `config` in one swap.
    ///
    /// Rules receive fresh ids.
    pub fn replace_from_config(&self, config: &BackgroundsConfig) {
        let mut next = BackgroundSnapshot {
            stored: config.routes.iter().cloned().map(|rule| self.stored(rule)).collect(),
            site_default: config.site_default.clone(),
            categories: config
                .categories
                .iter()
                .map(|c| (c.slug.clone(), c.background()))
                .collect(),
            products: config
                .products
                .iter()
                .map(|p| {
                    let product = ProductBackground {
                        category: p.category.clone(),
                        background: p.background(),
                    };
                    (p.slug.clone(), product)
                })
                .collect(),
            ..BackgroundSnapshot::default()
        };
        next.reindex();
        self.records.store(Arc::new(next));

        tracing::info!(
            routes = config.routes.len(),
            categories = config.categories.len(),
            products = config.products.len(),
            site_default = config.site_default.is_some(),
            "Background records loaded"
        );
    }

    /// The current generation of every record.
    pub fn snapshot(&self) -> Arc<BackgroundSnapshot> {
        self.records.load_full()
    }

    /// Resolve `path` for an optional catalog entity.
    ///
    /// Unknown entities are treated as absent.
    pub fn resolve(&self, path: &str, entity: Option<&EntityRef>) -> (ResolvedBackground, Tier) {
        self.records.load().resolve(path, entity)
    }

    /// Look up an entity in the current generation.
    pub fn entity_for(&self, entity: &EntityRef) -> Option<EntityBackground> {
        self.records.load().entity_for(entity)
    }

    // Route rules

    /// All rules, inactive included, priority descending.
    pub fn list_rules(&self) -> Vec<StoredRule> {
        let mut rules = self.records.load().stored.clone();
        rules.sort_by(|a, b| b.rule.priority.cmp(&a.rule.priority).then(a.seq.cmp(&b.seq)));
        rules
    }

    pub fn get_rule(&self, id: Uuid) -> Result<StoredRule, StoreError> {
        self.records
            .load()
            .stored
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::RuleNotFound(id))
    }

    pub fn insert_rule(&self, rule: RouteBackgroundRule) -> StoredRule {
        let stored = self.stored(rule);
        self.write(|next| next.stored.push(stored.clone()));
        tracing::info!(id = %stored.id, pattern = %stored.rule.path_pattern, "Route rule created");
        stored
    }

    /// Replace a rule's contents, keeping its id and position among equals.
    pub fn update_rule(&self, id: Uuid, rule: RouteBackgroundRule) -> Result<StoredRule, StoreError> {
        let updated = self.try_write(|next| {
            let stored = next
                .stored
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or(StoreError::RuleNotFound(id))?;
            stored.rule = rule.clone();
            Ok(stored.clone())
        })?;
        tracing::info!(id = %id, pattern = %updated.rule.path_pattern, "Route rule updated");
        Ok(updated)
    }

    pub fn delete_rule(&self, id: Uuid) -> Result<StoredRule, StoreError> {
        let removed = self.try_write(|next| {
            let index = next
                .stored
                .iter()
                .position(|s| s.id == id)
                .ok_or(StoreError::RuleNotFound(id))?;
            Ok(next.stored.remove(index))
        })?;
        tracing::info!(id = %id, pattern = %removed.rule.path_pattern, "Route rule deleted");
        Ok(removed)
    }

    // Site default

    pub fn site_default(&self) -> Option<SiteDefaultBackground> {
        self.records.load().site_default.clone()
    }

    pub fn set_site_default(&self, background: SiteDefaultBackground) {
        self.write(|next| next.site_default = Some(background.clone()));
        tracing::info!("Site default background updated");
    }

    pub fn clear_site_default(&self) -> Result<SiteDefaultBackground, StoreError> {
        let removed = self.try_write(|next| next.site_default.take().ok_or(StoreError::SiteDefaultNotSet))?;
        tracing::info!("Site default background cleared");
        Ok(removed)
    }

    // Catalog entities

    pub fn list_categories(&self) -> Vec<(String, BackgroundFields)> {
        let mut categories: Vec<_> = self
            .records
            .load()
            .categories
            .iter()
            .map(|(slug, background)| (slug.clone(), background.clone()))
            .collect();
        categories.sort_by(|a, b| a.0.cmp(&b.0));
        categories
    }

    pub fn put_category(&self, slug: &str, background: BackgroundFields) {
        self.write(|next| {
            next.categories.insert(slug.to_string(), background.clone());
        });
        tracing::info!(slug = %slug, "Category background saved");
    }

    /// Remove a category. Fails while any product still names it as parent.
    pub fn delete_category(&self, slug: &str) -> Result<BackgroundFields, StoreError> {
        let removed = self.try_write(|next| {
            let products = next.products_in(slug);
            if !products.is_empty() {
                return Err(StoreError::CategoryInUse {
                    slug: slug.to_string(),
                    products,
                });
            }
            next.categories
                .remove(slug)
                .ok_or_else(|| StoreError::CategoryNotFound(slug.to_string()))
        })?;
        tracing::info!(slug = %slug, "Category background deleted");
        Ok(removed)
    }

    pub fn list_products(&self) -> Vec<(String, ProductBackground)> {
        let mut products: Vec<_> = self
            .records
            .load()
            .products
            .iter()
            .map(|(slug, product)| (slug.clone(), product.clone()))
            .collect();
        products.sort_by(|a, b| a.0.cmp(&b.0));
        products
    }

    /// Save a product. Its parent category, if named, must exist in the same
    /// generation the product is written into.
    pub fn put_product(&self, slug: &str, product: ProductBackground) -> Result<(), StoreError> {
        self.try_write(|next| {
            if let Some(category) = &product.category {
                if !next.categories.contains_key(category) {
                    return Err(StoreError::CategoryNotFound(category.clone()));
                }
            }
            next.products.insert(slug.to_string(), product.clone());
            Ok(())
        })?;
        tracing::info!(slug = %slug, "Product background saved");
        Ok(())
    }

    pub fn delete_product(&self, slug: &str) -> Result<ProductBackground, StoreError> {
        let removed = self.try_write(|next| {
            next.products
                .remove(slug)
                .ok_or_else(|| StoreError::ProductNotFound(slug.to_string()))
        })?;
        tracing::info!(slug = %slug, "Product background deleted");
        Ok(removed)
    }

    fn stored(&self, rule: RouteBackgroundRule) -> StoredRule {
        StoredRule {
            id: Uuid::new_v4(),
            rule,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Publish a new generation built by `apply`.
    fn write(&self, mut apply: impl FnMut(&mut BackgroundSnapshot)) {
        self.records.rcu(|current| {
            let mut next = BackgroundSnapshot::clone(current);
            apply(&mut next);
            next.reindex();
            next
        });
    }

    /// Like [`write`](Self::write), but `apply` may refuse the change. A
    /// refused change publishes nothing.
    fn try_write<R>(
        &self,
        mut apply: impl FnMut(&mut BackgroundSnapshot) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        loop {
            let current = self.records.load_full();
            let mut next = BackgroundSnapshot::clone(&current);
            let outcome = apply(&mut next)?;
            next.reindex();
            let previous = self.records.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&*previous, &current) {
                return Ok(outcome);
            }
        }
    }
}
