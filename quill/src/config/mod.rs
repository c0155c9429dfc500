//! Language feature configuration
//!
//! Semantic changes are gated behind named features so the backend can
//! compile older sources with their original semantics. The backend core
//! never reads a global: the embedder constructs [`LanguageSettings`] and
//! hands it to the per-unit codegen context.

use std::collections::HashSet;

/// Feature-flag-gated semantic changes known to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFeature {
    /// Stricter IEEE-754 floating comparisons: equality and ordering on
    /// smart-cast-refined `Float`/`Double` operands use the exact refined
    /// type pair instead of the declared types.
    ProperIeee754Comparisons,
    /// Inline value-wrapper classes
    InlineClasses,
}

/// The set of features enabled for one compilation
#[derive(Debug, Clone)]
pub struct LanguageSettings {
    enabled: HashSet<LanguageFeature>,
}

impl LanguageSettings {
    pub fn new(features: impl IntoIterator<Item = LanguageFeature>) -> Self {
        Self {
            enabled: features.into_iter().collect(),
        }
    }

    /// Settings with no gated features enabled (oldest language version)
    pub fn none() -> Self {
        Self::new([])
    }

    pub fn supports(&self, feature: LanguageFeature) -> bool {
        self.enabled.contains(&feature)
    }
}

impl Default for LanguageSettings {
    /// Current language version: all stable features enabled
    fn default() -> Self {
        Self::new([
            LanguageFeature::ProperIeee754Comparisons,
            LanguageFeature::InlineClasses,
        ])
    }
}
