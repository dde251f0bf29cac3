//! Cascading presentation style.
//!
//! OmniGraffle styles inherit down the graphics tree: a property set on a
//! group applies to everything inside it unless a child overrides it. This
//! module models that with a stack of [`StyleScope`]s.
//!
//! # Overview
//!
//! - [`StyleScope`] - One level of property overrides
//! - [`StyleCascade`] - The scope stack, with effective-value lookup and
//!   serialization to an SVG `style` declaration
//!
//! # Example
//!
//! ```
//! # use graffle_core::style::StyleCascade;
//! let mut cascade = StyleCascade::new("#fff", "#000000");
//!
//! cascade.push_scope();
//! cascade.set("fill", "none");
//! assert_eq!(cascade.get("fill"), Some("none"));
//! assert_eq!(cascade.to_style_string(), "fill:none;stroke:#000000");
//!
//! cascade.pop_scope();
//! assert_eq!(cascade.get("fill"), Some("#fff"));
//! ```

use std::fmt;

use indexmap::IndexMap;
use log::warn;

/// A single level of style properties, in first-set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleScope {
    properties: IndexMap<String, String>,
}

impl StyleScope {
    /// Creates an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing any previous value in this scope.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Returns the value set in this scope, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// Returns `true` if no property is set in this scope.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterates over the properties in first-set order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// A stack of [`StyleScope`]s with a base scope that is never popped.
///
/// The base scope defines `fill` and `stroke`. Lookups walk from the
/// innermost scope outward, so an inner scope shadows outer ones until it is
/// popped.
#[derive(Debug, Clone)]
pub struct StyleCascade {
    scopes: Vec<StyleScope>,
}

impl StyleCascade {
    /// Creates a cascade whose base scope holds the given fill and stroke.
    pub fn new(fill: &str, stroke: &str) -> Self {
        let mut base = StyleScope::new();
        base.set("fill", fill);
        base.set("stroke", stroke);
        Self { scopes: vec![base] }
    }

    /// Opens a new innermost scope.
    pub fn push_scope(&mut self) {
        self.scopes.push(StyleScope::new());
    }

    /// Closes the innermost scope and returns it.
    ///
    /// The base scope cannot be popped; attempting to do so returns `None`
    /// and leaves the cascade unchanged.
    pub fn pop_scope(&mut self) -> Option<StyleScope> {
        if self.scopes.len() <= 1 {
            warn!("Attempted to pop the base style scope");
            return None;
        }
        self.scopes.pop()
    }

    /// Number of open scopes, including the base scope.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Sets a property in the innermost scope.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.set(name, value);
        }
    }

    /// Returns the effective value of a property: the value from the
    /// innermost scope that sets it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Returns the innermost scope.
    pub fn current(&self) -> &StyleScope {
        // The base scope is always present.
        &self.scopes[self.scopes.len() - 1]
    }

    /// Merges all scopes, outermost first, into one effective scope.
    ///
    /// Properties keep the position where they were first set; values come
    /// from the innermost scope that sets them.
    pub fn effective(&self) -> StyleScope {
        let mut merged = StyleScope::new();
        for scope in &self.scopes {
            for (name, value) in scope.iter() {
                merged.set(name, value);
            }
        }
        merged
    }

    /// Serializes the effective scope as an SVG style declaration,
    /// e.g. `fill:#fff;stroke:#000000`.
    pub fn to_style_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StyleCascade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, value)) in self.effective().iter().enumerate() {
            if index > 0 {
                write!(f, ";")?;
            }
            write!(f, "{name}:{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_base_scope() {
        let cascade = StyleCascade::new("#fff", "#000000");
        assert_eq!(cascade.depth(), 1);
        assert_eq!(cascade.get("fill"), Some("#fff"));
        assert_eq!(cascade.get("stroke"), Some("#000000"));
        assert_eq!(cascade.get("filter"), None);
    }

    #[test]
    fn test_cascade_pop_restores_previous_value() {
        let mut cascade = StyleCascade::new("#fff", "#000000");
        cascade.push_scope();
        cascade.set("fill", "#ff0000");

        cascade.push_scope();
        cascade.set("fill", "none");
        assert_eq!(cascade.get("fill"), Some("none"));

        cascade.pop_scope();
        assert_eq!(cascade.get("fill"), Some("#ff0000"));

        cascade.pop_scope();
        assert_eq!(cascade.get("fill"), Some("#fff"));
    }

    #[test]
    fn test_cascade_properties_do_not_leak_to_siblings() {
        let mut cascade = StyleCascade::new("#fff", "#000000");

        cascade.push_scope();
        cascade.set("stroke-dasharray", "3 3");
        cascade.pop_scope();

        cascade.push_scope();
        assert_eq!(cascade.get("stroke-dasharray"), None);
        cascade.pop_scope();
    }

    #[test]
    fn test_cascade_cannot_pop_base() {
        let mut cascade = StyleCascade::new("#fff", "#000000");
        assert!(cascade.pop_scope().is_none());
        assert_eq!(cascade.depth(), 1);
        assert_eq!(cascade.get("fill"), Some("#fff"));
    }

    #[test]
    fn test_cascade_to_style_string_merges_in_first_set_order() {
        let mut cascade = StyleCascade::new("#fff", "#000000");
        cascade.push_scope();
        cascade.set("stroke-width", "2.000000px");
        cascade.push_scope();
        cascade.set("fill", "none");

        assert_eq!(
            cascade.to_style_string(),
            "fill:none;stroke:#000000;stroke-width:2.000000px"
        );
    }

    #[test]
    fn test_cascade_current_is_innermost() {
        let mut cascade = StyleCascade::new("#fff", "#000000");
        assert_eq!(cascade.current().get("fill"), Some("#fff"));

        cascade.push_scope();
        assert!(cascade.current().is_empty());
        cascade.set("filter", "url(#DropShadow)");
        assert_eq!(cascade.current().get("filter"), Some("url(#DropShadow)"));
    }

    #[test]
    fn test_scope_set_replaces_value() {
        let mut scope = StyleScope::new();
        scope.set("fill", "red");
        scope.set("fill", "blue");
        assert_eq!(scope.get("fill"), Some("blue"));
        assert_eq!(scope.iter().count(), 1);
    }
}
