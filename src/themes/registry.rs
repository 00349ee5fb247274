use std::collections::HashMap;

use crate::themes::{CardTheme, ClassicTheme, PaperTheme, Theme};

/// Registry for managing available layouts
///
/// The registry provides a central place to discover and instantiate themes.
/// Themes are registered by name and can be retrieved for use by the engine.
pub struct ThemeRegistry {
    themes: HashMap<String, Box<dyn Fn() -> Box<dyn Theme>>>,
}

impl ThemeRegistry {
    /// Create a new theme registry with all built-in themes
    pub fn new() -> Self {
        let mut registry = Self {
            themes: HashMap::new(),
        };

        registry.register_builtin_themes();
        registry
    }

    fn register_builtin_themes(&mut self) {
        self.register("classic".to_string(), || Box::new(ClassicTheme::new()));
        self.register("card".to_string(), || Box::new(CardTheme::new()));
        self.register("paper".to_string(), || Box::new(PaperTheme::new()));
    }

    /// Register a custom theme
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name for the theme
    /// * `factory` - Function that creates new instances of the theme
    pub fn register<F>(&mut self, name: String, factory: F)
    where
        F: Fn() -> Box<dyn Theme> + 'static,
    {
        self.themes.insert(name, Box::new(factory));
    }

    /// Get a theme by name
    ///
    /// Returns a new instance of the requested theme, or None if the theme
    /// is not registered.
    pub fn get_theme(&self, name: &str) -> Option<Box<dyn Theme>> {
        self.themes.get(name).map(|factory| factory())
    }

    /// Get all available theme names, sorted
    pub fn available_themes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.themes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a theme is available
    pub fn has_theme(&self, name: &str) -> bool {
        self.themes.contains_key(name)
    }

    /// Get the number of registered themes
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
