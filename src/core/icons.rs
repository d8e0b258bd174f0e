use crate::core::collection::html_escape;
use crate::core::document::{Document, Element};
use crate::domain::ports::IconHydrator;
use crate::utils::error::{PageError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const SVG_ATTRS: &str = r#"xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round""#;

const DEFAULT_ICONS: &[(&str, &str)] = &[
    ("code", r#"<polyline points="16 18 22 12 16 6"/><polyline points="8 6 2 12 8 18"/>"#),
    ("database", r#"<ellipse cx="12" cy="5" rx="9" ry="3"/><path d="M3 5V19A9 3 0 0 0 21 19V5"/><path d="M3 12A9 3 0 0 0 21 12"/>"#),
    ("external-link", r#"<path d="M15 3h6v6"/><path d="M10 14 21 3"/><path d="M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6"/>"#),
    ("github", r#"<path d="M15 22v-4a4.8 4.8 0 0 0-1-3.5c3 0 6-2 6-5.5.08-1.25-.27-2.48-1-3.5.28-1.15.28-2.35 0-3.5 0 0-1 0-3 1.5-2.64-.5-5.36-.5-8 0C6 2 5 2 5 2c-.3 1.15-.3 2.35 0 3.5A5.403 5.403 0 0 0 4 9c0 3.5 3 5.5 6 5.5-.39.49-.68 1.05-.85 1.65-.17.6-.22 1.23-.15 1.85v4"/><path d="M9 18c-4.51 2-5-2-7-2"/>"#),
    ("globe", r#"<circle cx="12" cy="12" r="10"/><path d="M12 2a14.5 14.5 0 0 0 0 20 14.5 14.5 0 0 0 0-20"/><path d="M2 12h20"/>"#),
    ("lock", r#"<rect width="18" height="11" x="3" y="11" rx="2" ry="2"/><path d="M7 11V7a5 5 0 0 1 10 0v4"/>"#),
    ("mail", r#"<rect width="20" height="16" x="2" y="4" rx="2"/><path d="m22 7-8.97 5.7a1.94 1.94 0 0 1-2.06 0L2 7"/>"#),
    ("menu", r#"<line x1="4" x2="20" y1="12" y2="12"/><line x1="4" x2="20" y1="6" y2="6"/><line x1="4" x2="20" y1="18" y2="18"/>"#),
    ("star", r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#),
    ("terminal", r#"<polyline points="4 17 10 11 4 5"/><line x1="12" x2="20" y1="19" y2="19"/>"#),
    ("x", r#"<path d="M18 6 6 18"/><path d="m6 6 12 12"/>"#),
];

#[derive(Debug, Deserialize)]
struct IconFile {
    icons: HashMap<String, String>,
}

/// Name to SVG body registry, rendered the way lucide's `createIcons` does:
/// the `<i>` placeholder becomes an inline `<svg>` carrying its attributes.
#[derive(Debug, Clone)]
pub struct IconSet {
    icons: HashMap<String, String>,
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            icons: DEFAULT_ICONS
                .iter()
                .map(|(name, body)| (name.to_string(), body.to_string()))
                .collect(),
        }
    }
}

impl IconSet {
    pub fn empty() -> Self {
        Self {
            icons: HashMap::new(),
        }
    }

    pub fn with_icon(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.icons.insert(name.into(), body.into());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Adds the `[icons]` table of a TOML file on top of the current set.
    pub fn merge_toml_str(mut self, content: &str) -> Result<Self> {
        let file: IconFile = toml::from_str(content).map_err(|e| PageError::ConfigValidationError {
            field: "icons".to_string(),
            message: format!("TOML parsing error: {}", e),
        })?;
        tracing::debug!("Loaded {} icon overrides", file.icons.len());
        self.icons.extend(file.icons);
        Ok(self)
    }

    pub fn merge_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        self.merge_toml_str(&content)
    }

    /// Markup replacing one `<i data-lucide>` placeholder, or `None` when
    /// the element is not a placeholder or names an unknown icon.
    fn render_svg(&self, element: &Element) -> Option<String> {
        if element.tag != "i" {
            return None;
        }
        let name = element.attr("data-lucide")?;
        let Some(body) = self.icons.get(name) else {
            tracing::debug!("No glyph for icon '{}', leaving placeholder", name);
            return None;
        };

        let mut classes = vec!["lucide".to_string(), format!("lucide-{}", name)];
        let mut extra = String::new();
        for (key, value) in &element.attrs {
            match key.as_str() {
                "class" => classes.extend(value.split_whitespace().map(str::to_string)),
                "data-lucide" => {}
                other => extra.push_str(&format!(" {}=\"{}\"", other, html_escape(value))),
            }
        }

        Some(format!(
            r#"<svg {} data-lucide="{}" class="{}"{}>{}</svg>"#,
            SVG_ATTRS,
            html_escape(name),
            html_escape(&classes.join(" ")),
            extra,
            body
        ))
    }
}

impl IconHydrator for IconSet {
    fn hydrate(&self, document: &mut Document) -> usize {
        let replaced = document.replace_elements(|element| self.render_svg(element));
        tracing::debug!("Icon hydration replaced {} placeholders", replaced);
        replaced
    }
}
