//! The two content collections and their card markup.

use crate::domain::model::{Project, SkillGroup};
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Whether string fields from the content document are escaped before they
/// are placed into markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escape {
    #[default]
    Html,
    /// Insert fields verbatim. Only for content bundled with the site.
    Trusted,
}

impl Escape {
    pub fn apply<'a>(self, value: &'a str) -> Cow<'a, str> {
        match self {
            Escape::Trusted => Cow::Borrowed(value),
            Escape::Html => html_escape(value),
        }
    }
}

pub fn html_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;"),
    )
}

pub trait Collection: Send + Sync + 'static {
    type Entry: DeserializeOwned + Send + Sync;

    /// Key in the content document, also used in log lines.
    const KEY: &'static str;
    const CONTAINER_ID: &'static str;
    /// Markup mounted when the collection cannot be loaded.
    const FALLBACK: &'static str;

    fn render_entry(entry: &Self::Entry, escape: Escape) -> String;

    fn render_all(entries: &[Self::Entry], escape: Escape) -> String {
        entries
            .iter()
            .map(|entry| Self::render_entry(entry, escape))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projects;

#[derive(Debug, Clone, Copy)]
pub struct Skills;

impl Collection for Projects {
    type Entry = Project;

    const KEY: &'static str = "projects";
    const CONTAINER_ID: &'static str = "projects-container";
    const FALLBACK: &'static str = r#"<p class="text-center text-gray-600 col-span-full">Failed to load projects. Please try again later.</p>"#;

    fn render_entry(project: &Project, escape: Escape) -> String {
        let technologies: String = project
            .technologies
            .iter()
            .map(|tech| {
                format!(
                    r#"
                        <span class="px-3 py-1 bg-gray-100 text-gray-700 text-xs rounded-full">{}</span>"#,
                    escape.apply(tech)
                )
            })
            .collect();

        let mut links = String::new();
        if let Some(github) = project.github_link() {
            links.push_str(&format!(
                r#"
                        <a href="{}" target="_blank" rel="noopener" class="flex items-center gap-2 text-sm text-gray-600 hover:text-primary transition duration-300">
                            <i data-lucide="github" class="w-4 h-4"></i>
                            Code
                        </a>"#,
                escape.apply(github)
            ));
        }
        if let Some(demo) = project.demo_link() {
            links.push_str(&format!(
                r#"
                        <a href="{}" target="_blank" rel="noopener" class="flex items-center gap-2 text-sm text-gray-600 hover:text-primary transition duration-300">
                            <i data-lucide="external-link" class="w-4 h-4"></i>
                            Demo
                        </a>"#,
                escape.apply(demo)
            ));
        }
        if project.is_private() {
            links.push_str(
                r#"
                        <span class="flex items-center gap-2 text-sm text-gray-400">
                            <i data-lucide="lock" class="w-4 h-4"></i>
                            Private Project
                        </span>"#,
            );
        }

        format!(
            r#"
            <div class="project-card bg-white rounded-lg shadow-lg overflow-hidden">
                <div class="p-6">
                    <div class="flex items-center justify-between mb-4">
                        <div class="w-12 h-12 bg-primary/10 rounded-lg flex items-center justify-center">
                            <i data-lucide="{icon}" class="w-6 h-6 text-primary"></i>
                        </div>
                        <span class="text-xs font-semibold text-gray-500 uppercase tracking-wide">{category}</span>
                    </div>

                    <h3 class="text-xl font-bold text-gray-900 mb-3">{title}</h3>
                    <p class="text-gray-600 mb-4 leading-relaxed">{description}</p>

                    <div class="flex flex-wrap gap-2 mb-4">{technologies}
                    </div>

                    <div class="flex gap-3 pt-4 border-t border-gray-100">{links}
                    </div>
                </div>
            </div>"#,
            icon = escape.apply(&project.icon),
            category = escape.apply(&project.category),
            title = escape.apply(&project.title),
            description = escape.apply(&project.description),
            technologies = technologies,
            links = links,
        )
    }
}

impl Collection for Skills {
    type Entry = SkillGroup;

    const KEY: &'static str = "skills";
    const CONTAINER_ID: &'static str = "skills-container";
    const FALLBACK: &'static str =
        r#"<p class="text-center text-gray-600">Failed to load skills. Please try again later.</p>"#;

    fn render_entry(group: &SkillGroup, escape: Escape) -> String {
        let badges: String = group
            .items
            .iter()
            .map(|skill| {
                format!(
                    r#"
                    <span class="skill-badge px-4 py-2 bg-gray-100 text-gray-700 rounded-lg font-medium">{}</span>"#,
                    escape.apply(skill)
                )
            })
            .collect();

        format!(
            r#"
            <div class="mb-8">
                <div class="flex items-center gap-3 mb-4">
                    <div class="w-10 h-10 bg-primary/10 rounded-lg flex items-center justify-center">
                        <i data-lucide="{icon}" class="w-5 h-5 text-primary"></i>
                    </div>
                    <h3 class="text-xl font-semibold text-gray-900">{category}</h3>
                </div>

                <div class="flex flex-wrap gap-3">{badges}
                </div>
            </div>"#,
            icon = escape.apply(&group.icon),
            category = escape.apply(&group.category),
            badges = badges,
        )
    }
}
