use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub category: String,
    pub icon: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub demo: Option<String>,
}

impl Project {
    /// Empty strings count as absent links.
    pub fn github_link(&self) -> Option<&str> {
        self.github.as_deref().filter(|s| !s.is_empty())
    }

    pub fn demo_link(&self) -> Option<&str> {
        self.demo.as_deref().filter(|s| !s.is_empty())
    }

    pub fn is_private(&self) -> bool {
        self.github_link().is_none() && self.demo_link().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub icon: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Full shape of `data.json`. Loaders read their own key out of the raw
/// JSON so one malformed collection does not fail the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub projects: Vec<Project>,
    pub skills: Vec<SkillGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Rendered,
    Failed,
}

impl LoadState {
    pub fn can_transition_to(self, next: LoadState) -> bool {
        matches!(
            (self, next),
            (LoadState::Idle, LoadState::Loading)
                | (LoadState::Loading, LoadState::Rendered)
                | (LoadState::Loading, LoadState::Failed)
        )
    }
}

#[derive(Debug, Clone)]
pub struct RenderedCollection {
    pub markup: String,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Mounted { entries: usize },
    NoContainer,
    Failed { reason: String },
}

impl LoadOutcome {
    pub fn final_state(&self) -> LoadState {
        match self {
            LoadOutcome::Failed { .. } => LoadState::Failed,
            _ => LoadState::Rendered,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderReport {
    pub projects: LoadOutcome,
    pub skills: LoadOutcome,
}

impl RenderReport {
    pub fn has_failures(&self) -> bool {
        matches!(self.projects, LoadOutcome::Failed { .. })
            || matches!(self.skills, LoadOutcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_link_presence() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "title": "X",
            "description": "d",
            "category": "c",
            "icon": "star",
            "technologies": ["Go"],
            "github": "https://x",
            "demo": ""
        }))
        .unwrap();

        assert_eq!(project.github_link(), Some("https://x"));
        assert_eq!(project.demo_link(), None);
        assert!(!project.is_private());
    }

    #[test]
    fn test_project_without_links_is_private() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "title": "Internal",
            "description": "d",
            "category": "c",
            "icon": "lock",
            "technologies": []
        }))
        .unwrap();

        assert!(project.is_private());
    }

    #[test]
    fn test_load_state_transitions() {
        assert!(LoadState::Idle.can_transition_to(LoadState::Loading));
        assert!(LoadState::Loading.can_transition_to(LoadState::Rendered));
        assert!(LoadState::Loading.can_transition_to(LoadState::Failed));
        assert!(!LoadState::Rendered.can_transition_to(LoadState::Loading));
        assert!(!LoadState::Failed.can_transition_to(LoadState::Loading));
        assert!(!LoadState::Idle.can_transition_to(LoadState::Rendered));
    }
}
