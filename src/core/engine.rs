use crate::core::{LoadOutcome, Pipeline};
use crate::domain::model::{LoadState, RenderReport};
use crate::utils::error::{PageError, Result};

/// Tracks one collection through `Idle -> Loading -> {Rendered | Failed}`.
#[derive(Debug, Clone)]
pub struct LoadTracker {
    collection: &'static str,
    state: LoadState,
}

impl LoadTracker {
    pub fn new(collection: &'static str) -> Self {
        Self {
            collection,
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn advance(&mut self, next: LoadState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(PageError::StateTransitionError {
                collection: self.collection.to_string(),
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("{}: {:?} -> {:?}", self.collection, self.state, next);
        self.state = next;
        Ok(())
    }
}

/// One page load: runs both collection pipelines concurrently. Each
/// pipeline fails on its own; a render can happen once per engine.
pub struct RenderEngine<P: Pipeline, K: Pipeline> {
    projects: P,
    skills: K,
    projects_state: LoadTracker,
    skills_state: LoadTracker,
}

impl<P: Pipeline, K: Pipeline> RenderEngine<P, K> {
    pub fn new(projects: P, skills: K) -> Self {
        let projects_state = LoadTracker::new(projects.collection());
        let skills_state = LoadTracker::new(skills.collection());
        Self {
            projects,
            skills,
            projects_state,
            skills_state,
        }
    }

    pub async fn render(&mut self) -> Result<RenderReport> {
        self.projects_state.advance(LoadState::Loading)?;
        self.skills_state.advance(LoadState::Loading)?;

        let (projects, skills) = tokio::join!(
            run_pipeline(&self.projects),
            run_pipeline(&self.skills)
        );

        let projects = settle(&mut self.projects_state, projects)?;
        let skills = settle(&mut self.skills_state, skills)?;

        Ok(RenderReport { projects, skills })
    }
}

fn settle(tracker: &mut LoadTracker, outcome: Result<LoadOutcome>) -> Result<LoadOutcome> {
    match outcome {
        Ok(outcome) => {
            tracker.advance(outcome.final_state())?;
            Ok(outcome)
        }
        Err(e) => {
            tracker.advance(LoadState::Failed)?;
            Err(e)
        }
    }
}

/// Runs extract/transform/load, turning retrieval and parse errors into the
/// collection's fallback.
pub async fn run_pipeline<P: Pipeline>(pipeline: &P) -> Result<LoadOutcome> {
    let name = pipeline.collection();
    tracing::debug!("Loading {}...", name);

    let result: Result<LoadOutcome> = async {
        let entries = pipeline.extract().await?;
        tracing::debug!("Extracted {} {} entries", entries.len(), name);
        let rendered = pipeline.transform(entries).await?;
        pipeline.load(rendered).await
    }
    .await;

    match result {
        Ok(outcome) => Ok(outcome),
        Err(e) if e.is_soft_failure() => {
            tracing::error!("Error loading {}: {}", name, e);
            Ok(pipeline.fallback(&e).await)
        }
        Err(e) => Err(e),
    }
}
