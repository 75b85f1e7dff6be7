//! Story generation: prompt, model call, parse, persist.

use crate::{parse_story_response, StoryPrompt};
use branchtale_core::{Story, TreeLimits, TreeSummary, ValidatedStory};
use branchtale_error::{BranchtaleResult, ProviderError, ProviderErrorKind};
use branchtale_interface::{StoryDriver, StoryRepository};
use std::sync::Arc;
use tracing::instrument;

/// Generates a story for a theme and stores it.
///
/// The pipeline is strictly sequential: one model call, one parse, one
/// transactional save. Nothing is retried.
pub struct StoryGenerator<D, R> {
    driver: Arc<D>,
    repository: Arc<R>,
    prompt: StoryPrompt,
    limits: TreeLimits,
}

impl<D, R> StoryGenerator<D, R>
where
    D: StoryDriver,
    R: StoryRepository,
{
    /// Create a generator with the default prompt and tree limits.
    pub fn new(driver: Arc<D>, repository: Arc<R>) -> Self {
        Self {
            driver,
            repository,
            prompt: StoryPrompt::default(),
            limits: TreeLimits::default(),
        }
    }

    /// Use a custom prompt configuration.
    pub fn with_prompt(mut self, prompt: StoryPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    /// Use custom structural limits.
    pub fn with_limits(mut self, limits: TreeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The driver used for model calls.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The repository stories are saved to.
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Ask the model for a story and validate it, without persisting anything.
    ///
    /// # Errors
    ///
    /// Returns the provider error, or a validation error if the output does
    /// not describe a well-formed tree.
    #[instrument(skip(self), fields(provider = self.driver.provider_name(), model = self.driver.model_name()))]
    pub async fn draft(&self, theme: &str) -> BranchtaleResult<ValidatedStory> {
        let request = self.prompt.render(theme)?;
        let response = self.driver.generate(&request).await?;
        let raw = response
            .text()
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))?;

        tracing::debug!(response_len = raw.len(), "Received model output");
        Ok(parse_story_response(&raw, &self.limits)?)
    }

    /// Generate a story for `theme` and persist it with its full tree.
    ///
    /// On error nothing from this call is left in the repository.
    #[instrument(skip(self), fields(session_id = %session_id, theme = %theme))]
    pub async fn generate(
        &self,
        session_id: &str,
        theme: &str,
    ) -> BranchtaleResult<(Story, TreeSummary)> {
        let validated = self.draft(theme).await?;
        let (story, summary) = self
            .repository
            .save_story_tree(session_id, &validated)
            .await?;

        tracing::info!(
            story_id = story.id,
            title = %story.title,
            nodes = summary.node_count(),
            endings = summary.ending_count(),
            "Story generated"
        );
        Ok((story, summary))
    }
}
