//! Shared fixtures for narrative tests.

#![allow(dead_code)]

use async_trait::async_trait;
use branchtale_core::{GenerateRequest, GenerateResponse};
use branchtale_error::{BranchtaleResult, ProviderError, ProviderErrorKind};
use branchtale_interface::StoryDriver;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Driver that replays canned responses in order.
#[derive(Default)]
pub struct ScriptedDriver {
    responses: Mutex<VecDeque<Result<String, ProviderErrorKind>>>,
    requests: Mutex<Vec<GenerateRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful text response.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(text.into()));
        self
    }

    /// Queue a provider failure.
    pub fn fail(self, kind: ProviderErrorKind) -> Self {
        self.responses.lock().unwrap().push_back(Err(kind));
        self
    }

    /// Hold every call until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> BranchtaleResult<GenerateResponse> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.requests.lock().unwrap().push(req.clone());
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(GenerateResponse::from_text(text)),
            Some(Err(kind)) => Err(ProviderError::new(kind).into()),
            None => Err(ProviderError::new(ProviderErrorKind::Http("script exhausted".into())).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// A nine-node story: three choices at the root, two of which branch again.
pub const HAUNTED_LIGHTHOUSE: &str = r#"Here is your story!

```json
{
  "title": "The Haunted Lighthouse",
  "rootNode": {
    "content": "A storm drives you to the abandoned lighthouse. The door creaks open on its own.",
    "isEnding": false,
    "isWinningEnding": false,
    "options": [
      {
        "text": "Climb the spiral stairs",
        "nextNode": {
          "content": "Halfway up, a pale keeper blocks the way.",
          "isEnding": false,
          "isWinningEnding": false,
          "options": [
            {"text": "Ask what it needs", "nextNode": {"content": "It asks you to light the lamp once more, then fades in peace.", "isEnding": true, "isWinningEnding": true, "options": []}},
            {"text": "Push past it", "nextNode": {"content": "Your hand passes through it and you tumble down the stairs.", "isEnding": true, "isWinningEnding": false, "options": []}}
          ]
        }
      },
      {
        "text": "Search the keeper's cottage",
        "nextNode": {"content": "You find a logbook and fall asleep reading. The storm passes.", "isEnding": true, "isWinningEnding": false, "options": []}
      },
      {
        "text": "Go down to the cellar",
        "nextNode": {
          "content": "The cellar floods with seawater and whispers.",
          "isEnding": false,
          "isWinningEnding": false,
          "options": [
            {"text": "Follow the whispers", "nextNode": {"content": "A hidden tunnel leads you safely to the village.", "isEnding": true, "isWinningEnding": true, "options": []}},
            {"text": "Climb back up", "nextNode": {"content": "The hatch slams shut above you.", "isEnding": true, "isWinningEnding": false, "options": []}},
            {"text": "Wait for the tide", "nextNode": {"content": "The water keeps rising.", "isEnding": true, "isWinningEnding": false, "options": []}}
          ]
        }
      }
    ]
  }
}
```
"#;

/// Nodes in [`HAUNTED_LIGHTHOUSE`].
pub const HAUNTED_LIGHTHOUSE_NODES: usize = 9;

/// A single-ending story with `title`.
pub fn one_node_story(title: &str) -> String {
    format!(
        r#"{{"title": "{}", "rootNode": {{"content": "It was all a dream.", "isEnding": true, "isWinningEnding": false}}}}"#,
        title
    )
}

/// Well-formed JSON that breaks the tree rules: a non-ending option has no child.
pub const MISSING_NEXT_NODE: &str = r#"{
  "title": "Broken Bridge",
  "rootNode": {
    "content": "A rope bridge sways over the gorge.",
    "isEnding": false,
    "isWinningEnding": false,
    "options": [{"text": "Cross it"}]
  }
}"#;
