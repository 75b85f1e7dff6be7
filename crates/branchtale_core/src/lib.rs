//! Core data types for Branchtale.
//!
//! This crate provides the data model shared by every other crate: persisted
//! stories, nodes and jobs, the nested structure the language model is asked to
//! emit, the assembled read views, the provider-neutral request types, and the
//! depth-first tree builder that turns a validated story into stored nodes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod job;
mod llm;
mod request;
mod response;
mod story;
mod tree;

pub use builder::{build_tree, NodeSink};
pub use job::{JobStatus, StoryJob, StoryJobBuilder, StoryJobBuilderError};
pub use llm::{StoryLlmResponse, StoryNodeLlm, StoryOptionLlm};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse,
    Message, Output, Role,
};
pub use response::{CompleteStoryNodeResponse, CompleteStoryResponse, StoryJobResponse};
pub use story::{NewStoryNode, Story, StoryNode, StoryOption, MAX_OPTIONS_PER_NODE};
pub use tree::{TreeLimits, TreeSummary, ValidatedStory};
