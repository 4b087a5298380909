//! Prompt templates for a story turn

pub mod template;

pub use template::StoryPromptTemplate;
