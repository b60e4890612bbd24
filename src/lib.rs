//! Requirements intake: an interview loop against a hosted language model
//! whose transcript is reduced to a validated [`requirements::ProjectRequirements`].

pub mod config;
pub mod console;
pub mod driver;
pub mod extractor;
pub mod intake;
pub mod model;
pub mod output;
pub mod prompts;
pub mod requirements;
pub mod transcript;
