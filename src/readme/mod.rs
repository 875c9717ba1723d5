//! README retrieval: the source-host client and the naming-convention resolver

pub mod github;
pub mod resolver;

pub use github::{GitHubClient, ReadmeSource};
pub use resolver::{ReadmeResolver, ResolveError, ResolvedReadme};
