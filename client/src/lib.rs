mod api_client;
mod commands;

pub use crate::api_client::{DocsClient, DocsClientArgs, DocsClientError, RetrySettings};
pub use crate::commands::*;
