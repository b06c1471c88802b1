use std::sync::Arc;

use tracing::{debug, error, info};

use crate::api::{FetchError, HttpRequest, Transport};
use crate::config::ServiceConfig;
use crate::models::Post;
use crate::observable::StateHandle;
use crate::status::FetchStatus;

use super::state::ServiceState;

/// Owns the post list and keeps it in sync with the posts endpoint.
pub struct PostService {
    transport: Arc<dyn Transport>,
    url: String,
    state: ServiceState<Vec<Post>>,
}

impl PostService {
    pub fn new(transport: Arc<dyn Transport>, config: &ServiceConfig) -> Self {
        Self {
            transport,
            url: config.posts_url.clone(),
            state: ServiceState::new(Vec::new()),
        }
    }

    /// Shared handle to the post list. Readers see every later refresh.
    pub fn posts(&self) -> StateHandle<Vec<Post>> {
        self.state.value()
    }

    pub fn status(&self) -> StateHandle<FetchStatus> {
        self.state.status()
    }

    /// Look up a post already in the list.
    pub fn post(&self, id: i64) -> Option<Post> {
        self.state.value().borrow().iter().find(|p| p.id == id).cloned()
    }

    /// Fetch the full list and replace the current one.
    ///
    /// On failure the list is left untouched and the error is logged once
    /// before being returned. Returns the number of posts received.
    pub async fn refresh(&self) -> Result<usize, FetchError> {
        let ticket = self.state.begin();

        match self.fetch_all().await {
            Ok(posts) => {
                let count = posts.len();
                if self.state.succeed(ticket, posts) {
                    info!(count = count, "Post list updated");
                } else {
                    debug!(ticket = ticket, "Discarding stale post list response");
                }
                Ok(count)
            }
            Err(e) => {
                error!(url = %self.url, error = %e, "Error fetching posts");
                self.state.fail(ticket, &e);
                Err(e)
            }
        }
    }

    async fn fetch_all(&self) -> Result<Vec<Post>, FetchError> {
        let response = self.transport.send(HttpRequest::get(&self.url)).await?;
        response.json()
    }
}
