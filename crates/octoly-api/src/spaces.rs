// Space endpoints
//
// Spaces are server-level, so these paths carry no space segment.

use tracing::debug;

use crate::client::{DEFAULT_PAGE_SIZE, OctopusClient};
use crate::error::Error;
use crate::models::{ResourceCollection, SpaceResource};

impl OctopusClient {
    /// One page of spaces, optionally narrowed by a partial name.
    ///
    /// `GET /api/spaces?skip=&take=[&partialName=]`
    pub async fn list_spaces(
        &self,
        partial_name: Option<&str>,
        skip: u64,
        take: u64,
    ) -> Result<ResourceCollection<SpaceResource>, Error> {
        let mut params = vec![("skip", skip.to_string()), ("take", take.to_string())];
        if let Some(name) = partial_name {
            params.push(("partialName", name.to_owned()));
        }
        self.get_with_params("spaces", &params).await
    }

    /// Every space whose name contains `partial_name` (server-side match).
    pub async fn find_spaces(&self, partial_name: &str) -> Result<Vec<SpaceResource>, Error> {
        debug!(partial_name, "searching spaces");
        self.paginate_all(DEFAULT_PAGE_SIZE, |skip, take| {
            self.list_spaces(Some(partial_name), skip, take)
        })
        .await
    }
}
