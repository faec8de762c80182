// Generic collection endpoints
//
// Every resource collection follows the same REST shape, so one set of
// inherent methods covers them all. Space-scoped collections live at
// `/api/{SpaceId}/{collection}`; server-wide ones (users) at
// `/api/{collection}`.

use serde_json::Value;
use tracing::debug;

use crate::client::{DEFAULT_PAGE_SIZE, OctopusClient};
use crate::error::Error;
use crate::models::ResourceCollection;

/// Relative path of a collection, with or without a space segment.
pub fn collection_path(space_id: Option<&str>, collection: &str) -> String {
    match space_id {
        Some(space) => format!("{space}/{collection}"),
        None => collection.to_owned(),
    }
}

impl OctopusClient {
    /// One page of a collection.
    ///
    /// `GET {collection}?skip=&take=[&partialName=]`
    pub async fn list_page(
        &self,
        collection: &str,
        partial_name: Option<&str>,
        skip: u64,
        take: u64,
    ) -> Result<ResourceCollection<Value>, Error> {
        let mut params = vec![("skip", skip.to_string()), ("take", take.to_string())];
        if let Some(name) = partial_name {
            params.push(("partialName", name.to_owned()));
        }
        self.get_with_params(collection, &params).await
    }

    /// Every item of a collection, walking all pages.
    pub async fn list_all(
        &self,
        collection: &str,
        partial_name: Option<&str>,
    ) -> Result<Vec<Value>, Error> {
        debug!(collection, ?partial_name, "listing collection");
        self.paginate_all(DEFAULT_PAGE_SIZE, |skip, take| {
            self.list_page(collection, partial_name, skip, take)
        })
        .await
    }

    /// `POST {collection}`, returns the stored resource with its new id.
    pub async fn create_item(&self, collection: &str, body: &Value) -> Result<Value, Error> {
        debug!(collection, "creating item");
        self.post(collection, body).await
    }

    /// `PUT {collection}/{id}`, returns the stored resource.
    pub async fn update_item(
        &self,
        collection: &str,
        id: &str,
        body: &Value,
    ) -> Result<Value, Error> {
        debug!(collection, id, "updating item");
        self.put(&format!("{collection}/{id}"), body).await
    }

    /// `DELETE {collection}/{id}`
    pub async fn delete_item(&self, collection: &str, id: &str) -> Result<(), Error> {
        debug!(collection, id, "deleting item");
        self.delete(&format!("{collection}/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_and_global_paths() {
        assert_eq!(
            collection_path(Some("Spaces-2"), "accounts"),
            "Spaces-2/accounts"
        );
        assert_eq!(collection_path(None, "users"), "users");
    }
}
