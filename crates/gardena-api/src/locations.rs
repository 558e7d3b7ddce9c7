// Location endpoints

use tracing::debug;

use crate::client::GardenaClient;
use crate::error::Error;
use crate::models::{Location, LocationList};

impl GardenaClient {
    /// List the locations visible to the account.
    ///
    /// `GET locations?user_id={id}`, the user id taken from the current
    /// token when the token endpoint reported one.
    pub async fn list_locations(&self) -> Result<Vec<Location>, Error> {
        let url = self.endpoint("locations")?;
        let user_id = self.token().await?.user_id().map(str::to_owned);
        debug!(?user_id, "listing locations");

        let query: Vec<(&str, &str)> = user_id
            .as_deref()
            .map(|id| vec![("user_id", id)])
            .unwrap_or_default();

        let list: LocationList = self.get(url, &query).await?;
        Ok(list.locations)
    }
}
