//! Provider data structure passed to resources and data sources

use crate::api::Client;
use crate::version::ProductVersion;
use std::any::Any;
use std::sync::Arc;

#[derive(Clone)]
pub struct PingDirectoryProviderData {
    pub client: Client,
    pub product_version: ProductVersion,
}

impl PingDirectoryProviderData {
    pub fn new(client: Client, product_version: ProductVersion) -> Self {
        Self {
            client,
            product_version,
        }
    }

    /// Recover the provider data handed out at configure time
    pub fn from_any(data: Option<Arc<dyn Any + Send + Sync>>) -> Option<Self> {
        data.and_then(|d| d.downcast_ref::<PingDirectoryProviderData>().cloned())
    }
}
