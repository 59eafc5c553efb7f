//! Storage, both the cluster wide configuration (`/storage`) and per node (`/nodes/{node}/storage`).

use serde::Serialize;

use crate::api::ApiParams;
use crate::{ApiResult, Error, HttpApiClient, Parameters};

/// `GET /nodes/{node}/storage`
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeStorageFilter {
    /// Only list stores which support this content type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Only list stores which are enabled (not disabled in config).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Include information about formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<bool>,

    /// Only list status for the specified storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    /// If target is different to the node, only list shared storages accessible from both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

api_params!(NodeStorageFilter);

handle!(
    /// `/nodes/{node}/storage`
    NodeStorageList
);

impl<'c, C> NodeStorageList<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /nodes/{node}/storage`: status of the storages available on the node.
    pub fn index(&self, params: NodeStorageFilter) -> Result<ApiResult, Error> {
        self.resource.get(&params.to_parameters()?)
    }

    pub fn storage(&self, storage: &str) -> NodeStorage<'c, C> {
        NodeStorage::new(self.resource.child(storage))
    }
}

handle!(
    /// `/nodes/{node}/storage/{storage}`
    NodeStorage
);

impl<C> NodeStorage<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET .../status`
    pub fn status(&self) -> Result<ApiResult, Error> {
        self.resource.child("status").get(&Parameters::new())
    }

    /// `GET .../content`, optionally filtered by content type and owning guest.
    pub fn content(&self, content: Option<&str>, vmid: Option<u32>) -> Result<ApiResult, Error> {
        self.resource.child("content").get(
            &Parameters::new()
                .maybe_arg("content", content)
                .maybe_arg("vmid", vmid),
        )
    }
}

handle!(
    /// `/storage`
    StorageList
);

impl<'c, C> StorageList<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /storage`, optionally limited to one storage type (`dir`, `lvmthin`, `pbs`, ...).
    pub fn index(&self, ty: Option<&str>) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new().maybe_arg("type", ty))
    }

    pub fn storage(&self, storage: &str) -> StorageConfig<'c, C> {
        StorageConfig::new(self.resource.child(storage))
    }
}

handle!(
    /// `/storage/{storage}`
    StorageConfig
);

impl<C> StorageConfig<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /storage/{storage}`
    pub fn read(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `DELETE /storage/{storage}`
    pub fn delete(&self) -> Result<ApiResult, Error> {
        self.resource.delete(&Parameters::new())
    }
}
