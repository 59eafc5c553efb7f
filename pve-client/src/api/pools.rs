//! Resource pools, `/pools`.

use serde::Serialize;

use crate::api::ApiParams;
use crate::{ApiResult, Error, HttpApiClient, Parameters};

/// `POST /pools`
#[derive(Clone, Debug, Default, Serialize)]
pub struct CreatePool {
    pub poolid: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CreatePool {
    pub fn new(poolid: impl Into<String>) -> Self {
        Self {
            poolid: poolid.into(),
            comment: None,
        }
    }
}

/// `PUT /pools/{poolid}`
#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdatePool {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Remove the listed vms and storages instead of adding them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<bool>,

    /// List of storage IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,

    /// List of guest VMIDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vms: Option<String>,
}

api_params!(CreatePool, UpdatePool);

handle!(
    /// `/pools`
    Pools
);

impl<'c, C> Pools<'c, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /pools`
    pub fn index(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `POST /pools`
    pub fn create(&self, params: CreatePool) -> Result<ApiResult, Error> {
        self.resource.create(&params.to_parameters()?)
    }

    pub fn pool(&self, poolid: &str) -> Pool<'c, C> {
        Pool::new(self.resource.child(poolid))
    }
}

handle!(
    /// `/pools/{poolid}`
    Pool
);

impl<C> Pool<'_, C>
where
    C: HttpApiClient + ?Sized,
{
    /// `GET /pools/{poolid}`
    pub fn read(&self) -> Result<ApiResult, Error> {
        self.resource.get(&Parameters::new())
    }

    /// `PUT /pools/{poolid}`
    pub fn update(&self, params: UpdatePool) -> Result<ApiResult, Error> {
        self.resource.set(&params.to_parameters()?)
    }

    /// `DELETE /pools/{poolid}`
    pub fn delete(&self) -> Result<ApiResult, Error> {
        self.resource.delete(&Parameters::new())
    }
}
