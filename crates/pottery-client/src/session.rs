use std::sync::Arc;

use pottery_core::{
    Catalog, FieldStore, Surfaces, SurfacesSnapshot, SyncReport, ViewSynchronizer, build_request,
};
use pottery_model::{Field, OperationId};
use tracing::instrument;

use crate::{
    config::ClientConfig,
    dispatcher::{Dispatcher, Pending},
    errors::ClientError,
    transport::{HttpTransport, Transport},
};

/// One user's view of the server: operations, fields, displays and in-flight requests.
#[derive(Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    fields: FieldStore,
    surfaces: Surfaces,
    dispatcher: Dispatcher,
}

impl Session {
    /// Session over the standard catalog.
    pub fn new(transport: impl Transport) -> Result<Self, ClientError> {
        Ok(Self::with_catalog(Catalog::standard()?, transport))
    }

    /// Session talking HTTP to `config.base_url`.
    pub fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        Self::new(HttpTransport::new(config)?)
    }

    pub fn with_catalog(catalog: Catalog, transport: impl Transport) -> Self {
        let fields = FieldStore::new();
        let surfaces = Surfaces::new();
        let synchronizer = ViewSynchronizer::new(fields.clone(), surfaces.clone());

        Self {
            catalog: Arc::new(catalog),
            dispatcher: Dispatcher::new(Arc::new(transport), synchronizer),
            fields,
            surfaces,
        }
    }

    /// Build the request from the current fields and send it in the background.
    ///
    /// A missing field fails here, before anything reaches the transport.
    #[instrument(level = "trace", skip(self))]
    pub fn trigger(&self, id: OperationId) -> Result<Pending, ClientError> {
        let op = self.catalog.get(id).ok_or(ClientError::UnknownOperation(id))?;
        let request = build_request(op, &self.fields.snapshot())?;
        Ok(self.dispatcher.dispatch(op.clone(), request))
    }

    /// Trigger and wait for the outcome to be applied.
    pub async fn run(&self, id: OperationId) -> Result<SyncReport, ClientError> {
        self.trigger(id)?.wait().await
    }

    pub async fn wait_idle(&self) {
        self.dispatcher.wait_idle().await;
    }

    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    pub fn set(&self, field: Field, value: impl Into<String>) {
        self.fields.set(field, value);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn view(&self) -> SurfacesSnapshot {
        self.surfaces.snapshot()
    }
}
