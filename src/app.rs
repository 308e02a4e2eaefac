use std::sync::Arc;

use crate::{
    catalog::{CatalogHandle, TypeCatalog},
    coerce::DecoderTable,
    config::Config,
    jobs::registry::RecurringJobRegistry,
    jobs::store::JobStore,
};

/// Shared per-process state handed to every request handler.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub catalog: CatalogHandle,
    pub decoders: Arc<DecoderTable>,
    pub registry: RecurringJobRegistry,
}

impl App {
    #[must_use]
    pub fn new(config: Config, catalog: TypeCatalog, store: Arc<dyn JobStore>) -> Self {
        Self {
            config,
            catalog: CatalogHandle::new(catalog),
            decoders: Arc::new(DecoderTable::with_defaults()),
            registry: RecurringJobRegistry::new(store),
        }
    }
}
