use std::marker::PhantomData;

use crate::crud::EntityService;
use crate::error::ClientResult;
use crate::model::Entity;
use crate::schema::RequestOptions;

/// Backing state for an entity list page.
pub struct ListView<E, S> {
    service: S,
    options: RequestOptions,
    items: Vec<E>,
    total_count: Option<u64>,
    is_loading: bool,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> ListView<E, S>
where
    E: Entity,
    S: EntityService<E>,
{
    pub fn new(service: S, options: RequestOptions) -> Self {
        Self {
            service,
            options,
            items: Vec::new(),
            total_count: None,
            is_loading: false,
            _entity: PhantomData,
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Reloads the list. On failure the previous items are kept.
    pub async fn load_all(&mut self) -> ClientResult<()> {
        self.is_loading = true;
        let result = self.service.query(&self.options).await;
        self.is_loading = false;

        let page = result?;
        self.items = page.items;
        self.total_count = page.total_count;
        Ok(())
    }

    /// Deletes one entry and reloads the list.
    pub async fn delete(&mut self, id: i64) -> ClientResult<()> {
        self.service.delete(id).await?;
        tracing::info!(entity = E::NAME, id, "Deleted");
        self.load_all().await
    }
}
