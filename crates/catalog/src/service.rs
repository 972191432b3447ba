//! Product service providing the catalog use cases.

use std::sync::Arc;

use common::{Clock, ProductId};
use domain::{AggregateRoot, Product};
use store::{Committer, Mutation, WritePlan};

use crate::command::{
    ActivateProduct, ApplyDiscount, ArchiveProduct, CommandResult, CreateProduct,
    DeactivateProduct, RemoveDiscount, UpdateProduct,
};
use crate::outbox::{OutboxRepo, OutboxRepository};
use crate::repository::ProductRepository;
use crate::Result;

/// Service for managing products.
///
/// Every command follows the same path: validate, load, run one business
/// method, plan the product mutation plus one outbox row per pending event,
/// and commit the plan atomically. Pending changes are cleared only after
/// the commit succeeds; on failure the loaded product is dropped.
pub struct ProductService<R, C> {
    repository: R,
    committer: C,
    outbox: OutboxRepo,
    clock: Arc<dyn Clock>,
}

impl<R, C> ProductService<R, C>
where
    R: ProductRepository,
    C: Committer,
{
    /// Creates a new product service reading time from `clock`.
    pub fn new(repository: R, committer: C, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            committer,
            outbox: OutboxRepo::new(),
            clock,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn committer(&self) -> &C {
        &self.committer
    }

    /// Creates a new draft product.
    #[tracing::instrument(skip(self))]
    pub async fn create_product(&self, cmd: CreateProduct) -> Result<CommandResult> {
        cmd.validate()?;

        let product = Product::new(
            cmd.product_id,
            &cmd.name,
            &cmd.description,
            &cmd.category,
            cmd.base_price,
            self.clock.now(),
        )?;
        let mutation = self.repository.insert_mut(&product)?;

        self.commit("create_product", product, Some(mutation)).await
    }

    /// Updates a product's name, description and category.
    ///
    /// Submitting the current values commits nothing.
    #[tracing::instrument(skip(self))]
    pub async fn update_product(&self, cmd: UpdateProduct) -> Result<CommandResult> {
        cmd.validate()?;

        let mut product = self.repository.find_by_id(&cmd.product_id).await?;
        product.update(&cmd.name, &cmd.description, &cmd.category, self.clock.now())?;
        let mutation = self.repository.update_mut(&product)?;

        self.commit("update_product", product, mutation).await
    }

    /// Puts a product on sale.
    #[tracing::instrument(skip(self))]
    pub async fn activate_product(&self, cmd: ActivateProduct) -> Result<CommandResult> {
        cmd.validate()?;

        let mut product = self.repository.find_by_id(&cmd.product_id).await?;
        product.activate(self.clock.now())?;
        let mutation = self.repository.update_mut(&product)?;

        self.commit("activate_product", product, mutation).await
    }

    /// Withdraws a product from sale.
    #[tracing::instrument(skip(self))]
    pub async fn deactivate_product(&self, cmd: DeactivateProduct) -> Result<CommandResult> {
        cmd.validate()?;

        let mut product = self.repository.find_by_id(&cmd.product_id).await?;
        product.deactivate(self.clock.now())?;
        let mutation = self.repository.update_mut(&product)?;

        self.commit("deactivate_product", product, mutation).await
    }

    /// Soft-deletes a product.
    #[tracing::instrument(skip(self))]
    pub async fn archive_product(&self, cmd: ArchiveProduct) -> Result<CommandResult> {
        cmd.validate()?;

        let mut product = self.repository.find_by_id(&cmd.product_id).await?;
        product.archive(self.clock.now())?;
        let mutation = self.repository.archive_mut(&product)?;

        self.commit("archive_product", product, Some(mutation)).await
    }

    /// Applies a discount, replacing any existing one.
    #[tracing::instrument(skip(self))]
    pub async fn apply_discount(&self, cmd: ApplyDiscount) -> Result<CommandResult> {
        cmd.validate()?;

        let mut product = self.repository.find_by_id(&cmd.product_id).await?;
        product.apply_discount(cmd.discount()?, self.clock.now())?;
        let mutation = self.repository.update_mut(&product)?;

        self.commit("apply_discount", product, mutation).await
    }

    /// Clears a product's discount.
    #[tracing::instrument(skip(self))]
    pub async fn remove_discount(&self, cmd: RemoveDiscount) -> Result<CommandResult> {
        cmd.validate()?;

        let mut product = self.repository.find_by_id(&cmd.product_id).await?;
        product.remove_discount(self.clock.now())?;
        let mutation = self.repository.update_mut(&product)?;

        self.commit("remove_discount", product, mutation).await
    }

    /// Loads a product.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, product_id: &ProductId) -> Result<Product> {
        self.repository.find_by_id(product_id).await
    }

    async fn commit(
        &self,
        command: &'static str,
        mut product: Product,
        mutation: Option<Mutation>,
    ) -> Result<CommandResult> {
        let mut plan = WritePlan::new();
        plan.add(mutation);
        plan.add_all(
            product
                .pending_events()
                .iter()
                .map(|event| self.outbox.insert_domain_event_mut(event)),
        );

        self.committer.apply(&plan).await?;

        let events = product.pending_events().to_vec();
        product.mark_committed();

        metrics::counter!("catalog_commands_total", "command" => command).increment(1);
        tracing::info!(
            product_id = %product.product_id(),
            mutations = plan.count(),
            events = events.len(),
            "{command} committed"
        );

        Ok(CommandResult { product, events })
    }
}
