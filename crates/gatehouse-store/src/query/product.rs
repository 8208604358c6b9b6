//! Product repository.

use std::future::Future;

use jiff::Timestamp;

use super::normalize_optional;
use crate::model::{NewProduct, Product, UpdateProduct};
use crate::{StoreClient, StoreError, StoreResult, TRACING_TARGET_QUERY};

const ENTITY: &str = "product";

/// Repository for catalog products.
pub trait ProductRepository {
    /// Inserts a new product.
    fn create_product(
        &self,
        new_product: NewProduct,
    ) -> impl Future<Output = StoreResult<Product>> + Send;

    /// Finds a product by its identifier.
    fn find_product_by_id(
        &self,
        product_id: i64,
    ) -> impl Future<Output = StoreResult<Option<Product>>> + Send;

    /// Lists all products in identifier order.
    fn list_products(&self) -> impl Future<Output = StoreResult<Vec<Product>>> + Send;

    /// Lists the products of a category.
    fn list_products_by_category(
        &self,
        category: &str,
    ) -> impl Future<Output = StoreResult<Vec<Product>>> + Send;

    /// Replaces the mutable fields of a product.
    fn update_product(
        &self,
        product_id: i64,
        updates: UpdateProduct,
    ) -> impl Future<Output = StoreResult<Product>> + Send;

    /// Permanently removes a product.
    fn delete_product(&self, product_id: i64) -> impl Future<Output = StoreResult<()>> + Send;
}

impl ProductRepository for StoreClient {
    async fn create_product(&self, new_product: NewProduct) -> StoreResult<Product> {
        let mut tables = self.write().await;

        let now = Timestamp::now();
        let product = Product {
            id: tables.products.next_id(),
            name: new_product.name.trim().to_owned(),
            description: normalize_optional(new_product.description),
            price: new_product.price,
            stock: new_product.stock,
            category: normalize_optional(new_product.category),
            created_at: now,
            updated_at: now,
            updated_by: new_product.created_by.clone(),
            created_by: new_product.created_by,
        };

        tables.products.rows.insert(product.id, product.clone());
        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            product_id = product.id,
            created_by = %product.created_by,
            "Product created",
        );

        Ok(product)
    }

    async fn find_product_by_id(&self, product_id: i64) -> StoreResult<Option<Product>> {
        let tables = self.read().await;
        Ok(tables.products.rows.get(&product_id).cloned())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let tables = self.read().await;
        Ok(tables.products.values().cloned().collect())
    }

    async fn list_products_by_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let tables = self.read().await;
        Ok(tables
            .products
            .values()
            .filter(|p| p.category.as_deref() == Some(category))
            .cloned()
            .collect())
    }

    async fn update_product(&self, product_id: i64, updates: UpdateProduct) -> StoreResult<Product> {
        let mut tables = self.write().await;
        let product = tables
            .products
            .rows
            .get_mut(&product_id)
            .ok_or(StoreError::not_found(ENTITY, product_id))?;

        product.name = updates.name.trim().to_owned();
        product.description = normalize_optional(updates.description);
        product.price = updates.price;
        product.stock = updates.stock;
        product.category = normalize_optional(updates.category);
        product.updated_by = updates.updated_by;
        product.updated_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            product_id,
            updated_by = %product.updated_by,
            "Product updated",
        );

        Ok(product.clone())
    }

    async fn delete_product(&self, product_id: i64) -> StoreResult<()> {
        let mut tables = self.write().await;
        if tables.products.rows.remove(&product_id).is_none() {
            return Err(StoreError::not_found(ENTITY, product_id));
        }

        tracing::debug!(target: TRACING_TARGET_QUERY, product_id, "Product deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;

    fn laptop() -> anyhow::Result<NewProduct> {
        Ok(NewProduct {
            name: "Laptop".into(),
            description: Some("14 inch".into()),
            price: BigDecimal::from_str("999.99")?,
            stock: 5,
            category: Some("electronics".into()),
            created_by: "1".into(),
        })
    }

    #[tokio::test]
    async fn create_update_delete() -> anyhow::Result<()> {
        let store = StoreClient::new();
        let product = store.create_product(laptop()?).await?;
        assert_eq!(product.id, 1);
        assert_eq!(product.created_by, "1");
        assert_eq!(product.updated_by, "1");

        let updated = store
            .update_product(
                product.id,
                UpdateProduct {
                    name: "Laptop Pro".into(),
                    description: None,
                    price: BigDecimal::from_str("1299.00")?,
                    stock: 2,
                    category: Some("electronics".into()),
                    updated_by: "system".into(),
                },
            )
            .await?;
        assert_eq!(updated.name, "Laptop Pro");
        assert_eq!(updated.created_by, "1");
        assert_eq!(updated.updated_by, "system");

        store.delete_product(product.id).await?;
        assert!(store.find_product_by_id(product.id).await?.is_none());
        assert_eq!(
            store.delete_product(product.id).await,
            Err(StoreError::not_found("product", product.id))
        );
        Ok(())
    }

    #[tokio::test]
    async fn filters_by_category() -> anyhow::Result<()> {
        let store = StoreClient::new();
        store.create_product(laptop()?).await?;
        store
            .create_product(NewProduct {
                category: Some("books".into()),
                ..laptop()?
            })
            .await?;

        assert_eq!(store.list_products().await?.len(), 2);
        let books = store.list_products_by_category("books").await?;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, 2);
        Ok(())
    }
}
