//! Order creation and the fulfillment lifecycle.
//!
//! Orders are created atomically from checkout data and decoupled from the
//! cart that produced them - clearing the cart afterwards is the caller's
//! responsibility. Post-creation mutations touch only status fields:
//! payment and delivery are one-way idempotent flips, and the workflow
//! status follows an explicit transition table instead of free overwrite.
//! Each mutation is a read-modify-write cycle persisted via a
//! compare-and-swap on the order's version and retried on conflict, so
//! racing lifecycle mutations never revert each other's confirmed state.
//!
//! Customer-facing reads (`list_for_user`, `get_for_user`) enforce
//! ownership; the `mark_*`/`set_status`/`get`/`list_all` operations are an
//! administrative capability and are exposed only behind the admin API's
//! authorization.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use trendora_core::{OrderId, OrderStatus, ShippingMethod, UserId};

use crate::error::CommerceError;
use crate::models::{NewOrder, Order, OrderItem, ShippingAddress};
use crate::store::{CommerceStore, StoreError};

/// Attempts per mutation before giving up with a conflict error.
const MAX_SAVE_ATTEMPTS: u32 = 3;

/// Order application service.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn CommerceStore>,
}

impl OrderService {
    /// Create a service over a record store.
    #[must_use]
    pub fn new(store: Arc<dyn CommerceStore>) -> Self {
        Self { store }
    }

    /// Create an order snapshot from checkout data.
    ///
    /// Validates that the line items are non-empty, every shipping-address
    /// field is non-blank, the total is non-negative, and every referenced
    /// product exists. The new order starts `unpaid`, `undelivered`,
    /// `pending`.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Validation` for precondition violations and
    /// `CommerceError::NotFound` for unknown products.
    pub async fn create(
        &self,
        user_id: UserId,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        shipping_method: ShippingMethod,
        total_amount: Decimal,
    ) -> Result<Order, CommerceError> {
        if items.is_empty() {
            return Err(CommerceError::Validation(
                "order must contain at least one item".to_owned(),
            ));
        }
        if let Some(field) = shipping_address.first_blank_field() {
            return Err(CommerceError::Validation(format!(
                "shipping address field `{field}` is required"
            )));
        }
        if total_amount < Decimal::ZERO {
            return Err(CommerceError::Validation(
                "total amount must not be negative".to_owned(),
            ));
        }

        for item in &items {
            if self.store.find_product(item.product_id).await?.is_none() {
                return Err(CommerceError::NotFound(format!(
                    "product {} not found",
                    item.product_id
                )));
            }
        }

        let order = self
            .store
            .insert_order(NewOrder {
                user_id,
                items,
                shipping_address,
                shipping_method,
                total_amount,
            })
            .await?;

        tracing::info!(order_id = %order.id, %user_id, total = %order.total_amount, "order placed");
        Ok(order)
    }

    /// All orders owned by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Storage` if the store fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, CommerceError> {
        Ok(self.store.list_orders_by_user(user_id).await?)
    }

    /// A single order, only when owned by the requesting user.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the order does not exist or
    /// belongs to someone else - a non-owner can never distinguish the two.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Order, CommerceError> {
        let order = self.find(order_id).await?;
        if order.user_id != user_id {
            return Err(CommerceError::NotFound(format!(
                "order {order_id} not found"
            )));
        }
        Ok(order)
    }

    /// A single order regardless of owner (administrative).
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the order does not exist.
    pub async fn get(&self, order_id: OrderId) -> Result<Order, CommerceError> {
        self.find(order_id).await
    }

    /// All orders across users, newest first (administrative).
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::Storage` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, CommerceError> {
        Ok(self.store.list_orders().await?)
    }

    /// Confirm payment. Idempotent: an already-paid order is returned
    /// unchanged, `paid_at` keeps its original value.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the order does not exist,
    /// `CommerceError::Conflict` when concurrent mutations exhaust the
    /// retries.
    pub async fn mark_paid(&self, order_id: OrderId) -> Result<Order, CommerceError> {
        let order = self
            .mutate(order_id, |order| {
                if order.payment_status.is_paid() {
                    return Ok(false);
                }
                order.payment_status = trendora_core::PaymentStatus::Paid;
                order.paid_at = Some(Utc::now());
                Ok(true)
            })
            .await?;
        tracing::info!(%order_id, "order marked paid");
        Ok(order)
    }

    /// Confirm delivery. Same idempotence policy as [`Self::mark_paid`].
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the order does not exist,
    /// `CommerceError::Conflict` when concurrent mutations exhaust the
    /// retries.
    pub async fn mark_delivered(&self, order_id: OrderId) -> Result<Order, CommerceError> {
        let order = self
            .mutate(order_id, |order| {
                if order.delivery_status.is_delivered() {
                    return Ok(false);
                }
                order.delivery_status = trendora_core::DeliveryStatus::Delivered;
                order.delivered_at = Some(Utc::now());
                Ok(true)
            })
            .await?;
        tracing::info!(%order_id, "order marked delivered");
        Ok(order)
    }

    /// Move the workflow status along the transition table.
    ///
    /// Re-applying the current status is a no-op; any move outside the
    /// table is rejected.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError::NotFound` when the order does not exist,
    /// `CommerceError::Validation` for a disallowed transition, and
    /// `CommerceError::Conflict` when concurrent mutations exhaust the
    /// retries.
    pub async fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let order = self
            .mutate(order_id, |order| {
                if order.status == status {
                    return Ok(false);
                }
                if !order.status.can_transition_to(status) {
                    return Err(CommerceError::Validation(format!(
                        "cannot move order {order_id} from `{}` to `{status}`",
                        order.status
                    )));
                }
                order.status = status;
                Ok(true)
            })
            .await?;
        tracing::info!(%order_id, status = %order.status, "order status updated");
        Ok(order)
    }

    /// Run one read-modify-write cycle, retrying on version conflicts.
    ///
    /// `apply` returns `false` when the order is already in the requested
    /// state; the re-read copy is then returned without a save, which is
    /// what makes the idempotent operations race-safe: a retry observes the
    /// winner's state instead of re-stamping it.
    async fn mutate<F>(&self, order_id: OrderId, mut apply: F) -> Result<Order, CommerceError>
    where
        F: FnMut(&mut Order) -> Result<bool, CommerceError>,
    {
        for attempt in 1..=MAX_SAVE_ATTEMPTS {
            let mut order = self.find(order_id).await?;

            if !apply(&mut order)? {
                return Ok(order);
            }

            match self.store.save_order(&order).await {
                Ok(saved) => return Ok(saved),
                Err(StoreError::VersionConflict) => {
                    tracing::debug!(%order_id, attempt, "order version conflict, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CommerceError::Conflict(format!(
            "order {order_id} is being modified concurrently"
        )))
    }

    async fn find(&self, order_id: OrderId) -> Result<Order, CommerceError> {
        self.store
            .find_order(order_id)
            .await?
            .ok_or_else(|| CommerceError::NotFound(format!("order {order_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use trendora_core::{DeliveryStatus, PaymentStatus, ProductId};

    use crate::models::NewProduct;
    use crate::store::MemoryStore;

    fn address() -> ShippingAddress {
        ShippingAddress {
            first_name: "Grace".to_owned(),
            last_name: "Hopper".to_owned(),
            address: "1 Compiler Court".to_owned(),
            city: "Arlington".to_owned(),
            state: "VA".to_owned(),
            country: "US".to_owned(),
            postal_code: "22202".to_owned(),
        }
    }

    async fn service_with_product() -> (OrderService, Arc<MemoryStore>, ProductId) {
        let store = Arc::new(MemoryStore::new());
        let product = store
            .insert_product(NewProduct {
                name: "Coat".to_owned(),
                description: String::new(),
                price: Decimal::from(40),
                image: "/img/coat.jpg".to_owned(),
                category: "Outerwear".to_owned(),
                stock: 10,
                sizes: vec![],
                colors: vec![],
            })
            .await
            .expect("product");
        (OrderService::new(store.clone()), store, product.id)
    }

    fn items(product_id: ProductId) -> Vec<OrderItem> {
        vec![OrderItem {
            product_id,
            quantity: 5,
            size: Some("M".to_owned()),
            color: None,
        }]
    }

    #[tokio::test]
    async fn test_create_order_snapshot() {
        let (service, _, product_id) = service_with_product().await;
        let order = service
            .create(
                UserId::new(1),
                items(product_id),
                address(),
                ShippingMethod::Express,
                Decimal::from(220),
            )
            .await
            .expect("create");

        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert_eq!(order.delivery_status, DeliveryStatus::Undelivered);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.paid_at.is_none());
        assert_eq!(order.total_amount, Decimal::from(220));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_items() {
        let (service, _, _) = service_with_product().await;
        let err = service
            .create(
                UserId::new(1),
                vec![],
                address(),
                ShippingMethod::Standard,
                Decimal::from(10),
            )
            .await
            .expect_err("empty items");
        assert!(matches!(err, CommerceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_address_field() {
        let (service, _, product_id) = service_with_product().await;
        let mut addr = address();
        addr.state = "  ".to_owned();
        let err = service
            .create(
                UserId::new(1),
                items(product_id),
                addr,
                ShippingMethod::Standard,
                Decimal::from(10),
            )
            .await
            .expect_err("blank state");
        assert!(matches!(err, CommerceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_product() {
        let (service, _, _) = service_with_product().await;
        let err = service
            .create(
                UserId::new(1),
                items(ProductId::new(404)),
                address(),
                ShippingMethod::Standard,
                Decimal::from(10),
            )
            .await
            .expect_err("unknown product");
        assert!(matches!(err, CommerceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ownership_is_enforced_on_reads() {
        let (service, _, product_id) = service_with_product().await;
        let owner = UserId::new(1);
        let stranger = UserId::new(2);

        let order = service
            .create(
                owner,
                items(product_id),
                address(),
                ShippingMethod::Standard,
                Decimal::from(210),
            )
            .await
            .expect("create");

        let err = service
            .get_for_user(stranger, order.id)
            .await
            .expect_err("not the owner");
        assert!(matches!(err, CommerceError::NotFound(_)));

        assert!(service.list_for_user(stranger).await.expect("list").is_empty());
        assert_eq!(service.list_for_user(owner).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_mark_paid_is_idempotent() {
        let (service, _, product_id) = service_with_product().await;
        let order = service
            .create(
                UserId::new(1),
                items(product_id),
                address(),
                ShippingMethod::Standard,
                Decimal::from(210),
            )
            .await
            .expect("create");

        let paid = service.mark_paid(order.id).await.expect("pay");
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        let first_paid_at = paid.paid_at.expect("paid_at set");

        let again = service.mark_paid(order.id).await.expect("pay again");
        assert_eq!(again.payment_status, PaymentStatus::Paid);
        assert_eq!(again.paid_at, Some(first_paid_at));
    }

    #[tokio::test]
    async fn test_mark_delivered_is_idempotent() {
        let (service, _, product_id) = service_with_product().await;
        let order = service
            .create(
                UserId::new(1),
                items(product_id),
                address(),
                ShippingMethod::Standard,
                Decimal::from(210),
            )
            .await
            .expect("create");

        let delivered = service.mark_delivered(order.id).await.expect("deliver");
        assert_eq!(delivered.delivery_status, DeliveryStatus::Delivered);
        let stamp = delivered.delivered_at.expect("delivered_at set");

        let again = service.mark_delivered(order.id).await.expect("again");
        assert_eq!(again.delivered_at, Some(stamp));
    }

    #[tokio::test]
    async fn test_stale_save_cannot_revert_confirmed_payment() {
        let (service, store, product_id) = service_with_product().await;
        let order = service
            .create(
                UserId::new(1),
                items(product_id),
                address(),
                ShippingMethod::Standard,
                Decimal::from(210),
            )
            .await
            .expect("create");

        // A slow actor read the order before payment landed.
        let mut stale = store
            .find_order(order.id)
            .await
            .expect("find")
            .expect("order");

        service.mark_paid(order.id).await.expect("pay");

        // Its whole-row save is rejected instead of clobbering the payment.
        stale.delivery_status = DeliveryStatus::Delivered;
        stale.delivered_at = Some(chrono::Utc::now());
        let err = store.save_order(&stale).await.expect_err("stale save");
        assert!(matches!(err, crate::store::StoreError::VersionConflict));

        let reloaded = service.get(order.id).await.expect("reload");
        assert_eq!(reloaded.payment_status, PaymentStatus::Paid);
        assert_eq!(reloaded.delivery_status, DeliveryStatus::Undelivered);
    }

    #[tokio::test]
    async fn test_concurrent_pay_and_deliver_both_stick() {
        let (service, _, product_id) = service_with_product().await;
        let order = service
            .create(
                UserId::new(1),
                items(product_id),
                address(),
                ShippingMethod::Standard,
                Decimal::from(210),
            )
            .await
            .expect("create");

        let (paid, delivered) = tokio::join!(
            service.mark_paid(order.id),
            service.mark_delivered(order.id),
        );
        paid.expect("pay");
        delivered.expect("deliver");

        let after = service.get(order.id).await.expect("reload");
        assert_eq!(after.payment_status, PaymentStatus::Paid);
        assert!(after.paid_at.is_some());
        assert_eq!(after.delivery_status, DeliveryStatus::Delivered);
        assert!(after.delivered_at.is_some());
    }

    #[tokio::test]
    async fn test_status_follows_transition_table() {
        let (service, _, product_id) = service_with_product().await;
        let order = service
            .create(
                UserId::new(1),
                items(product_id),
                address(),
                ShippingMethod::Standard,
                Decimal::from(210),
            )
            .await
            .expect("create");

        // Skipping ahead is rejected.
        let err = service
            .set_status(order.id, OrderStatus::Shipped)
            .await
            .expect_err("pending cannot jump to shipped");
        assert!(matches!(err, CommerceError::Validation(_)));

        let order_id = order.id;
        for next in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            let updated = service.set_status(order_id, next).await.expect("advance");
            assert_eq!(updated.status, next);
        }

        // Delivered is terminal.
        let err = service
            .set_status(order_id, OrderStatus::Cancelled)
            .await
            .expect_err("terminal");
        assert!(matches!(err, CommerceError::Validation(_)));

        // Re-applying the current status stays a no-op.
        let same = service
            .set_status(order_id, OrderStatus::Delivered)
            .await
            .expect("idempotent");
        assert_eq!(same.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_snapshot_is_immutable_through_lifecycle() {
        let (service, _, product_id) = service_with_product().await;
        let order = service
            .create(
                UserId::new(1),
                items(product_id),
                address(),
                ShippingMethod::Express,
                Decimal::from(220),
            )
            .await
            .expect("create");

        service.mark_paid(order.id).await.expect("pay");
        service
            .set_status(order.id, OrderStatus::Processing)
            .await
            .expect("process");
        service.mark_delivered(order.id).await.expect("deliver");

        let after = service.get(order.id).await.expect("reload");
        assert_eq!(after.items.len(), order.items.len());
        assert_eq!(
            after.items.first().expect("item").quantity,
            order.items.first().expect("item").quantity
        );
        assert_eq!(after.shipping_address.city, order.shipping_address.city);
        assert_eq!(after.shipping_method, order.shipping_method);
        assert_eq!(after.total_amount, order.total_amount);
    }

    #[tokio::test]
    async fn test_lifecycle_on_missing_order() {
        let (service, _, _) = service_with_product().await;
        let missing = OrderId::new(404);

        assert!(matches!(
            service.mark_paid(missing).await,
            Err(CommerceError::NotFound(_))
        ));
        assert!(matches!(
            service.mark_delivered(missing).await,
            Err(CommerceError::NotFound(_))
        ));
        assert!(matches!(
            service.set_status(missing, OrderStatus::Processing).await,
            Err(CommerceError::NotFound(_))
        ));
    }
}
