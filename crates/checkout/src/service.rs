//! The checkout service: every order operation, wired across the store,
//! gateway, and notifier boundaries.
//!
//! Side-effect ordering is uniform: validate, apply the aggregate
//! transition, persist, then dispatch notifications and persist the flag
//! outcome. A notification failure never rolls back the transition.

use chrono::{DateTime, Utc};
use common::{AddressId, OrderRef};
use domain::{
    Address, NotificationKind, Order, OrderError, OrderStatus, OrderSummary, PaymentFailureOutcome,
    PaymentMethod, TrackingInfo, TrackingStatus,
};
use gateway::{CallbackPayload, GatewayIntent, PaymentGateway, SignatureVerifier, Verification};
use store::{AddressStore, CartStore, OrderStore, ProductStore};

use crate::auth::Principal;
use crate::error::{CheckoutError, Result};
use crate::notification::{self, Notifier};
use crate::snapshot;

/// Shipping address for a new order: inline, or a saved-address reference.
#[derive(Debug, Clone)]
pub enum AddressSelection {
    Inline(Address),
    Saved(AddressId),
}

/// Request to place an order from the caller's cart.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub address: AddressSelection,
    pub payment_method: PaymentMethod,
    pub delivery_note: String,
}

/// Request to move an order to a new status, as received on the wire.
///
/// The payment method and delivery note ride along optionally; absent
/// fields leave the order's values untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub payment_method: Option<PaymentMethod>,
    pub delivery_note: Option<String>,
}

/// Explicit payment failure/cancel event reported by the gateway or client.
#[derive(Debug, Clone, Default)]
pub struct PaymentFailureRequest {
    pub txn_ref: Option<String>,
    pub reason: Option<String>,
}

/// Admin tracking update, as received on the wire.
#[derive(Debug, Clone)]
pub struct TrackingUpdate {
    pub reference_number: String,
    pub estimate_date: DateTime<Utc>,
    pub courier_partner: String,
    pub tracking_link: String,
    pub status: String,
}

/// Outcome of a payment callback.
#[derive(Debug, Clone)]
pub enum PaymentVerification {
    Verified(OrderSummary),
    SignatureMismatch,
}

/// Outcome of an admin refund request.
#[derive(Debug, Clone)]
pub enum RefundOutcome {
    Refunded(OrderSummary),
    /// The order was already refunded; the gateway was not called again.
    AlreadyRefunded(OrderSummary),
}

/// Orchestrates order operations across storage, the payment gateway, and
/// the notifier.
pub struct CheckoutService<O, P, C, A, G, N>
where
    O: OrderStore,
    P: ProductStore,
    C: CartStore,
    A: AddressStore,
    G: PaymentGateway,
    N: Notifier,
{
    orders: O,
    products: P,
    carts: C,
    addresses: A,
    gateway: G,
    notifier: N,
    verifier: SignatureVerifier,
}

impl<O, P, C, A, G, N> CheckoutService<O, P, C, A, G, N>
where
    O: OrderStore,
    P: ProductStore,
    C: CartStore,
    A: AddressStore,
    G: PaymentGateway,
    N: Notifier,
{
    /// Creates a new checkout service.
    pub fn new(
        orders: O,
        products: P,
        carts: C,
        addresses: A,
        gateway: G,
        notifier: N,
        verifier: SignatureVerifier,
    ) -> Self {
        Self {
            orders,
            products,
            carts,
            addresses,
            gateway,
            notifier,
            verifier,
        }
    }

    /// Places an order from the caller's cart.
    ///
    /// The cart is cleared only after the order insert succeeds, so a failed
    /// write never loses cart contents.
    #[tracing::instrument(skip(self, request), fields(user_id = %principal.user_id))]
    pub async fn create_order(
        &self,
        principal: &Principal,
        request: CreateOrderRequest,
    ) -> Result<OrderSummary> {
        let cart = self
            .carts
            .get(principal.user_id)
            .await?
            .ok_or(CheckoutError::EmptyCart)?;
        let items = snapshot::materialize_order_items(&cart, &self.products).await?;

        let address = match request.address {
            AddressSelection::Inline(address) => address,
            AddressSelection::Saved(id) => self
                .addresses
                .find_for_user(id, principal.user_id)
                .await?
                .ok_or(CheckoutError::AddressNotFound)?
                .address,
        };

        let order = Order::create(
            principal.user_id,
            OrderRef::generate(),
            items,
            address,
            request.payment_method,
            request.delivery_note,
            Utc::now(),
        )?;

        let stored = self.orders.insert(order).await?;
        self.carts.clear(principal.user_id).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_ref = %stored.order_ref(), "order created");
        Ok(OrderSummary::project(&stored))
    }

    /// Fetches one order, scoped to its owner. Admins see any order.
    pub async fn get_order(
        &self,
        principal: &Principal,
        order_ref: &OrderRef,
    ) -> Result<OrderSummary> {
        let order = self.load(principal, order_ref).await?;
        Ok(OrderSummary::project(&order))
    }

    /// Lists the caller's orders, newest first.
    pub async fn list_orders(&self, principal: &Principal) -> Result<Vec<OrderSummary>> {
        let orders = self.orders.list_for_user(principal.user_id).await?;
        Ok(orders.iter().map(OrderSummary::project).collect())
    }

    /// Lists all orders in one status. Admin only.
    pub async fn list_by_status(
        &self,
        principal: &Principal,
        status: OrderStatus,
    ) -> Result<Vec<OrderSummary>> {
        principal.require_admin()?;
        let orders = self.orders.list_by_status(status).await?;
        Ok(orders.iter().map(OrderSummary::project).collect())
    }

    /// Moves an order to a new status.
    ///
    /// Confirming a cash-on-delivery order dispatches the order-confirmation
    /// notification.
    #[tracing::instrument(skip(self, request), fields(order_ref = %order_ref))]
    pub async fn update_status(
        &self,
        principal: &Principal,
        order_ref: &OrderRef,
        request: UpdateStatusRequest,
    ) -> Result<OrderSummary> {
        let status: OrderStatus = request.status.parse().map_err(CheckoutError::Order)?;
        let mut order = self.load(principal, order_ref).await?;
        let now = Utc::now();

        if let Some(method) = request.payment_method {
            order.set_payment_method(method, now);
        }
        if let Some(note) = request.delivery_note {
            order.set_delivery_note(note, now);
        }
        order.apply_status(status, now);
        let mut stored = self.orders.update(order).await?;

        if status == OrderStatus::Confirmed
            && stored.payment_method() == PaymentMethod::CashOnDelivery
        {
            stored = self
                .dispatch_and_persist(stored, NotificationKind::OrderConfirmed, now)
                .await?;
        }

        Ok(OrderSummary::project(&stored))
    }

    /// Registers a payment intent with the gateway and binds it to the
    /// order.
    ///
    /// A gateway failure propagates without touching the order.
    #[tracing::instrument(skip(self), fields(order_ref = %order_ref))]
    pub async fn create_payment_intent(
        &self,
        principal: &Principal,
        order_ref: &OrderRef,
    ) -> Result<GatewayIntent> {
        let mut order = self.load(principal, order_ref).await?;

        let intent = self
            .gateway
            .create_intent(order.order_ref(), order.total_amount())
            .await?;

        order.bind_gateway_intent(intent.gateway_order_id.clone(), Utc::now());
        self.orders.update(order).await?;

        metrics::counter!("payment_intents_created_total").increment(1);
        Ok(intent)
    }

    /// Processes a payment callback from the gateway.
    ///
    /// The verified transition is persisted before the notification is
    /// attempted; replaying the same callback changes nothing. A signature
    /// mismatch marks the payment failed but leaves the order status alone.
    #[tracing::instrument(skip(self, payload), fields(order_ref = %order_ref))]
    pub async fn verify_payment(
        &self,
        principal: &Principal,
        order_ref: &OrderRef,
        payload: CallbackPayload,
    ) -> Result<PaymentVerification> {
        let mut order = self.load(principal, order_ref).await?;
        let now = Utc::now();

        match self.verifier.verify(&payload) {
            Verification::Verified => {
                let changed = order.record_payment_verified(
                    payload.gateway_order_id,
                    payload.gateway_payment_id,
                    payload.signature,
                    now,
                );

                let stored = if changed {
                    let stored = self.orders.update(order).await?;
                    metrics::counter!("payments_verified_total").increment(1);
                    self.dispatch_and_persist(stored, NotificationKind::OrderConfirmed, now)
                        .await?
                } else {
                    order
                };

                Ok(PaymentVerification::Verified(OrderSummary::project(&stored)))
            }
            Verification::Mismatch => {
                tracing::warn!(order_ref = %order.order_ref(), "payment signature mismatch");
                order.record_signature_mismatch(payload.gateway_payment_id, now);
                self.orders.update(order).await?;
                metrics::counter!("payment_signature_mismatches_total").increment(1);
                Ok(PaymentVerification::SignatureMismatch)
            }
        }
    }

    /// Records an explicit payment failure/cancel event.
    ///
    /// Idempotent when the order is already paid; duplicate events for the
    /// same transaction reference change nothing.
    #[tracing::instrument(skip(self, request), fields(order_ref = %order_ref))]
    pub async fn mark_payment_failed(
        &self,
        principal: &Principal,
        order_ref: &OrderRef,
        request: PaymentFailureRequest,
    ) -> Result<OrderSummary> {
        let mut order = self.load(principal, order_ref).await?;
        let now = Utc::now();

        match order.record_payment_failure(request.txn_ref, request.reason, now) {
            PaymentFailureOutcome::Recorded => {
                let stored = self.orders.update(order).await?;
                metrics::counter!("payments_failed_total").increment(1);
                let stored = self
                    .dispatch_and_persist(stored, NotificationKind::Cancelled, now)
                    .await?;
                Ok(OrderSummary::project(&stored))
            }
            PaymentFailureOutcome::AlreadyPaid | PaymentFailureOutcome::Duplicate => {
                Ok(OrderSummary::project(&order))
            }
        }
    }

    /// Cancels the order on the customer's request.
    #[tracing::instrument(skip(self), fields(order_ref = %order_ref))]
    pub async fn cancel_order(
        &self,
        principal: &Principal,
        order_ref: &OrderRef,
    ) -> Result<OrderSummary> {
        let mut order = self.load(principal, order_ref).await?;
        let now = Utc::now();

        order.cancel(now)?;
        let stored = self.orders.update(order).await?;
        metrics::counter!("orders_cancelled_total").increment(1);

        let stored = self
            .dispatch_and_persist(stored, NotificationKind::Cancelled, now)
            .await?;
        Ok(OrderSummary::project(&stored))
    }

    /// Applies an admin tracking update and syncs the order's status.
    ///
    /// Dispatches the shipped notification once the order reaches `Shipped`.
    #[tracing::instrument(skip(self, update), fields(order_ref = %order_ref))]
    pub async fn update_tracking(
        &self,
        principal: &Principal,
        order_ref: &OrderRef,
        update: TrackingUpdate,
    ) -> Result<OrderSummary> {
        principal.require_admin()?;
        let tracking = Self::validate_tracking(update)?;

        let mut order = self
            .orders
            .find_by_ref(order_ref)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_ref.to_string()))?;
        let now = Utc::now();

        order.apply_tracking(tracking, now);
        let mut stored = self.orders.update(order).await?;

        if stored.status() == OrderStatus::Shipped {
            stored = self
                .dispatch_and_persist(stored, NotificationKind::Shipped, now)
                .await?;
        }

        Ok(OrderSummary::project(&stored))
    }

    /// Public tracking lookup by order reference.
    pub async fn get_tracking(&self, order_ref: &OrderRef) -> Result<Option<TrackingInfo>> {
        let order = self
            .orders
            .find_by_ref(order_ref)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_ref.to_string()))?;
        Ok(order.tracking().cloned())
    }

    /// Refunds a cancelled, gateway-paid order. Admin only.
    ///
    /// An already-refunded order is success without touching the gateway. A
    /// gateway failure marks the refund failed and reports the error.
    #[tracing::instrument(skip(self), fields(order_ref = %order_ref))]
    pub async fn refund_order(
        &self,
        principal: &Principal,
        order_ref: &OrderRef,
    ) -> Result<RefundOutcome> {
        principal.require_admin()?;

        let mut order = self
            .orders
            .find_by_ref(order_ref)
            .await?
            .ok_or_else(|| CheckoutError::OrderNotFound(order_ref.to_string()))?;

        if order.refund_status() == domain::RefundStatus::Refunded {
            return Ok(RefundOutcome::AlreadyRefunded(OrderSummary::project(&order)));
        }
        order.check_refundable()?;

        let payment_id = order
            .gateway_payment_id()
            .ok_or(CheckoutError::Order(OrderError::MissingPaymentReference))?
            .to_string();
        let now = Utc::now();

        match self.gateway.refund(&payment_id, order.total_amount()).await {
            Ok(refund) => {
                order.record_refund(refund.refund_id, now);
                let stored = self.orders.update(order).await?;
                metrics::counter!("refunds_issued_total").increment(1);

                let stored = self
                    .dispatch_and_persist(stored, NotificationKind::Refunded, now)
                    .await?;
                Ok(RefundOutcome::Refunded(OrderSummary::project(&stored)))
            }
            Err(e) => {
                tracing::warn!(order_ref = %order.order_ref(), error = %e, "gateway refund failed");
                order.mark_refund_failed(now);
                self.orders.update(order).await?;
                metrics::counter!("refunds_failed_total").increment(1);
                Err(CheckoutError::Gateway(e))
            }
        }
    }

    /// Loads one order, scoped to the caller. Admins bypass the owner check.
    async fn load(&self, principal: &Principal, order_ref: &OrderRef) -> Result<Order> {
        let order = if principal.is_admin() {
            self.orders.find_by_ref(order_ref).await?
        } else {
            self.orders
                .find_for_user(order_ref, principal.user_id)
                .await?
        };
        order.ok_or_else(|| CheckoutError::OrderNotFound(order_ref.to_string()))
    }

    /// Attempts one notification and persists the flag outcome.
    ///
    /// Runs after the core transition is durable; returns the re-persisted
    /// order.
    async fn dispatch_and_persist(
        &self,
        mut order: Order,
        kind: NotificationKind,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        notification::dispatch(&self.notifier, kind, &mut order, now).await;
        Ok(self.orders.update(order).await?)
    }

    fn validate_tracking(update: TrackingUpdate) -> Result<TrackingInfo> {
        if update.reference_number.is_empty() {
            return Err(CheckoutError::InvalidTracking("reference_number is required"));
        }
        if update.courier_partner.is_empty() {
            return Err(CheckoutError::InvalidTracking("courier_partner is required"));
        }
        if update.tracking_link.is_empty() {
            return Err(CheckoutError::InvalidTracking("tracking_link is required"));
        }
        let status: TrackingStatus = update
            .status
            .parse()
            .map_err(|_: OrderError| CheckoutError::InvalidTracking("unknown tracking status"))?;

        Ok(TrackingInfo {
            reference_number: update.reference_number,
            estimate_date: update.estimate_date,
            courier_partner: update.courier_partner,
            tracking_link: update.tracking_link,
            status,
            updated_at: Utc::now(),
        })
    }
}
