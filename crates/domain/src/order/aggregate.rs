//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{OrderId, OrderRef, UserId};
use serde::{Deserialize, Serialize};

use super::{
    Address, Money, NotificationLog, OrderError, OrderItem, OrderStatus, PaymentEntryStatus,
    PaymentMethod, PaymentRecord, PaymentStatus, RefundStatus, TrackingInfo, pricing,
};

/// Payment provider name recorded on history entries.
const PROVIDER: &str = "Gateway";

/// Currency for all money amounts.
pub const CURRENCY: &str = "INR";

/// Outcome of recording an explicit payment failure event.
///
/// The failure webhook can fire more than once for the same attempt (modal
/// close plus `payment.failed`), so replays must not double-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFailureOutcome {
    /// The failure was recorded and the order cancelled.
    Recorded,

    /// The order is already paid; the event is ignored.
    AlreadyPaid,

    /// The same transaction reference is already recorded as failed.
    Duplicate,
}

/// Order aggregate root.
///
/// A single order document: line-item and address snapshots, the lifecycle
/// status, payment/refund sub-state, the append-only payment audit log, and
/// per-kind notification flags. All mutations go through transition methods
/// which enforce the state machine's guards; the store enforces optimistic
/// concurrency via [`Order::version`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Internal document identifier.
    id: OrderId,

    /// Human-facing order reference, unique and stable.
    order_ref: OrderRef,

    /// Owner of the order.
    user_id: UserId,

    /// Version for optimistic concurrency; bumped by the store on update.
    #[serde(default)]
    version: u64,

    /// Line-item snapshots captured at creation.
    items: Vec<OrderItem>,

    /// Shipping-address snapshot captured at creation.
    address: Address,

    /// GST-inclusive gross total, fixed at creation.
    total_amount: Money,

    status: OrderStatus,
    payment_method: PaymentMethod,
    payment_status: PaymentStatus,

    gateway_order_id: Option<String>,
    gateway_payment_id: Option<String>,
    gateway_signature: Option<String>,

    /// Append-only payment audit log.
    payment_history: Vec<PaymentRecord>,

    refund_status: RefundStatus,
    refund_id: Option<String>,
    refund_initiated_at: Option<DateTime<Utc>>,
    refund_completed_at: Option<DateTime<Utc>>,

    tracking: Option<TrackingInfo>,

    notifications: NotificationLog,

    delivery_note: String,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    confirmed_at: Option<DateTime<Utc>>,
    shipped_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Creates a new pending order from item and address snapshots.
    ///
    /// The gross total is computed here, once; later transitions never
    /// recompute it.
    pub fn create(
        user_id: UserId,
        order_ref: OrderRef,
        items: Vec<OrderItem>,
        address: Address,
        payment_method: PaymentMethod,
        delivery_note: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        for item in &items {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    quantity: item.quantity,
                });
            }
            if !item.unit_price.is_positive() {
                return Err(OrderError::InvalidPrice {
                    price: item.unit_price.paise(),
                });
            }
        }

        let total_amount = pricing::compute_totals(&items).gross_total;

        Ok(Self {
            id: OrderId::new(),
            order_ref,
            user_id,
            version: 0,
            items,
            address,
            total_amount,
            status: OrderStatus::Pending,
            payment_method,
            payment_status: PaymentStatus::Pending,
            gateway_order_id: None,
            gateway_payment_id: None,
            gateway_signature: None,
            payment_history: Vec::new(),
            refund_status: RefundStatus::NotApplicable,
            refund_id: None,
            refund_initiated_at: None,
            refund_completed_at: None,
            tracking: None,
            notifications: NotificationLog::default(),
            delivery_note: delivery_note.into(),
            created_at: now,
            updated_at: now,
            confirmed_at: None,
            shipped_at: None,
            delivered_at: None,
        })
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_ref(&self) -> &OrderRef {
        &self.order_ref
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sets the concurrency version. Called by the store after a successful
    /// insert or update.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn gateway_order_id(&self) -> Option<&str> {
        self.gateway_order_id.as_deref()
    }

    pub fn gateway_payment_id(&self) -> Option<&str> {
        self.gateway_payment_id.as_deref()
    }

    pub fn payment_history(&self) -> &[PaymentRecord] {
        &self.payment_history
    }

    pub fn refund_status(&self) -> RefundStatus {
        self.refund_status
    }

    pub fn refund_id(&self) -> Option<&str> {
        self.refund_id.as_deref()
    }

    pub fn refund_initiated_at(&self) -> Option<DateTime<Utc>> {
        self.refund_initiated_at
    }

    pub fn refund_completed_at(&self) -> Option<DateTime<Utc>> {
        self.refund_completed_at
    }

    pub fn tracking(&self) -> Option<&TrackingInfo> {
        self.tracking.as_ref()
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    /// Mutable notification flags; used by the dispatcher to record send
    /// outcomes after the core transition has been persisted.
    pub fn notifications_mut(&mut self) -> &mut NotificationLog {
        &mut self.notifications
    }

    pub fn delivery_note(&self) -> &str {
        &self.delivery_note
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    pub fn shipped_at(&self) -> Option<DateTime<Utc>> {
        self.shipped_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    /// Returns true if this order was paid through the gateway.
    pub fn is_gateway_paid(&self) -> bool {
        self.payment_method == PaymentMethod::Gateway
            && self.payment_status == PaymentStatus::Paid
    }

    /// Returns true if a courier has been assigned (any tracking field
    /// populated).
    pub fn has_tracking_details(&self) -> bool {
        self.tracking.as_ref().is_some_and(|t| t.has_details())
    }
}

// Transition methods
impl Order {
    /// Applies a status explicitly (admin/user status update path).
    ///
    /// Lifecycle timestamps are stamped at most once; the first transition
    /// into a status wins, replays keep the original stamp.
    pub fn apply_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.stamp_lifecycle(status, now);
        self.updated_at = now;
    }

    fn stamp_lifecycle(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        match status {
            OrderStatus::Confirmed if self.confirmed_at.is_none() => {
                self.confirmed_at = Some(now);
            }
            OrderStatus::Shipped if self.shipped_at.is_none() => {
                self.shipped_at = Some(now);
            }
            OrderStatus::Delivered if self.delivered_at.is_none() => {
                self.delivered_at = Some(now);
            }
            _ => {}
        }
    }

    /// Updates the payment method (COD confirmation path).
    pub fn set_payment_method(&mut self, method: PaymentMethod, now: DateTime<Utc>) {
        self.payment_method = method;
        self.updated_at = now;
    }

    /// Replaces the delivery note.
    pub fn set_delivery_note(&mut self, note: impl Into<String>, now: DateTime<Utc>) {
        self.delivery_note = note.into();
        self.updated_at = now;
    }

    /// Binds a freshly created gateway intent to this order.
    pub fn bind_gateway_intent(&mut self, gateway_order_id: impl Into<String>, now: DateTime<Utc>) {
        self.gateway_order_id = Some(gateway_order_id.into());
        self.payment_method = PaymentMethod::Gateway;
        self.payment_status = PaymentStatus::Pending;
        self.updated_at = now;
    }

    /// Records a successfully verified gateway payment.
    ///
    /// Marks the order paid, promotes `Pending` to `Confirmed`, and appends
    /// a `Paid` audit entry. Returns false when the same payment is already
    /// recorded (duplicate callback), in which case nothing changes.
    pub fn record_payment_verified(
        &mut self,
        gateway_order_id: impl Into<String>,
        payment_id: impl Into<String>,
        signature: impl Into<String>,
        now: DateTime<Utc>,
    ) -> bool {
        let payment_id = payment_id.into();

        let already_recorded = self.payment_status == PaymentStatus::Paid
            && self.payment_history.iter().any(|entry| {
                entry.status == PaymentEntryStatus::Paid
                    && entry.txn_id.as_deref() == Some(payment_id.as_str())
            });
        if already_recorded {
            return false;
        }

        self.payment_status = PaymentStatus::Paid;
        self.payment_method = PaymentMethod::Gateway;
        self.gateway_order_id = Some(gateway_order_id.into());
        self.gateway_signature = Some(signature.into());
        self.gateway_payment_id = Some(payment_id.clone());
        if self.status == OrderStatus::Pending {
            self.apply_status(OrderStatus::Confirmed, now);
        }
        self.push_history(PaymentEntryStatus::Paid, self.total_amount, Some(payment_id), None, now);
        self.updated_at = now;
        true
    }

    /// Records a callback whose signature did not verify.
    ///
    /// The payment is marked failed and audited, but the order status is
    /// left untouched: a forged callback must not cancel a legitimate
    /// pending order.
    pub fn record_signature_mismatch(&mut self, payment_id: impl Into<String>, now: DateTime<Utc>) {
        self.payment_status = PaymentStatus::Failed;
        self.push_history(
            PaymentEntryStatus::Failed,
            self.total_amount,
            Some(payment_id.into()),
            Some("Invalid payment signature".to_string()),
            now,
        );
        self.updated_at = now;
    }

    /// Records an explicit payment failure/cancel event from the gateway.
    ///
    /// Idempotent when the order is already paid, and deduplicated by
    /// transaction reference against existing failed entries.
    pub fn record_payment_failure(
        &mut self,
        txn_ref: Option<String>,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> PaymentFailureOutcome {
        if self.payment_status == PaymentStatus::Paid {
            return PaymentFailureOutcome::AlreadyPaid;
        }

        let already_failed = self.payment_status == PaymentStatus::Failed
            || self.status == OrderStatus::Cancelled;
        let duplicate_txn = txn_ref.as_deref().is_some_and(|txn| {
            self.payment_history.iter().any(|entry| {
                entry.status == PaymentEntryStatus::Failed && entry.txn_id.as_deref() == Some(txn)
            })
        });
        if already_failed && duplicate_txn {
            return PaymentFailureOutcome::Duplicate;
        }

        self.payment_status = PaymentStatus::Failed;
        self.status = OrderStatus::Cancelled;
        self.payment_method = PaymentMethod::Gateway;
        self.refund_status = RefundStatus::NotApplicable;
        let txn_id = txn_ref.unwrap_or_else(|| format!("gw-fail-{}", now.timestamp_millis()));
        self.push_history(
            PaymentEntryStatus::Failed,
            self.total_amount,
            Some(txn_id),
            Some(reason.unwrap_or_else(|| "Payment cancelled/failed".to_string())),
            now,
        );
        self.updated_at = now;
        PaymentFailureOutcome::Recorded
    }

    /// Cancels the order on the customer's request.
    ///
    /// Allowed only while the status is exactly `Confirmed` and no courier
    /// has been assigned. Gateway-paid orders move to refund-pending.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), OrderError> {
        if self.status != OrderStatus::Confirmed {
            return Err(OrderError::InvalidStateTransition {
                current_status: self.status,
                action: "cancel",
            });
        }
        if self.has_tracking_details() {
            return Err(OrderError::TrackingAlreadyAssigned);
        }

        self.status = OrderStatus::Cancelled;
        self.refund_status = if self.is_gateway_paid() {
            RefundStatus::Pending
        } else {
            RefundStatus::NotApplicable
        };
        self.updated_at = now;
        Ok(())
    }

    /// Applies an admin tracking update and syncs the coarse order status.
    ///
    /// The tracking-to-status mapping is one-directional and idempotent:
    /// replaying the same update leaves the status unchanged.
    pub fn apply_tracking(&mut self, tracking: TrackingInfo, now: DateTime<Utc>) {
        if let Some(next) = tracking.status.order_status_for(self.status) {
            self.apply_status(next, now);
        }
        self.tracking = Some(tracking);
        self.updated_at = now;
    }

    /// Checks the refund guards without mutating anything.
    pub fn check_refundable(&self) -> Result<(), OrderError> {
        if self.payment_method != PaymentMethod::Gateway
            || self.payment_status != PaymentStatus::Paid
        {
            return Err(OrderError::RefundNotApplicable);
        }
        if self.status != OrderStatus::Cancelled {
            return Err(OrderError::InvalidStateTransition {
                current_status: self.status,
                action: "refund",
            });
        }
        if self.gateway_payment_id.is_none() {
            return Err(OrderError::MissingPaymentReference);
        }
        Ok(())
    }

    /// Records a refund issued at the gateway.
    ///
    /// Stamps both refund timestamps and appends a negative-amount audit
    /// entry.
    pub fn record_refund(&mut self, refund_id: impl Into<String>, now: DateTime<Utc>) {
        let refund_id = refund_id.into();
        self.refund_status = RefundStatus::Refunded;
        self.refund_id = Some(refund_id.clone());
        self.refund_initiated_at = Some(now);
        self.refund_completed_at = Some(now);
        self.push_history(
            PaymentEntryStatus::Refunded,
            self.total_amount.negated(),
            Some(refund_id),
            None,
            now,
        );
        self.updated_at = now;
    }

    /// Marks the refund as failed at the gateway. No audit entry: the
    /// gateway never processed anything.
    pub fn mark_refund_failed(&mut self, now: DateTime<Utc>) {
        self.refund_status = RefundStatus::Failed;
        self.updated_at = now;
    }

    fn push_history(
        &mut self,
        status: PaymentEntryStatus,
        amount: Money,
        txn_id: Option<String>,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.payment_history.push(PaymentRecord {
            status,
            provider: PROVIDER.to_string(),
            amount,
            currency: CURRENCY.to_string(),
            txn_id,
            reason,
            created_at: now,
        });
    }
}
