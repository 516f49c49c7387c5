//! Value objects for the order domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TrackingStatus;

/// Product identifier (SKU).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the product ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Money amount in paise (minor units of INR) to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in paise (e.g., 11800 = ₹118.00)
    paise: i64,
}

impl Money {
    /// Creates a new Money amount from paise.
    pub fn from_paise(paise: i64) -> Self {
        Self { paise }
    }

    /// Creates a new Money amount from a whole-rupee value.
    pub fn from_rupees(rupees: i64) -> Self {
        Self {
            paise: rupees * 100,
        }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { paise: 0 }
    }

    /// Returns the amount in paise.
    pub fn paise(&self) -> i64 {
        self.paise
    }

    /// Returns the rupee portion (whole number).
    pub fn rupees(&self) -> i64 {
        self.paise / 100
    }

    /// Returns the paise portion (remainder after rupees).
    pub fn paise_part(&self) -> i64 {
        self.paise.abs() % 100
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.paise > 0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.paise == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.paise < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            paise: self.paise * quantity as i64,
        }
    }

    /// Returns the negated amount (used for refund history entries).
    pub fn negated(&self) -> Money {
        Money { paise: -self.paise }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.paise < 0 {
            write!(f, "-₹{}.{:02}", self.rupees().abs(), self.paise_part())
        } else {
            write!(f, "₹{}.{:02}", self.rupees(), self.paise_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            paise: self.paise + rhs.paise,
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            paise: self.paise - rhs.paise,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.paise += rhs.paise;
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.paise -= rhs.paise;
    }
}

/// A line item in an order.
///
/// The unit price is a snapshot of the catalog price at order-creation time;
/// later catalog changes never touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The product identifier.
    pub product_id: ProductId,

    /// Human-readable product name.
    pub product_name: String,

    /// Quantity ordered.
    pub quantity: u32,

    /// GST-inclusive price per unit.
    pub unit_price: Money,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(
        product_id: impl Into<ProductId>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this item (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Denormalized shipping-address snapshot embedded in the order.
///
/// Copied at creation, never referenced: edits to the user's address book do
/// not retroactively change a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub line: String,
    pub area: Option<String>,
    pub city: String,
    pub state: String,
    pub postal: String,
}

/// Admin-entered courier metadata attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub reference_number: String,
    pub estimate_date: DateTime<Utc>,
    pub courier_partner: String,
    pub tracking_link: String,
    pub status: TrackingStatus,
    pub updated_at: DateTime<Utc>,
}

impl TrackingInfo {
    /// Returns true if any courier-assignment field is populated.
    ///
    /// A populated tracking record blocks user cancellation.
    pub fn has_details(&self) -> bool {
        !self.reference_number.is_empty()
            || !self.courier_partner.is_empty()
            || !self.tracking_link.is_empty()
    }
}

/// Status recorded on a payment-history entry.
///
/// Wider than the order's own payment status: refunds show up in the audit
/// log as `Refunded` entries with a negative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentEntryStatus {
    Paid,
    Failed,
    Refunded,
}

impl PaymentEntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentEntryStatus::Paid => "Paid",
            PaymentEntryStatus::Failed => "Failed",
            PaymentEntryStatus::Refunded => "Refunded",
        }
    }
}

impl std::fmt::Display for PaymentEntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One append-only entry in the order's payment audit log.
///
/// Entries are facts: never revised, never pruned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub status: PaymentEntryStatus,
    pub provider: String,
    pub amount: Money,
    pub currency: String,
    pub txn_id: Option<String>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The kinds of customer-facing email notifications an order can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    OrderConfirmed,
    Shipped,
    Cancelled,
    Refunded,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::OrderConfirmed => "order-confirmed",
            NotificationKind::Shipped => "shipped",
            NotificationKind::Cancelled => "cancelled",
            NotificationKind::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Delivery state of one notification kind.
///
/// `sent`, once true, is never reset by normal flow; a false flag with a
/// recorded `last_error` marks the notification for a later reconciliation
/// pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotificationFlag {
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl NotificationFlag {
    /// Records a successful delivery.
    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.sent = true;
        self.sent_at = Some(at);
        self.last_error = None;
    }

    /// Records a failed delivery attempt; the flag stays unsent.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }
}

/// Per-order notification flags, one per [`NotificationKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NotificationLog {
    pub order_confirmed: NotificationFlag,
    pub shipped: NotificationFlag,
    pub cancelled: NotificationFlag,
    pub refunded: NotificationFlag,
}

impl NotificationLog {
    /// Returns the flag for a notification kind.
    pub fn flag(&self, kind: NotificationKind) -> &NotificationFlag {
        match kind {
            NotificationKind::OrderConfirmed => &self.order_confirmed,
            NotificationKind::Shipped => &self.shipped,
            NotificationKind::Cancelled => &self.cancelled,
            NotificationKind::Refunded => &self.refunded,
        }
    }

    /// Returns the mutable flag for a notification kind.
    pub fn flag_mut(&mut self, kind: NotificationKind) -> &mut NotificationFlag {
        match kind {
            NotificationKind::OrderConfirmed => &mut self.order_confirmed,
            NotificationKind::Shipped => &mut self.shipped,
            NotificationKind::Cancelled => &mut self.cancelled,
            NotificationKind::Refunded => &mut self.refunded,
        }
    }
}
