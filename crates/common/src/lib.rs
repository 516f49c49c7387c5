mod types;

pub use types::{AddressId, OrderId, OrderRef, UserId};
