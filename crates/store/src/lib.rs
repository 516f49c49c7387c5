//! Persistence boundary for the order/payment core.
//!
//! Orders, products, carts, and saved addresses live behind async traits so
//! the state machine stays ignorant of the storage engine's query mechanics.
//! The in-memory implementations back the test suite and model the same
//! optimistic-concurrency contract a real document store provides.

pub mod address;
pub mod cart;
pub mod error;
pub mod memory;
pub mod order;
pub mod product;

pub use address::{AddressStore, SavedAddress};
pub use cart::{Cart, CartLine, CartStore};
pub use error::{Result, StoreError};
pub use memory::{
    InMemoryAddressStore, InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore,
};
pub use order::OrderStore;
pub use product::{ProductRecord, ProductStore};
