pub mod store;
pub use store::{EntityStore, ListFilter, Store, UserStore};
pub mod memory;
pub use memory::MemoryStore;
pub mod pg_store;
pub use pg_store::PgStore;

mod appointment_repo;
mod business_repo;
mod customer_repo;
mod service_repo;
mod staff_repo;
mod user_repo;
