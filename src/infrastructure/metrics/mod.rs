pub mod noop;
pub mod prometheus;

// Re-export the factory functions for easy access
pub use noop::{create_consumer as create_noop_consumer, create_publisher as create_noop_publisher};
pub use prometheus::{
    create_consumer as create_prom_consumer, create_publisher as create_prom_publisher,
};
