pub mod collector;
pub mod provider;
pub mod system;
pub mod worker;

#[cfg(test)]
pub mod mock;

pub use collector::SnapshotCollector;
pub use system::SysinfoProvider;
pub use worker::{CollectEvent, CollectRequest, CollectorHandle};
