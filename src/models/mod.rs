pub mod addon;
pub mod record;

pub use addon::InstalledAddon;
pub use record::{AddonExtra, ApplicationRecord};
