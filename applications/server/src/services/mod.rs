/// Service modules
pub mod host;
pub mod metadata;

pub use metadata::{InstanceIdentity, InstanceMetadataClient, UNKNOWN};
