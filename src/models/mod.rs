pub mod ack;
pub mod admission;
pub mod college;
pub mod review;
pub mod user;

pub use ack::*;
pub use admission::*;
pub use college::*;
pub use review::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Stored documents sometimes carry `null` where a list is expected.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
