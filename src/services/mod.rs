//! Pure helpers shared by the store-facing services and the HTTP layers.
//! Nothing in here touches the database or the network.

pub mod paging;
pub mod tag_color;
