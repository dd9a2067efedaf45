//! Pure data structures. [`Order`] and [`Connection`] are stored by
//! [`ResourceActor`](actor_framework::ResourceActor)s; [`Notification`] is what clients receive.

pub mod connection;
pub mod ids;
pub mod notification;
pub mod order;

pub use connection::*;
pub use ids::*;
pub use notification::*;
pub use order::*;
