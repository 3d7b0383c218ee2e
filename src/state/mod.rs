//! Client-side state protocol: the filter store and its synchronizer, the
//! search debounce timer and the optimistic mutation state machines.

pub mod debounce;
pub mod favourite;
pub mod notification;
pub mod optimistic;
pub mod store;
pub mod synchronizer;
