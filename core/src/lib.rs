//! Client core for the todo service.
//!
//! # Overview
//! - [`TodoClient`] builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network (host-does-IO).
//! - [`Store`] keeps the client's copy of the list, the filter, and the edit
//!   state, and reconciles them from responses. It never updates ahead of
//!   the service.
//! - [`StoreClient`] drives a `Store` over any [`Transport`].
//!
//! DTOs are defined independently from the server crate; integration tests
//! catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod store;
pub mod sync;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use store::{Action, EditState, Filter, Pending, Store, UnknownFilter};
pub use sync::{StoreClient, Transport};
pub use types::{CreateTodo, Message, Todo, UpdateTodo};
