pub(crate) mod error_mapper;
pub(crate) mod router_ext;
pub(crate) mod templates;

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
