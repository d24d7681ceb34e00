pub mod authorizer;
pub mod service;
pub mod view;
