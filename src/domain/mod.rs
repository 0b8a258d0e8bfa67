// Domain layer: declarative records and the entities built from them.

pub mod action;
pub mod api_domain;
pub mod link;
pub mod model;
pub mod resource;
pub mod shape;
