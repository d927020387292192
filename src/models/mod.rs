// Wire types for the HTTP surface

pub mod responses;

pub use responses::*;
