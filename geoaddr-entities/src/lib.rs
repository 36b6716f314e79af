#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # geoaddr-entities
//!
//! Reusable, agnostic domain entities for geoaddr.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod address;
pub mod geo;
pub mod geocode;
pub mod origin;
pub mod sensor;
pub mod zone;
