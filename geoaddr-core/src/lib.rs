pub mod avatar;
pub mod gateways;
pub mod usecases;

pub mod entities {
    pub use geoaddr_entities::{address::*, geo::*, geocode::*, origin::*, sensor::*, zone::*};
}
