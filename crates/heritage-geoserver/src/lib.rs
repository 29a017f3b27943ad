//! GeoServer access for the heritage viewer: a raw passthrough for the map
//! client, plus the WFS capabilities and province lookups the layer panel
//! needs.

pub mod capabilities;
pub mod client;
pub mod error;
pub mod wfs;

pub use capabilities::parse_feature_type_names;
pub use client::{GeoServerClient, Passthrough};
pub use error::GeoServerError;
pub use wfs::{distinct_feature_names, escape_cql_literal, ADMIN1_LAYER};
