// Request decoding and policy helpers

pub mod credentials;
pub mod params;
pub mod path;
