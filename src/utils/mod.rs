mod serialize_rfc3339;

pub use serialize_rfc3339::*;
