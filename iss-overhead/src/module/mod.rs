///! Lookup stages and the pipeline that chains them

pub mod response;
pub mod ip;
pub mod geo;
pub mod pass;
pub mod pipeline;

pub use geo::{GeoClient, GeoLookup};
pub use ip::{IpEchoClient, IpLookup};
pub use pass::{PassClient, PassLookup};
pub use pipeline::PassPipeline;
