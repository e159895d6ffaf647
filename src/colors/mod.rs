//! Color identifiers, their per theme type defaults and how they resolve.

mod registry;
mod resolve;
mod standard;
mod value;

pub use registry::{ColorContribution, ColorRegistry, SchemaChange, SubscriptionId};
pub use resolve::{
    MAX_REFERENCE_DEPTH, custom, darken, less_prominent, lighten, one_of, resolve_color_value,
    transparent,
};
pub use standard::*;
pub use value::{ColorDefaults, ColorFn, ColorValue, DerivedColor};
