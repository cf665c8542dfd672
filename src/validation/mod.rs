//! Registration-time validation of authored quest content

pub mod definition;

pub use definition::{load_definitions, parse_definition, DefinitionError, WaypointDefinition};
