pub mod builtin;
pub mod component_kind;
