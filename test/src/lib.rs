
pub use helpers::*;
pub use test_graph::TestGraph;
