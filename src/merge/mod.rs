pub mod classifier;
pub mod topology;
pub mod resolver;
pub mod merger;

pub use classifier::FlowNodeClassifier;
pub use merger::{FlowMerger, MergeDecision};
pub use resolver::TokenResolver;
pub use topology::{TopologyShape, TransitionTopology};
