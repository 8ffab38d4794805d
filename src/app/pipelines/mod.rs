pub mod roster_pipeline;
pub mod sizes_pipeline;
pub mod summary_pipeline;
pub mod voa_pipeline;

pub use roster_pipeline::{RosterKind, RosterPipeline};
pub use sizes_pipeline::SizesPipeline;
pub use summary_pipeline::SummaryPipeline;
pub use voa_pipeline::VoaPipeline;
