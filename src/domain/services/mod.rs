pub mod allocator;
pub mod classifier;
pub mod distributor;
pub mod fields;
pub mod size_parser;

pub use allocator::{allocate_numbers, Allocation, UsedNumbers};
pub use classifier::{category_flags, ClassifierRule, RuleClassifier};
pub use distributor::{distribute, split_evenly, DesignSelection};
pub use size_parser::SizeParser;
