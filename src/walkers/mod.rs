// Syntax-tree walkers
//
// One walker per language family. Each dispatches on node kind, asks the
// FeatureMapper about the constructs it recognizes and records
// DetectedFeature entries with document positions.

pub mod base;
pub mod css;
pub mod html;
pub mod javascript;
pub(crate) mod manager;

pub use base::WalkOutput;
pub use manager::WalkerManager;
