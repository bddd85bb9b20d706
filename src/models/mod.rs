pub mod batch;
pub mod dialog;
pub mod loaders;
pub mod metadata;
pub mod run_state;
pub mod visual_item;

pub use batch::Batch;
pub use dialog::Dialog;
pub use loaders::{load_manifest, parse_manifest, Manifest};
pub use metadata::{ComponentMetadata, ReportMetadata};
pub use run_state::{FailureReason, Phase, ProgressSnapshot, RunState};
pub use visual_item::{validate_items, ItemOverrides, RenderSource, VisualItem};
