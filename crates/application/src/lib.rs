//! Application layer - Use cases and business workflows

pub mod diagnostics;
pub mod model_setup;
pub mod transfer;

pub use diagnostics::{DiagnosticReport, run_diagnostics};
pub use model_setup::{ModelSetupReport, setup_model_files};
pub use transfer::{ExportManifest, ImportOptions, ImportReport, TransferService};
