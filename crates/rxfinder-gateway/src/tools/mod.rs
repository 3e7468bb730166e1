//! The eight RxNorm lookup operations.
//!
//! Each operation shapes the upstream response its own way; all of them
//! share the envelope convention from `rxfinder_core::tools` and the
//! validation helpers from `crate::validation`.

mod all_related;
mod drug_properties;
mod find_rxcui;
mod history_status;
mod ndc_properties;
mod rxterms_info;
mod search_drugs;
mod spelling_suggestions;

pub use all_related::AllRelatedTool;
pub use drug_properties::DrugPropertiesTool;
pub use find_rxcui::FindRxcuiTool;
pub use history_status::HistoryStatusTool;
pub use ndc_properties::NdcPropertiesTool;
pub use rxterms_info::RxTermsInfoTool;
pub use search_drugs::SearchDrugsTool;
pub use spelling_suggestions::SpellingSuggestionsTool;
