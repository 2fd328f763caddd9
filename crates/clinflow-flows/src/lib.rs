//! clinflow Flows
//!
//! The clinical reporting workflows, declared through the graph builder.
//!
//! Every flow starts from an SDTM dataset snapshot and produces ADaM
//! datasets; some go on to produce TFL (tables, figures, listings) reports
//! from a metadata snapshot, and the QC variants run an independent
//! double-programming track next to production. The jobs themselves are SAS
//! programs and small transfer scripts in the project; the flows only name
//! them.
//!
//! | id | workflow |
//! |---|---|
//! | `flow_1` | `ADaM_only` |
//! | `flow_2` | `ADaM_TFL` |
//! | `flow_3` | `ADaM_only_QC` |
//! | `flow_4` | `ADaM_TFL_QC` |
//! | `flow_5` | `SDTM_ADaM_TFL` |
//! | `dev/flow_5_all_SDTM` | `SDTM_ADaM_TFL` (every SDTM domain, cached) |

mod adam;
mod catalog;
mod defaults;
mod error;
mod flows;
mod sdtm;
mod tfl;

pub use catalog::{Catalog, FlowEntry};
pub use defaults::FlowDefaults;
pub use error::CatalogError;
