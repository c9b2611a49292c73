//! Services Layer
//!
//! Business logic of the scraper, called by the batch entry point.
//!
//! # Architecture
//!
//! ```text
//! SymbolSource --> SymbolService ──┐
//!                                  ├──> BatchService --> RecordSink
//! PageFetcher  --> ExtractionService ┘
//! ```
//!
//! # Services
//!
//! - `SymbolService` - Download and decode the symbol list
//! - `ExtractionService` - Fetch, parse and assemble one stock record
//! - `BatchService` - Run the pipeline over the whole list

pub mod batch_service;
pub mod extraction_service;
pub mod symbol_service;

pub use batch_service::{BatchService, BatchSummary, FailureStage, SymbolFailure};
pub use extraction_service::ExtractionService;
pub use symbol_service::SymbolService;
