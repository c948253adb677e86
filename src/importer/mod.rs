// ==========================================
// Trade Import - Importer Core
// ==========================================

pub mod alias_table;
pub mod cancel;
pub mod error;
pub mod file_parser;
pub mod header_mapper;
pub mod normalizer;
pub mod orchestrator;
pub mod resolver;
pub mod row_canonicalizer;

pub use alias_table::TableAliasMap;
pub use cancel::CancellationToken;
pub use error::{ImportError, ImportResult};
pub use file_parser::{parse_object, FileFormat, ParsedFile};
pub use header_mapper::{
    map_headers_to_canonical, preview_header_mapping, HeaderMapping, HeaderPreview,
};
pub use normalizer::normalize;
pub use orchestrator::{ImportOrchestrator, JobRequest, JobSummary};
pub use resolver::AliasResolver;
pub use row_canonicalizer::{DroppedColumnSink, RowCanonicalizer};
