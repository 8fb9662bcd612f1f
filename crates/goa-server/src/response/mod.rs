//! Response configuration and shaping
//!
//! The state machine over {content, format, view}: closed enumerations with
//! named narrowing subsets, the per-request `ResponseConfiguration`, the
//! payload union with its serialization contract, and the table view.

pub mod configuration;
pub mod payload;
pub mod records;
pub mod table;

pub use configuration::{
    ContentSubset, FormatSubset, ResponseConfiguration, ResponseContent, ResponseFormat,
    ResponseView,
};
pub use payload::{PayloadKind, RecordResponse, RequestEcho, ResponseData};
pub use records::{
    AssociationRecord, CellType, FieldSpec, IntervalRecord, RowModel, TrackRecord, VariantRecord,
};
pub use table::TableView;
