//! Prelude module - common imports for sigsheet users
//!
//! ```rust
//! use sigsheet::prelude::*;
//! ```

pub use crate::{
    // Engine
    EngineConfig,
    Error,
    Metrics,
    MetricsFetcher,
    Result,
    SheetStore,
    UpdateBatch,
    UpdateBatchAssembler,
    Updater,

    // Building blocks
    ChartType,
    ChartUpdate,
    FormulaCell,
    OffsetPolicy,
    RangeDescriptor,
    TemporalConfig,
    WriteOperation,
};
