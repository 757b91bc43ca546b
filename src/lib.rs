//! Core library for the ispiri-tools command line application.
//!
//! The library reshapes "new" report workbooks so their column layout matches
//! a base report. Responsibilities are kept narrow: IO adapters live under
//! [`ispiri::tools::io`], the in-memory tables inside [`ispiri::tools::model`],
//! header matching in [`ispiri::tools::schema`] and [`ispiri::tools::reconcile`],
//! and the per-file and per-folder orchestration under
//! [`ispiri::tools::standardize`] and [`ispiri::tools::batch`].

pub mod ispiri;

pub use ispiri::tools::{
    Result, ToolError, batch, config, error, io, labels, model, prompt, reconcile, schema,
    standardize,
};
