//! convoprint: export a rendered chat conversation to a print-ready PDF
//!
//! The pipeline pairs question/answer nodes from a rendered conversation
//! page, sanitizes each pair's markup into a minimal style contract,
//! isolates right-to-left text runs, coordinates math-typesetting and
//! code-highlighting passes, and hands the assembled tree to a
//! headless-Chromium document renderer.

pub mod assemble;
pub mod bidi;
pub mod config;
pub mod enhance;
pub mod error;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod sanitize;
pub mod source;
pub mod utils;

pub use assemble::{DocumentTree, assemble};
pub use bidi::{BidiPolicy, BidiRun};
pub use config::ExportConfig;
pub use enhance::{
    CodeHighlighter, MathConfig, MathJaxTypesetter, MathTypesetter, SyntectHighlighter,
};
pub use error::{ExportError, ExportResult};
pub use export::{ChromiumRenderer, DocumentRenderer, ExportSummary, PdfSettings};
pub use extract::{ConversationPair, extract_pairs};
pub use pipeline::ExportProgress;
pub use sanitize::Sanitizer;
pub use source::ConversationSource;

/// Run one export with progress reported through the log.
pub async fn export(config: ExportConfig) -> ExportResult<ExportSummary> {
    export_with_progress(config, |progress| log::info!("{progress}")).await
}

/// Run one export, delivering progress updates to the given callback.
pub async fn export_with_progress(
    config: ExportConfig,
    on_progress: impl Fn(ExportProgress) + Send + Sync,
) -> ExportResult<ExportSummary> {
    pipeline::run(&config, &on_progress).await
}
