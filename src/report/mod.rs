/// Caller-side presentation of an evaluation: formatted fields with
/// placeholders, plus the summary and caption sentences.
pub mod format;
pub mod summary;
