/// Image intake and simulated classification
///
/// This module handles:
/// - File-like inputs and their declared media types
/// - Preview creation and release
/// - The pluggable classification oracle

pub mod oracle;
pub mod preview;
pub mod source;
