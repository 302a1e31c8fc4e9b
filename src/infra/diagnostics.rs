//! Labeled diagnostics for manual blueprints that fail to parse.

use miette::{Diagnostic, NamedSource, SourceSpan};

#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("manual blueprint is not valid JSON: {reason}")]
#[diagnostic(
    code(wpbp::invalid_json),
    help("fix the JSON or run `wpbp reset`; the launch URL keeps its last valid value meanwhile")
)]
pub struct InvalidJson
{
    pub reason: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("parsing stopped here")]
    pub at: SourceSpan,
}

/// Build a report pointing at the first JSON syntax error in `text`.
pub fn invalid_json_report(text: &str) -> miette::Report
{
    let (reason, offset) = match serde_json::from_str::<serde_json::Value>(text)
    {
        Ok(_) => ("no syntax error found".to_string(), 0),
        Err(e) => (e.to_string(), byte_offset(text, e.line(), e.column())),
    };

    let len = usize::from(offset < text.len());
    miette::Report::new(InvalidJson {
        reason,
        src: NamedSource::new("blueprint.json", text.to_string()),
        at: SourceSpan::from((offset, len)),
    })
}

/// serde_json reports 1-based line and column; map them to a byte offset.
fn byte_offset(
    text: &str,
    line: usize,
    column: usize,
) -> usize
{
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(text.len());
    while !text.is_char_boundary(offset)
    {
        offset -= 1;
    }
    offset
}
