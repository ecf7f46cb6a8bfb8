//! CLI output formatting for every subcommand.
//!
//! # Output Format
//!
//! ## Frame
//!
//! ```text
//! IMG_0042.jpg (4000×3000)
//!     Style: white
//!     Title: Acme  X1
//!     Detail: 50mm  f/1.8  1/200s  ISO400
//!     Saved: processed-frame.jpeg (4200×3950, 2.4 MB)
//! ```
//!
//! ## Caption
//!
//! ```text
//! Acme  X1
//! 50mm  f/1.8  1/200s  ISO400
//! ```
//!
//! Empty lines are printed as empty lines so the output is always exactly two
//! lines and scripts can `read` them positionally.
//!
//! ## Metadata
//!
//! Pretty-printed JSON of the tag map, or `{"Make": "No Exif"}` when the
//! photo has none.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::caption::Caption;
use crate::imaging::{FrameStyle, compute_layout};
use crate::metadata::MetadataMap;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable byte count.
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Show empty caption lines explicitly in summaries.
fn or_empty(text: &str) -> &str {
    if text.is_empty() { "(empty)" } else { text }
}

/// Everything the `frame` command reports after writing a file.
#[derive(Debug, Clone)]
pub struct FrameSummary<'a> {
    pub input: &'a Path,
    pub source_dimensions: (u32, u32),
    pub style: FrameStyle,
    pub caption: &'a Caption,
    pub output: &'a Path,
    pub bytes: usize,
}

pub fn format_frame_output(summary: &FrameSummary<'_>) -> Vec<String> {
    let (w, h) = summary.source_dimensions;
    let layout = compute_layout(w, h);
    let name = summary
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| summary.input.display().to_string());

    vec![
        format!("{name} ({w}×{h})"),
        format!("{}Style: {}", indent(1), summary.style),
        format!("{}Title: {}", indent(1), or_empty(&summary.caption.title)),
        format!("{}Detail: {}", indent(1), or_empty(&summary.caption.detail)),
        format!(
            "{}Saved: {} ({}×{}, {})",
            indent(1),
            summary.output.display(),
            layout.canvas_width,
            layout.canvas_height,
            format_size(summary.bytes)
        ),
    ]
}

pub fn print_frame_output(summary: &FrameSummary<'_>) {
    for line in format_frame_output(summary) {
        println!("{}", line);
    }
}

pub fn format_caption_output(caption: &Caption) -> Vec<String> {
    vec![caption.title.clone(), caption.detail.clone()]
}

pub fn print_caption_output(caption: &Caption) {
    for line in format_caption_output(caption) {
        println!("{}", line);
    }
}

/// Pretty JSON for the metadata panel, with the placeholder when empty.
pub fn format_metadata_output(metadata: &MetadataMap) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&metadata.or_placeholder())
}

pub fn print_metadata_output(metadata: &MetadataMap) -> Result<(), serde_json::Error> {
    println!("{}", format_metadata_output(metadata)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::acme_metadata;

    #[test]
    fn frame_output_lists_caption_and_destination() {
        let caption = Caption::new("Acme  X1", "50mm  f/1.8  1/200s  ISO400");
        let lines = format_frame_output(&FrameSummary {
            input: Path::new("/photos/IMG_0042.jpg"),
            source_dimensions: (4000, 3000),
            style: FrameStyle::White,
            caption: &caption,
            output: Path::new("processed-frame.jpeg"),
            bytes: 2_500_000,
        });

        assert_eq!(
            lines,
            vec![
                "IMG_0042.jpg (4000×3000)",
                "    Style: white",
                "    Title: Acme  X1",
                "    Detail: 50mm  f/1.8  1/200s  ISO400",
                "    Saved: processed-frame.jpeg (4200×3950, 2.4 MB)",
            ]
        );
    }

    #[test]
    fn frame_output_marks_empty_caption_lines() {
        let caption = Caption::default();
        let lines = format_frame_output(&FrameSummary {
            input: Path::new("scan.png"),
            source_dimensions: (200, 100),
            style: FrameStyle::Black,
            caption: &caption,
            output: Path::new("out.jpg"),
            bytes: 512,
        });
        assert_eq!(lines[1], "    Style: black");
        assert_eq!(lines[2], "    Title: (empty)");
        assert_eq!(lines[3], "    Detail: (empty)");
        assert_eq!(lines[4], "    Saved: out.jpg (210×135, 512 B)");
    }

    #[test]
    fn caption_output_is_always_two_lines() {
        assert_eq!(
            format_caption_output(&Caption::new("Acme  X1", "")),
            vec!["Acme  X1", ""]
        );
        assert_eq!(format_caption_output(&Caption::default()).len(), 2);
    }

    #[test]
    fn metadata_output_is_pretty_json() {
        let json = format_metadata_output(&acme_metadata()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Make"], "Acme");
        assert_eq!(value["ISOSpeedRatings"], 400.0);
        assert!(json.contains('\n'));
    }

    #[test]
    fn metadata_output_uses_placeholder_when_empty() {
        let json = format_metadata_output(&MetadataMap::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!({ "Make": "No Exif" }));
    }

    #[test]
    fn size_formatting() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
