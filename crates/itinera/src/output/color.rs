//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:   green   (healthy checks, applied shifts)
//!   - Warning:   yellow  (dry runs, load warnings)
//!   - Error:     red     (cycles, conflicts)
//!   - Info:      cyan    (segment IDs)
//!   - Accent:    magenta (segment types)
//!   - Muted:     dimmed  (field labels, times)
//!   - Emphasis:  bold    (section headers)

use crate::domain::SegmentType;
use colored::Colorize;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "info" color (cyan) to text.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Colorize a segment ID (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    info(id, config)
}

/// Apply dimmed style to text (for labels/field names).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Segment type name, padded for column alignment and colored.
pub(crate) fn colorize_type(segment_type: SegmentType, config: &OutputConfig) -> String {
    let text = format!("{:<8}", segment_type.to_string());
    if !config.use_colors {
        return text;
    }
    match segment_type {
        SegmentType::Flight | SegmentType::Transfer => text.magenta().bold().to_string(),
        SegmentType::Hotel => text.dimmed().to_string(),
        SegmentType::Meeting | SegmentType::Activity | SegmentType::Custom => {
            text.magenta().to_string()
        }
    }
}

/// Get a type icon for segment types, with ASCII fallback support.
pub(crate) fn type_icon(segment_type: SegmentType, config: &OutputConfig) -> &'static str {
    if config.use_ascii {
        match segment_type {
            SegmentType::Flight => "^",
            SegmentType::Hotel => "H",
            SegmentType::Meeting => "M",
            SegmentType::Activity => "*",
            SegmentType::Transfer => ">",
            SegmentType::Custom => "-",
        }
    } else {
        match segment_type {
            SegmentType::Flight => "✈",
            SegmentType::Hotel => "⌂",
            SegmentType::Meeting => "◆",
            SegmentType::Activity => "★",
            SegmentType::Transfer => "→",
            SegmentType::Custom => "◇",
        }
    }
}

/// Status marker for a passed or failed check.
pub(crate) fn check_mark(ok: bool, config: &OutputConfig) -> String {
    let icon = match (ok, config.use_ascii) {
        (true, true) => "+",
        (true, false) => "✓",
        (false, true) => "x",
        (false, false) => "✗",
    };
    if ok {
        success(icon, config)
    } else {
        error(icon, config)
    }
}
