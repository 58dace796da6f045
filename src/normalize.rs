use crate::{Diagnostic, DiagnosticSink};

/// Invisible and directional format code points that spreadsheet-sourced
/// text tends to smuggle in. Stripped from every rule and keyword string
/// before parsing or matching.
const INVISIBLE_CHARS: [char; 16] = [
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{200E}', // left-to-right mark
    '\u{200F}', // right-to-left mark
    '\u{202A}', // left-to-right embedding
    '\u{202B}', // right-to-left embedding
    '\u{202C}', // pop directional formatting
    '\u{202D}', // left-to-right override
    '\u{202E}', // right-to-left override
    '\u{2060}', // word joiner
    '\u{2061}', // function application
    '\u{2062}', // invisible times
    '\u{2063}', // invisible separator
    '\u{2064}', // invisible plus
    '\u{FEFF}', // zero width no-break space (BOM)
];

/// Strip invisible format characters, report the removal through the sink,
/// then trim surrounding whitespace. Idempotent.
#[must_use]
pub fn clean(text: &str, sink: &dyn DiagnosticSink) -> String {
    let cleaned: String = text.chars().filter(|c| !INVISIBLE_CHARS.contains(c)).collect();
    let removed = text.chars().count() - cleaned.chars().count();
    if removed > 0 {
        sink.report(&Diagnostic::InvisibleCharsRemoved {
            before: text.to_owned(),
            after: cleaned.clone(),
            removed,
        });
    }
    cleaned.trim().to_owned()
}
