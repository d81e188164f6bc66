#![allow(missing_docs, dead_code)]
#![allow(clippy::needless_raw_string_hashes)]

use core::fmt::Write;

use jsonstep::Event;

pub const DOCUMENT: &str = r#"
{
    "service": "ingest",
    "retries": 3,
    "backoff": 1.5e0,
    "hosts": ["a.example", "b.example"],
    "tls": {"enabled": true, "ca": null},
    "tags": []
}"#;

// The compact form of DOCUMENT, cut inside strings, numbers and literals and
// right at structural seams.
#[rustfmt::skip]
pub const CHUNKS: [&str; 9] = [
    r#"{"service":"ing"#,           // inside a string value
    r#"est","retries":"#,           // string end -> key -> colon
    r#"3"#,                         // number with no boundary yet
    r#","backoff":1."#,             // comma ends the number; next one stops at '.'
    r#"5e0,"hosts":["a.ex"#,        // exponent, then into an array string
    r#"ample","b.example"]"#,       // string -> string -> array end
    r#","tls":{"enabled":tr"#,      // inside a literal
    r#"ue,"ca":nu"#,                // literal end -> key -> literal
    r#"ll},"tags":[]}"#,            // object end -> empty array -> document end
];

/// One event per line, in `Debug` form.
pub fn render(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        writeln!(out, "{event:?}").unwrap();
    }
    out
}

#[test]
fn chunks_are_the_compact_document() {
    let compact: String = DOCUMENT.split_whitespace().collect();
    assert_eq!(CHUNKS.join(""), compact);
}
