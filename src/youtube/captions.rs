//! Timedtext XML decoding.
//!
//! YouTube serves caption tracks as:
//!
//! ```xml
//! <transcript>
//!   <text start="0.32" dur="2.4">Hey &amp;#39;there&amp;#39;</text>
//! </transcript>
//! ```
//!
//! Cue content is escaped twice (once for XML, once for HTML) and may carry formatting tags
//! such as `<i>` or `<font>`, which we drop once both layers are decoded. Self-closing
//! `<text/>` elements carry no cue and are skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::transcript::Snippet;

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)")
        .expect("text element pattern must compile")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#)
        .expect("attribute pattern must compile")
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<[^>]*>").expect("html tag pattern must compile"));

/// Parse a timedtext document into snippets, keeping document order.
///
/// Elements with no content are skipped. A missing `dur` is treated as zero; a missing or
/// malformed `start` is reported as an error message.
pub fn parse(xml: &str) -> Result<Vec<Snippet>, String> {
    let mut snippets = Vec::new();

    for caps in TEXT_ELEMENT.captures_iter(xml) {
        let raw = caps.get(2).map_or("", |m| m.as_str());
        if raw.is_empty() {
            continue;
        }

        let attrs = &caps[1];
        let start = attribute(attrs, "start")
            .ok_or_else(|| "text element without a start attribute".to_owned())?
            .parse::<f64>()
            .map_err(|err| format!("invalid start attribute: {err}"))?;
        let duration = match attribute(attrs, "dur") {
            Some(dur) => dur
                .parse::<f64>()
                .map_err(|err| format!("invalid dur attribute: {err}"))?,
            None => 0.0,
        };

        snippets.push(Snippet {
            text: decode_text(raw),
            start,
            duration,
        });
    }

    Ok(snippets)
}

fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

fn decode_text(raw: &str) -> String {
    let xml_decoded = html_escape::decode_html_entities(raw);
    let html_decoded = html_escape::decode_html_entities(&xml_decoded);
    HTML_TAG.replace_all(&html_decoded, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cues_in_order() -> Result<(), String> {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript>
            <text start="0.32" dur="2.4">Hey there</text>
            <text start="2.72" dur="1.005">how are you</text>
        </transcript>"#;

        let snippets = parse(xml)?;
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].text, "Hey there");
        assert_eq!(snippets[0].start, 0.32);
        assert_eq!(snippets[0].duration, 2.4);
        assert_eq!(snippets[1].text, "how are you");
        assert_eq!(snippets[1].duration, 1.005);
        Ok(())
    }

    #[test]
    fn decodes_double_escaped_entities() -> Result<(), String> {
        let xml = r#"<transcript><text start="1" dur="1">it&amp;#39;s &amp;quot;fine&amp;quot; &amp;amp; ok</text></transcript>"#;

        let snippets = parse(xml)?;
        assert_eq!(snippets[0].text, r#"it's "fine" & ok"#);
        Ok(())
    }

    #[test]
    fn strips_formatting_tags() -> Result<(), String> {
        let xml = r##"<transcript><text start="1" dur="1">&lt;i&gt;la la&lt;/i&gt; &lt;font color="#E5E5E5"&gt;song&lt;/font&gt;</text></transcript>"##;

        let snippets = parse(xml)?;
        assert_eq!(snippets[0].text, "la la song");
        Ok(())
    }

    #[test]
    fn strips_tags_hidden_behind_both_escape_layers() -> Result<(), String> {
        let xml = r#"<transcript><text start="1" dur="1">&amp;lt;i&amp;gt;hi&amp;lt;/i&amp;gt; there</text></transcript>"#;

        let snippets = parse(xml)?;
        assert_eq!(snippets[0].text, "hi there");
        Ok(())
    }

    #[test]
    fn self_closing_elements_do_not_swallow_the_next_cue() -> Result<(), String> {
        let xml = r#"<transcript><text start="0" dur="1"/><text start="1.5" dur="2">hello</text><text start="4" dur="0.5" /></transcript>"#;

        let snippets = parse(xml)?;
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "hello");
        assert_eq!(snippets[0].start, 1.5);
        assert_eq!(snippets[0].duration, 2.0);
        Ok(())
    }

    #[test]
    fn keeps_multiline_text() -> Result<(), String> {
        let xml = "<transcript><text start=\"1\" dur=\"2\">first line\nsecond line</text></transcript>";

        let snippets = parse(xml)?;
        assert_eq!(snippets[0].text, "first line\nsecond line");
        Ok(())
    }

    #[test]
    fn skips_empty_elements_and_defaults_duration() -> Result<(), String> {
        let xml = r#"<transcript><text start="0" dur="1"></text><text start="5.5">tail</text></transcript>"#;

        let snippets = parse(xml)?;
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "tail");
        assert_eq!(snippets[0].start, 5.5);
        assert_eq!(snippets[0].duration, 0.0);
        Ok(())
    }

    #[test]
    fn rejects_malformed_start() {
        let err = parse(r#"<transcript><text start="soon" dur="1">x</text></transcript>"#)
            .expect_err("expected malformed start to fail");
        assert!(err.contains("invalid start"));
    }

    #[test]
    fn empty_document_has_no_snippets() -> Result<(), String> {
        assert!(parse("<transcript></transcript>")?.is_empty());
        Ok(())
    }
}
