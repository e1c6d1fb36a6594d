//! Rendering of element descriptions.
//!
//! Capella stores descriptions as HTML. The `info` text is kept verbatim; the
//! `see` link, and for attributes the `exp` and `unit` annotations, are
//! appended as `<br>`-separated labelled lines.

/// Builds the description of an element.
pub fn render(info: &str, see: &str, exp: Option<i64>, unit: Option<&str>) -> String {
    let mut description = info.to_string();
    if !see.is_empty() {
        let see = escape_html(see);
        description.push_str(&format!("<br><b>see: </b><a href='{see}'>{see}</a>"));
    }
    if let Some(exp) = exp {
        description.push_str(&format!("<br><b>exp: </b>{exp}"));
    }
    if let Some(unit) = unit {
        description.push_str(&format!("<br><b>unit: </b>{unit}"));
    }
    description
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_only() {
        assert_eq!(render("A vehicle", "", None, None), "A vehicle");
    }

    #[test]
    fn see_link_is_escaped() {
        let d = render("", "https://x.org/?a=1&b='2'", None, None);
        assert_eq!(
            d,
            "<br><b>see: </b><a href='https://x.org/?a=1&amp;b=&#x27;2&#x27;'>https://x.org/?a=1&amp;b=&#x27;2&#x27;</a>"
        );
    }

    #[test]
    fn attribute_annotations_follow_see() {
        let d = render("Speed", "doc", Some(-3), Some("km/h"));
        assert_eq!(
            d,
            "Speed<br><b>see: </b><a href='doc'>doc</a><br><b>exp: </b>-3<br><b>unit: </b>km/h"
        );
    }
}
