// src/core/html.rs
//! Tolerant, case-insensitive HTML slicing.
//!
//! The archive pages are old hand-written HTML: closing `</td>`/`</tr>` are often
//! missing and layout tables wrap the data tables. So cells end at the next cell or
//! row boundary, rows end at the next row, and only `<table>` is matched with nesting.

use super::sanitize::{normalize_entities, normalize_ws};

pub fn to_lower(s: &str) -> String {
    // ASCII-only lowering keeps byte offsets valid against the original.
    s.to_ascii_lowercase()
}

/// Next occurrence of `pat` (e.g. "<tr", "</td") in a lowercased doc, at a tag-name boundary.
fn find_tag(lc: &str, pat: &str, from: usize) -> Option<usize> {
    let mut pos = from;
    while let Some(rel) = lc.get(pos..)?.find(pat) {
        let at = pos + rel;
        match lc.as_bytes().get(at + pat.len()) {
            None | Some(b'>') | Some(b'/') => return Some(at),
            Some(c) if c.is_ascii_whitespace() => return Some(at),
            _ => pos = at + pat.len(),
        }
    }
    None
}

/// Index just past the `>` that closes the tag starting at `at`.
fn after_gt(lc: &str, at: usize) -> usize {
    lc[at..].find('>').map(|i| at + i + 1).unwrap_or(lc.len())
}

fn balanced_end(lc: &str, open: &str, close: &str, start: usize) -> usize {
    let mut depth = 0usize;
    let mut pos = start;
    loop {
        let next_open = find_tag(lc, open, pos);
        let next_close = find_tag(lc, close, pos);
        match (next_open, next_close) {
            (Some(o), Some(c)) if o < c => {
                depth += 1;
                pos = o + open.len();
            }
            (_, Some(c)) => {
                depth = depth.saturating_sub(1);
                pos = after_gt(lc, c);
                if depth == 0 {
                    return pos;
                }
            }
            // Unclosed: the block runs to the end of the document.
            (_, None) => return lc.len(),
        }
    }
}

/// Every `<name …>…</name>` block in document order, outer blocks before the
/// blocks nested inside them.
pub fn blocks_ci<'a>(s: &'a str, name: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let open = format!("<{name}");
    let close = format!("</{name}");

    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(start) = find_tag(&lc, &open, pos) {
        let end = balanced_end(&lc, &open, &close, start);
        out.push(&s[start..end]);
        pos = start + open.len();
    }
    out
}

/// One `<td>` worth of markup (inner HTML, opener excluded).
#[derive(Clone, Copy, Debug)]
pub struct Cell<'a> {
    pub html: &'a str,
}

impl<'a> Cell<'a> {
    /// Visible text, entities decoded, whitespace collapsed.
    pub fn text(&self) -> String {
        strip_tags(self.html)
    }

    pub fn first_link(&self) -> Option<Link> {
        first_link(self.html)
    }
}

/// Rows of `<td>` cells in document order, including rows of nested tables.
/// `<th>` cells are not returned but still end the preceding `<td>`.
pub fn rows(s: &str) -> Vec<Vec<Cell<'_>>> {
    let lc = to_lower(s);
    let mut starts = Vec::new();
    let mut pos = 0usize;
    while let Some(at) = find_tag(&lc, "<tr", pos) {
        starts.push(at);
        pos = at + 3;
    }

    let mut out = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(s.len());
        out.push(cells(&s[start..end], &lc[start..end]));
    }
    out
}

fn cells<'a>(row: &'a str, lc: &str) -> Vec<Cell<'a>> {
    const STOPS: [&str; 6] = ["<td", "<th", "</td", "</th", "</tr", "</table"];

    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(at) = find_tag(lc, "<td", pos) {
        let inner_start = after_gt(lc, at);
        let inner_end = STOPS
            .iter()
            .filter_map(|p| find_tag(lc, p, inner_start))
            .min()
            .unwrap_or(row.len());
        out.push(Cell { html: &row[inner_start..inner_end] });
        pos = inner_end.max(at + 3);
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub text: String,
}

/// First `<a>` that carries an `href`. Anchors without one (`<a name=…>`) are passed over.
pub fn first_link(s: &str) -> Option<Link> {
    let lc = to_lower(s);
    let mut pos = 0usize;
    while let Some(at) = find_tag(&lc, "<a", pos) {
        let gt = after_gt(&lc, at);
        pos = gt;

        let Some(href) = attr_value(&s[at..gt], &lc[at..gt], "href") else { continue };
        let text_end = find_tag(&lc, "</a", gt).unwrap_or(s.len());
        return Some(Link {
            href: normalize_entities(&href),
            text: strip_tags(&s[gt..text_end]),
        });
    }
    None
}

/// Attribute value from a tag opener; quotes optional in source.
fn attr_value(opener: &str, opener_lc: &str, name: &str) -> Option<String> {
    let needle = format!("{name}=");
    let mut from = 0usize;
    let hp = loop {
        let at = from + opener_lc[from..].find(&needle)?;
        // Reject matches inside another attribute name ("data-href=").
        let prev = opener_lc[..at].chars().last();
        if prev.is_none_or(|c| c.is_ascii_whitespace()) {
            break at;
        }
        from = at + needle.len();
    };

    let val = opener[hp + needle.len()..].trim_start();
    let (quote, start_off) = match val.as_bytes().first() {
        Some(b'"') => ('"', 1),
        Some(b'\'') => ('\'', 1),
        _ => ('\0', 0),
    };
    let end = if quote != '\0' {
        val[start_off..].find(quote).map(|e| start_off + e)
    } else {
        val.find(|c: char| c.is_ascii_whitespace() || c == '>')
    }
    .unwrap_or(val.len());

    Some(val[start_off..end].trim().to_string())
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Tags separate words ("a<br>b" renders as two tokens).
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&normalize_entities(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_tables_are_listed_outer_first() {
        let doc = "<TABLE id=o><tr><td><table id=i><tr><td>x</td></tr></table></td></tr></TABLE><table id=z></table>";
        let t = blocks_ci(doc, "table");
        assert_eq!(t.len(), 3);
        assert!(t[0].starts_with("<TABLE id=o>") && t[0].ends_with("</TABLE>"));
        assert!(t[1].starts_with("<table id=i>") && t[1].ends_with("</table>"));
        assert_eq!(t[2], "<table id=z></table>");
    }

    #[test]
    fn unclosed_cells_and_rows_still_split() {
        let doc = "<table><tr><td>1<td> a&nbsp;b <td><b>c</b>\n<tr><td>2<td>z</table>";
        let r = rows(doc);
        assert_eq!(r.len(), 2);
        let texts: Vec<String> = r[0].iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["1", "a b", "c"]);
        assert_eq!(r[1].len(), 2);
    }

    #[test]
    fn th_cells_are_not_counted() {
        let r = rows("<tr><th>EName<th>Peak</tr><tr><td>a</td><td>b</td></tr>");
        assert_eq!(r.len(), 2);
        assert!(r[0].is_empty());
        assert_eq!(r[1].len(), 2);
    }

    #[test]
    fn first_link_skips_named_anchors_and_tracks() {
        let l = first_link(r#"<a name="top"></a><track src=x><A HREF=snap/2021.html >01-Jan-2021 00:00</A>"#)
            .expect("link");
        assert_eq!(l.href, "snap/2021.html");
        assert_eq!(l.text, "01-Jan-2021 00:00");
    }

    #[test]
    fn link_href_entities_are_decoded() {
        let l = first_link(r#"<a data-href="no" href='a.html?x=1&amp;y=2'>t</a>"#).expect("link");
        assert_eq!(l.href, "a.html?x=1&y=2");
    }
}
