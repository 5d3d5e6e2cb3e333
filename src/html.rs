// src/html.rs
// Pull-based scanner over raw HTML. Just enough for the overview tables:
// start tags with their class attribute, text runs, end tags. Comments and
// doctype noise are skipped; everything else unknown is passed through as a
// tag token and ignored downstream.

/// One markup event. Tag names are lowercased; text has entities decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open { tag: String, class: Option<String> },
    Text(String),
    Close(String),
}

impl Token {
    pub fn open(tag: &str, class: Option<&str>) -> Self {
        Token::Open {
            tag: s!(tag),
            class: class.map(String::from),
        }
    }

    pub fn text(t: &str) -> Self {
        Token::Text(s!(t))
    }

    pub fn close(tag: &str) -> Self {
        Token::Close(s!(tag))
    }
}

pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let rest = &self.src[self.pos..];
            if rest.is_empty() {
                return None;
            }

            if let Some(after) = rest.strip_prefix("<!--") {
                match after.find("-->") {
                    Some(i) => {
                        self.pos += 4 + i + 3;
                        continue;
                    }
                    None => {
                        self.pos = self.src.len();
                        return None;
                    }
                }
            }

            // <!DOCTYPE ...>, <?xml ...>
            if rest.starts_with("<!") || rest.starts_with("<?") {
                match rest.find('>') {
                    Some(i) => {
                        self.pos += i + 1;
                        continue;
                    }
                    None => {
                        self.pos = self.src.len();
                        return None;
                    }
                }
            }

            if let Some(after) = rest.strip_prefix("</") {
                let end = match after.find('>') {
                    Some(i) => i,
                    None => {
                        self.pos = self.src.len();
                        return None;
                    }
                };
                let name = to_lower(after[..end].trim());
                self.pos += 2 + end + 1;
                return Some(Token::Close(name));
            }

            if rest.starts_with('<') {
                let end = match rest.find('>') {
                    Some(i) => i,
                    None => {
                        self.pos = self.src.len();
                        return None;
                    }
                };
                let inner = rest[1..end].trim().trim_end_matches('/');
                self.pos += end + 1;
                let (name, attrs) = split_tag(inner);
                return Some(Token::Open {
                    tag: to_lower(name),
                    class: attr_value(attrs, "class"),
                });
            }

            // Text run up to the next tag.
            let end = rest.find('<').unwrap_or(rest.len());
            let raw = &rest[..end];
            self.pos += end;
            return Some(Token::Text(decode_entities(raw)));
        }
    }
}

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Split "td class=foo" into name and attribute tail.
fn split_tag(inner: &str) -> (&str, &str) {
    match inner.find(|c: char| c.is_ascii_whitespace()) {
        Some(i) => (&inner[..i], inner[i + 1..].trim_start()),
        None => (inner, ""),
    }
}

/// Value of one attribute. Tolerates double-quoted, single-quoted and bare
/// values; key match is case-insensitive.
fn attr_value(attrs: &str, want: &str) -> Option<String> {
    let mut rest = attrs.trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c == '=' || c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        rest = rest[key_end..].trim_start();

        let mut value: Option<&str> = None;
        if let Some(r) = rest.strip_prefix('=') {
            let r = r.trim_start();
            if let Some(q) = r.strip_prefix('"') {
                let end = q.find('"').unwrap_or(q.len());
                value = Some(&q[..end]);
                rest = &q[(end + 1).min(q.len())..];
            } else if let Some(q) = r.strip_prefix('\'') {
                let end = q.find('\'').unwrap_or(q.len());
                value = Some(&q[..end]);
                rest = &q[(end + 1).min(q.len())..];
            } else {
                let end = r
                    .find(|c: char| c.is_ascii_whitespace())
                    .unwrap_or(r.len());
                value = Some(&r[..end]);
                rest = &r[end..];
            }
        }

        if key.eq_ignore_ascii_case(want) {
            return value.map(String::from);
        }
        rest = rest.trim_start();
    }
    None
}

/// Decode named and numeric character references. `&nbsp;` becomes U+00A0
/// here; field conversion decides whether that survives to the output.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s!(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        // entity names are short; don't scan the whole document for ';'
        let semi = match rest.find(';').filter(|&i| i <= 9) {
            Some(i) => i,
            None => {
                out.push('&');
                rest = &rest[1..];
                continue;
            }
        };
        let name = &rest[1..semi];
        let decoded = match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ if name.starts_with('#') => {
                let num = &name[1..];
                let cp = if let Some(hex) =
                    num.strip_prefix('x').or_else(|| num.strip_prefix('X'))
                {
                    u32::from_str_radix(hex, 16).ok()
                } else {
                    num.parse::<u32>().ok()
                };
                cp.and_then(char::from_u32)
            }
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        Tokenizer::new(src).collect()
    }

    #[test]
    fn simple_row() {
        let toks = tokens(r#"<tr class="failed"><td>x</td></tr>"#);
        assert_eq!(
            toks,
            vec![
                Token::open("tr", Some("failed")),
                Token::open("td", None),
                Token::text("x"),
                Token::close("td"),
                Token::close("tr"),
            ]
        );
    }

    #[test]
    fn class_attribute_quoting_variants() {
        for src in [
            r#"<TR CLASS="failed2">"#,
            r#"<tr class='failed2'>"#,
            r#"<tr class=failed2>"#,
            r#"<tr align="center" class=failed2 valign=top>"#,
        ] {
            assert_eq!(tokens(src), vec![Token::open("tr", Some("failed2"))], "{src}");
        }
    }

    #[test]
    fn tag_without_class() {
        assert_eq!(tokens("<tr>"), vec![Token::open("tr", None)]);
        assert_eq!(
            tokens(r#"<td align="left">"#),
            vec![Token::open("td", None)]
        );
    }

    #[test]
    fn entities_decoded() {
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{a0}b");
        assert_eq!(decode_entities("x &amp;&lt;&gt; y"), "x &<> y");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        // unknown or unterminated references pass through
        assert_eq!(decode_entities("&bogus; &"), "&bogus; &");
    }

    #[test]
    fn comments_and_doctype_skipped() {
        let toks = tokens("<!DOCTYPE html><!-- note --><td>a</td>");
        assert_eq!(
            toks,
            vec![Token::open("td", None), Token::text("a"), Token::close("td")]
        );
    }

    #[test]
    fn text_fragments_around_nested_tags() {
        let toks = tokens("<td>one <b>two</b> three</td>");
        let texts: Vec<_> = toks
            .iter()
            .filter_map(|t| match t {
                Token::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["one ", "two", " three"]);
    }

    #[test]
    fn self_closing_and_truncated_input() {
        assert_eq!(tokens("<br/>"), vec![Token::open("br", None)]);
        // truncated tag at EOF ends the stream without panicking
        assert_eq!(tokens("abc<td"), vec![Token::text("abc")]);
    }
}
