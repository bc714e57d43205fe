//! The isolated rendering surface for generated markup and stylesheet.
//!
//! The service may answer a run with generated `html`/`css`. Those are
//! untrusted: the surface composes them into one self-contained document
//! (style block plus body) and renders an *inert* textual projection of it.
//! Nothing in the document is ever executed; `<script>` and `<style>`
//! element content never reaches the projection, so the generated output
//! cannot touch the hosting terminal, the session, or anything else.
//!
//! A surface is immutable once built. Any change to either input field
//! means tearing the old surface down and building a fresh one, never
//! patching in place.

/// Tags that break the flow of the text projection.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "tr", "table", "section", "article", "header", "footer",
    "h1", "h2", "h3", "h4", "h5", "h6",
];

/// An inert, fully rebuilt view of one markup/stylesheet pair.
pub struct PreviewSurface {
    markup: String,
    stylesheet: String,
    document: String,
    text: Vec<String>,
}

impl PreviewSurface {
    /// Build a surface from exactly the current markup and stylesheet.
    pub fn build(markup: &str, stylesheet: &str) -> Self {
        PreviewSurface {
            markup: markup.to_string(),
            stylesheet: stylesheet.to_string(),
            document: compose_document(markup, stylesheet),
            text: project_text(markup),
        }
    }

    /// Whether this surface was built from exactly these inputs. A mismatch
    /// means the surface must be rebuilt.
    pub fn matches(&self, markup: &str, stylesheet: &str) -> bool {
        self.markup == markup && self.stylesheet == stylesheet
    }

    /// The complete self-contained document (doctype, style block, body).
    pub fn document(&self) -> &str {
        &self.document
    }

    /// The inert text projection of the body markup.
    pub fn text_lines(&self) -> &[String] {
        &self.text
    }
}

/// Compose the full document handed to the surface: the stylesheet as a
/// style block in the head, the markup as the body.
fn compose_document(markup: &str, stylesheet: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n  <head>\n    <style>{}</style>\n  </head>\n  <body>\n    {}\n  </body>\n</html>\n",
        stylesheet, markup
    )
}

/// Strip markup down to display text: tags removed, `<script>`/`<style>`
/// content dropped entirely, block tags forcing line breaks, basic entities
/// decoded. Never executes or evaluates anything.
fn project_text(markup: &str) -> Vec<String> {
    let chars: Vec<char> = markup.chars().collect();
    let mut out = String::new();
    // Name of the <script>/<style> element currently being suppressed
    let mut suppress: Option<String> = None;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '<' {
            let mut end = i + 1;
            while end < chars.len() && chars[end] != '>' {
                end += 1;
            }
            let inner: String = chars[i + 1..end.min(chars.len())].iter().collect();
            let is_closing = inner.starts_with('/');
            let name: String = inner
                .trim_start_matches('/')
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();

            match &suppress {
                Some(active) => {
                    if is_closing && name == *active {
                        suppress = None;
                    }
                }
                None => {
                    if !is_closing && (name == "script" || name == "style") {
                        suppress = Some(name);
                    } else if BLOCK_TAGS.contains(&name.as_str()) && !out.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
            i = end.saturating_add(1);
        } else {
            if suppress.is_none() {
                out.push(chars[i]);
            }
            i += 1;
        }
    }

    decode_entities(&out)
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_embeds_both_fields() {
        let surface = PreviewSurface::build("<h1>Hi</h1>", "h1{color:red}");
        assert!(surface.document().contains("<style>h1{color:red}</style>"));
        assert!(surface.document().contains("<h1>Hi</h1>"));
        assert!(surface.document().starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn projection_strips_tags_and_breaks_blocks() {
        let surface = PreviewSurface::build("<div><h1>Titulo</h1><p>Un <b>texto</b></p></div>", "");
        assert_eq!(surface.text_lines(), ["Titulo", "Un texto"]);
    }

    #[test]
    fn script_content_never_reaches_the_projection() {
        let surface = PreviewSurface::build(
            "<p>antes</p><script>alert('x')</script><p>despues</p>",
            "",
        );
        assert_eq!(surface.text_lines(), ["antes", "despues"]);
    }

    #[test]
    fn inline_style_content_is_dropped() {
        let surface = PreviewSurface::build("<style>p{}</style><p>hola</p>", "");
        assert_eq!(surface.text_lines(), ["hola"]);
    }

    #[test]
    fn entities_are_decoded() {
        let surface = PreviewSurface::build("<p>a &lt;b&gt; &amp; c</p>", "");
        assert_eq!(surface.text_lines(), ["a <b> & c"]);
    }

    #[test]
    fn matches_detects_any_field_change() {
        let surface = PreviewSurface::build("<p>x</p>", "p{}");
        assert!(surface.matches("<p>x</p>", "p{}"));
        assert!(!surface.matches("<p>y</p>", "p{}"));
        assert!(!surface.matches("<p>x</p>", "p{color:red}"));
    }

    #[test]
    fn unterminated_tag_does_not_panic() {
        let surface = PreviewSurface::build("<p>texto<", "");
        assert_eq!(surface.text_lines(), ["texto"]);
    }
}
