//! SVG templates with `str.format`-style transform placeholders.
use super::jitter::Jitter;
use std::fmt::Write;

/// Template text containing `{w} {h} {r} {sx} {sy} {tx} {ty}`.
///
/// `{{` and `}}` stand for literal braces; any other `{name}` is left as is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgTemplate {
    text: String,
}

impl SvgTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn substitute(&self, width: u32, height: u32, jitter: &Jitter) -> String {
        let mut out = String::with_capacity(self.text.len() + 32);
        let mut rest = self.text.as_str();
        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            if tail.starts_with("{{") {
                out.push('{');
                rest = &tail[2..];
            } else if tail.starts_with("}}") {
                out.push('}');
                rest = &tail[2..];
            } else if let Some(end) = tail.starts_with('{').then(|| tail.find('}')).flatten() {
                let name = &tail[1..end];
                // writing into a String cannot fail
                let _ = match name {
                    "w" => write!(out, "{width}"),
                    "h" => write!(out, "{height}"),
                    "r" => write!(out, "{}", jitter.r),
                    "sx" => write!(out, "{}", jitter.sx),
                    "sy" => write!(out, "{}", jitter.sy),
                    "tx" => write!(out, "{}", jitter.tx),
                    "ty" => write!(out, "{}", jitter.ty),
                    _ => write!(out, "{}", &tail[..=end]),
                };
                rest = &tail[end + 1..];
            } else {
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}
