//! `${name}` template compilation. Compilation never fails: anything that
//! isn't a recognized placeholder degrades to literal text or a fixed-token
//! lookup, so a typo in a user's format string can't break logging.

use super::token::Token;
use regex::Regex;
use std::sync::LazyLock;

/// Matches one `${...}` span; the capture excludes the braces.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^\}]+)\}").expect("placeholder pattern is a valid literal")
});

/// An ordered token sequence compiled once from a template string.
///
/// Compiling the same template twice yields structurally equal sequences, and
/// rendering is a pure function of (tokens, event, context).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: String,
    tokens: Vec<Token>,
}

impl Formatter {
    /// One-time parse: literal runs between placeholders become literal
    /// tokens; each `${name}` or `${name:arg}` span becomes its typed token.
    /// A template with no placeholders compiles to a single literal token.
    #[must_use]
    pub fn compile(template: &str) -> Self {
        let mut tokens = Vec::new();
        let mut cursor = 0;

        for captures in PLACEHOLDER.captures_iter(template) {
            // Group 0 always exists on a match.
            let Some(span) = captures.get(0) else { continue };
            let name = &captures[1];

            if span.start() > cursor {
                tokens.push(Token::Literal(template[cursor..span.start()].to_string()));
            }
            tokens.push(token_for_name(name));
            cursor = span.end();
        }

        if tokens.is_empty() {
            tokens.push(Token::Literal(template.to_string()));
        } else if cursor < template.len() {
            tokens.push(Token::Literal(template[cursor..].to_string()));
        }

        Self {
            template: template.to_string(),
            tokens,
        }
    }

    /// The template text this formatter was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Tests and diagnostics need direct access to verify compilation results.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Concatenates every token's output in compiled order — the rendering
    /// hot path for every console-printed line.
    #[must_use]
    pub fn render(&self, event: &super::LogEvent<'_>, ctx: &super::RenderContext<'_>) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            out.push_str(&token.render(event, ctx));
        }
        out
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::compile(crate::config::DEFAULT_FORMAT)
    }
}

/// Exact match for simple names, prefix match for parameterized ones. The
/// argument is everything after the *first* colon, taken verbatim — time
/// formats like `%H:%M:%S` contain further colons.
fn token_for_name(name: &str) -> Token {
    match name {
        "severity" => Token::Severity,
        "message" => Token::Message,
        "time" => Token::Time(None),
        "walltime" => Token::WallTime(None),
        "thread" => Token::Thread,
        "logger" => Token::Logger,
        "file" => Token::File,
        "shortfile" => Token::ShortFile,
        "function" => Token::Function,
        "line" => Token::Line,
        _ => {
            if let Some(arg) = name.strip_prefix("time:") {
                Token::Time(Some(arg.to_string()))
            } else if let Some(arg) = name.strip_prefix("walltime:") {
                Token::WallTime(Some(arg.to_string()))
            } else {
                Token::FixedMap(name.to_string())
            }
        }
    }
}
