//! Declaration discovery.
//!
//! [`TextLocator`] is the lightweight scanner working on raw text: a regex
//! finds `Type name =` heads, a small lexer masks out comments and literals,
//! and brace counting approximates scope. Integrations that own a real
//! parse tree implement [`DeclarationLocator`] instead and feed their
//! declarations to [`crate::process_declarations`].

use std::sync::LazyLock;

use regex::Regex;

use crate::infer::compile_regex;
use crate::types::{Declaration, Scope};

/// Produces the declarations of a source text in source order.
///
/// Implementations must return declarations whose `type_span`s are
/// ascending and non-overlapping, and must not match a declaration whose
/// type already is `var`.
pub trait DeclarationLocator {
    /// Scan `source` for declarations.
    fn locate(&self, source: &str) -> Vec<Declaration>;
}

/// Regex and brace-counting locator over raw text.
///
/// Scope classification is best effort: a declaration is local when the
/// code before it has at least one unmatched `{` and at least two `{` in
/// total. A declaration directly inside a `for (` header is a loop variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLocator;

/// Scan `source` with the default [`TextLocator`].
///
/// # Example
///
/// ```rust
/// use omni_var::{Scope, locate_declarations};
///
/// let found = locate_declarations("class X { void m() { String s = \"hi\"; } }");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].declared_type, "String");
/// assert_eq!(found[0].scope, Scope::Local);
/// ```
#[must_use]
pub fn locate_declarations(source: &str) -> Vec<Declaration> {
    TextLocator.locate(source)
}

// Generic argument lists nest up to three levels. Statement punctuation is
// excluded so comparisons such as `a < b && c > d` never read as generics.
const GENERIC_ARGS: &str = r"<(?:[^<>;=(){}|&!]|<(?:[^<>;=(){}|&!]|<[^<>;=(){}|&!]*>)*>)*>";

static DECLARATION_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(&format!(
        r"(?P<mods>(?:(?:\bfinal|@[A-Za-z_$][\w$.]*(?:\([^()]*\))?)\s+)*)(?P<ty>[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*(?:\s*{GENERIC_ARGS})?(?:\s*\[\s*\])*)\s*(?P<name>[A-Za-z_$][\w$]*)\s*="
    ))
});

static NEXT_DECLARATOR: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^\s*[A-Za-z_$][\w$]*\s*(?:\[\s*\]\s*)*(?:=[^=]|[,;])"));

/// Words that can never start a type in declaration position.
const RESERVED: &[&str] = &[
    "abstract", "assert", "break", "case", "catch", "class", "continue", "default", "do",
    "else", "enum", "extends", "final", "finally", "for", "goto", "if", "implements",
    "import", "instanceof", "interface", "native", "new", "package", "permits",
    "private", "protected", "public", "record", "return", "sealed", "static", "strictfp",
    "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try", "var",
    "void", "volatile", "while", "yield",
];

impl DeclarationLocator for TextLocator {
    fn locate(&self, source: &str) -> Vec<Declaration> {
        let mask = code_mask(source);
        let mut braces = BraceCounter::default();
        let mut declarations = Vec::new();
        let mut search_from = 0;

        while let Some(caps) = DECLARATION_HEAD.captures_at(source, search_from) {
            let (Some(head), Some(ty), Some(name)) = (caps.get(0), caps.name("ty"), caps.name("name"))
            else {
                break;
            };

            let declared_type = ty.as_str();
            let eq_end = head.end();

            // `$` is not a regex word character, so identifier boundaries
            // are checked by hand: the head must not start mid-identifier,
            // and type and name need a separator unless the type ends in
            // `>` or `]`.
            if follows_identifier(source, head.start())
                || follows_identifier(source, ty.start())
                || !separated(declared_type, &source[ty.end()..name.start()])
            {
                search_from = identifier_run_end(source, ty.start());
                continue;
            }

            if !mask[ty.start()]
                || is_reserved(first_segment(declared_type))
                || is_reserved(name.as_str())
                || source[eq_end..].starts_with('=')
            {
                search_from = ty.end();
                continue;
            }

            search_from = eq_end;

            let Some(semicolon) = initializer_end(source, &mask, eq_end) else {
                continue;
            };
            let raw = &source[eq_end..semicolon];
            let initializer = raw.trim();
            if initializer.is_empty() {
                continue;
            }

            let leading = raw.len() - raw.trim_start().len();
            let init_start = eq_end + leading;

            braces.advance(source, &mask, head.start());
            let scope = if braces.encloses_local() {
                Scope::Local
            } else {
                Scope::Field
            };

            declarations.push(Declaration {
                declared_type: declared_type.to_string(),
                variable_name: name.as_str().to_string(),
                type_span: ty.range(),
                initializer: initializer.to_string(),
                initializer_span: init_start..init_start + initializer.len(),
                initializer_type: None,
                scope,
                is_loop_variable: in_for_header(&source[..head.start()]),
            });
        }

        tracing::trace!(found = declarations.len(), "located declarations");
        declarations
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn follows_identifier(source: &str, idx: usize) -> bool {
    source[..idx].chars().next_back().is_some_and(is_identifier_char)
}

fn separated(declared_type: &str, gap: &str) -> bool {
    !gap.is_empty() || declared_type.ends_with('>') || declared_type.ends_with(']')
}

/// Offset just past the identifier run starting at `from`; always moves
/// forward by at least one character.
fn identifier_run_end(source: &str, from: usize) -> usize {
    let rest = &source[from..];
    let run = rest
        .char_indices()
        .find(|&(_, c)| !is_identifier_char(c))
        .map_or(rest.len(), |(idx, _)| idx);
    let first = rest.chars().next().map_or(0, char::len_utf8);
    from + run.max(first)
}

fn first_segment(type_name: &str) -> &str {
    type_name
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .next()
        .unwrap_or(type_name)
}

fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// Offset of the `;` terminating the initializer that starts at `from`.
///
/// Only code bytes count: a `;` inside parentheses, brackets, braces,
/// literals or comments does not end the statement. Returns `None` when
/// the scan leaves the enclosing construct, runs off the end, or finds a
/// second declarator (`int a = 1, b = 2;`).
fn initializer_end(source: &str, mask: &[bool], from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut depth = 0usize;

    for idx in from..bytes.len() {
        if !mask[idx] {
            continue;
        }
        match bytes[idx] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            b';' if depth == 0 => return Some(idx),
            b',' if depth == 0 && NEXT_DECLARATOR.is_match(&source[idx + 1..]) => return None,
            _ => {}
        }
    }
    None
}

/// Whether the text before a declaration ends in `for (`.
fn in_for_header(before: &str) -> bool {
    let Some(rest) = before.trim_end().strip_suffix('(') else {
        return false;
    };
    let Some(prefix) = rest.trim_end().strip_suffix("for") else {
        return false;
    };
    !prefix
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Running count of code braces up to a position.
#[derive(Debug, Default)]
struct BraceCounter {
    position: usize,
    opens: usize,
    closes: usize,
}

impl BraceCounter {
    fn advance(&mut self, source: &str, mask: &[bool], to: usize) {
        let bytes = source.as_bytes();
        for idx in self.position..to {
            if !mask[idx] {
                continue;
            }
            match bytes[idx] {
                b'{' => self.opens += 1,
                b'}' => self.closes += 1,
                _ => {}
            }
        }
        self.position = self.position.max(to);
    }

    fn encloses_local(&self) -> bool {
        self.opens > self.closes && self.opens >= 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
    CharLiteral,
    TextBlock,
}

/// Per-byte flag: `true` for code, `false` inside comments and literals
/// (delimiters included).
///
/// All delimiters are ASCII, so walking bytes never lands inside a
/// multi-byte character in a way that matters.
fn code_mask(source: &str) -> Vec<bool> {
    let bytes = source.as_bytes();
    let mut mask = vec![true; bytes.len()];
    let mut state = Lexeme::Code;
    let mut idx = 0;

    while idx < bytes.len() {
        let rest = &bytes[idx..];
        match state {
            Lexeme::Code => {
                let next = if rest.starts_with(b"//") {
                    Some((Lexeme::LineComment, 2))
                } else if rest.starts_with(b"/*") {
                    Some((Lexeme::BlockComment, 2))
                } else if rest.starts_with(b"\"\"\"") {
                    Some((Lexeme::TextBlock, 3))
                } else if rest[0] == b'"' {
                    Some((Lexeme::StringLiteral, 1))
                } else if rest[0] == b'\'' {
                    Some((Lexeme::CharLiteral, 1))
                } else {
                    None
                };
                match next {
                    Some((lexeme, width)) => {
                        mask[idx..idx + width].fill(false);
                        state = lexeme;
                        idx += width;
                    }
                    None => idx += 1,
                }
            }
            Lexeme::LineComment => {
                if rest[0] == b'\n' {
                    state = Lexeme::Code;
                } else {
                    mask[idx] = false;
                }
                idx += 1;
            }
            Lexeme::BlockComment => {
                if rest.starts_with(b"*/") {
                    mask[idx..idx + 2].fill(false);
                    state = Lexeme::Code;
                    idx += 2;
                } else {
                    mask[idx] = false;
                    idx += 1;
                }
            }
            Lexeme::TextBlock => {
                if rest.starts_with(b"\"\"\"") {
                    mask[idx..idx + 3].fill(false);
                    state = Lexeme::Code;
                    idx += 3;
                } else {
                    let width = if rest[0] == b'\\' { rest.len().min(2) } else { 1 };
                    mask[idx..idx + width].fill(false);
                    idx += width;
                }
            }
            Lexeme::StringLiteral | Lexeme::CharLiteral => {
                let quote = if state == Lexeme::StringLiteral { b'"' } else { b'\'' };
                match rest[0] {
                    b'\\' => {
                        let width = rest.len().min(2);
                        mask[idx..idx + width].fill(false);
                        idx += width;
                    }
                    b'\n' => {
                        // Unterminated literal; resume at the line break.
                        state = Lexeme::Code;
                        idx += 1;
                    }
                    c => {
                        mask[idx] = false;
                        if c == quote {
                            state = Lexeme::Code;
                        }
                        idx += 1;
                    }
                }
            }
        }
    }

    mask
}
