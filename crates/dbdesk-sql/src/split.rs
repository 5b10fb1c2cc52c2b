//! Statement splitting for multi-statement SQL scripts.
//!
//! Splits on top-level `;` while ignoring semicolons that appear inside
//! quoted strings, quoted identifiers, or comments. Comments are kept in the
//! emitted statement text; SQLite skips them at prepare time.

/// Where the scanner currently is. Quotes and comments never nest, so a
/// single state covers both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Code,
    SingleQuote,
    DoubleQuote,
    Backtick,
    LineComment,
    BlockComment,
}

/// Split a SQL script into trimmed, non-empty statements in textual order.
///
/// Never fails: an unterminated quote or block comment simply runs to the
/// end of the input and whatever was buffered becomes the last statement.
///
/// ```
/// use dbdesk_sql::split_statements;
///
/// let statements = split_statements("SELECT ';' ; SELECT 1;");
/// assert_eq!(statements, ["SELECT ';'", "SELECT 1"]);
/// ```
pub fn split_statements(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut state = LexState::Code;
    let mut chars = script.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            LexState::LineComment => {
                current.push(ch);
                if ch == '\n' {
                    state = LexState::Code;
                }
            }
            LexState::BlockComment => {
                current.push(ch);
                if ch == '*'
                    && let Some(close) = chars.next_if_eq(&'/')
                {
                    current.push(close);
                    state = LexState::Code;
                }
            }
            LexState::SingleQuote | LexState::DoubleQuote => {
                current.push(ch);
                let quote = if state == LexState::SingleQuote {
                    '\''
                } else {
                    '"'
                };
                if ch == quote {
                    // A doubled quote is an escaped literal quote.
                    if let Some(escaped) = chars.next_if_eq(&quote) {
                        current.push(escaped);
                    } else {
                        state = LexState::Code;
                    }
                }
            }
            LexState::Backtick => {
                current.push(ch);
                if ch == '`' {
                    state = LexState::Code;
                }
            }
            LexState::Code => match ch {
                '-' if chars.peek() == Some(&'-') => {
                    current.push(ch);
                    current.extend(chars.next());
                    state = LexState::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    current.push(ch);
                    current.extend(chars.next());
                    state = LexState::BlockComment;
                }
                '\'' => {
                    current.push(ch);
                    state = LexState::SingleQuote;
                }
                '"' => {
                    current.push(ch);
                    state = LexState::DoubleQuote;
                }
                '`' => {
                    current.push(ch);
                    state = LexState::Backtick;
                }
                ';' => {
                    flush(&mut statements, &current);
                    current.clear();
                }
                _ => current.push(ch),
            },
        }
    }

    flush(&mut statements, &current);
    statements
}

fn flush(statements: &mut Vec<String>, buffer: &str) {
    let statement = buffer.trim();
    if !statement.is_empty() {
        statements.push(statement.to_string());
    }
}
