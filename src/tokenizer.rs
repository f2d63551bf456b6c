use std::fmt;

/// The data manipulation verbs a statement can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Replace,
    Merge,
}

impl StatementKind {
    /// Matches a bare word against the DML keywords, ignoring case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_uppercase().as_str() {
            "SELECT" => Some(Self::Select),
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "REPLACE" => Some(Self::Replace),
            "MERGE" => Some(Self::Merge),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Replace => "REPLACE",
            Self::Merge => "MERGE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The lexical units the scanner distinguishes.
///
/// Only [Token::Dml] carries meaning for classification. Everything else
/// exists so that keywords hidden inside literals, quoted names or comments
/// are never mistaken for a verb.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A DML keyword used as a keyword (e.g. `SELECT`, `update`).
    Dml(StatementKind),
    /// Any other bare word: keywords, table and column names.
    Word(String),
    /// A name between `"`, `` ` `` or `[ ]`.
    QuotedIdent(String),
    /// A string literal between single quotes, `''` unescaped.
    String(String),
    /// A numeric literal, kept as written.
    Number(String),
    /// A `--` or `/* */` comment.
    Comment,
    /// Statement separator `;`
    Semicolon,
    /// Any other single character (operators, parentheses, dots).
    Punct(char),
    /// Represents the End Of File/Input.
    Eof,
}

/// A lenient lexical scanner: it never fails, unknown characters become
/// [Token::Punct] and an unterminated literal runs to the end of input.
pub struct Tokenizer {
    /// The input string stored as a vector of characters for easy iteration.
    input: Vec<char>,
    /// The current position in the character vector.
    position: usize,
}

impl Tokenizer {
    /// Creates a new Tokenizer for the given input string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Processes the entire input and returns a vector of tokens ending with
    /// [Token::Eof].
    ///
    /// # Example
    /// ```
    /// # use dfquery::tokenizer::{StatementKind, Token, Tokenizer};
    /// let tokens = Tokenizer::new("SELECT 'update' FROM t").tokenize();
    ///
    /// assert_eq!(tokens[0], Token::Dml(StatementKind::Select));
    /// assert_eq!(tokens[1], Token::String("update".into()));
    /// ```
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            let after_dot = matches!(tokens.last(), Some(Token::Punct('.')));
            tokens.push(self.next_token(after_dot));
        }

        tokens.push(Token::Eof);
        tokens
    }

    /// Tokens of the first statement only, up to (excluding) the `;` that
    /// ends it.
    pub fn first_statement(&mut self) -> Vec<Token> {
        let mut tokens = self.tokenize();
        tokens.truncate(statement_end(&tokens));
        tokens
    }

    /// Identifies the next token based on the character at the current position.
    /// A word directly after a `.` is a qualified name, never a keyword.
    fn next_token(&mut self, after_dot: bool) -> Token {
        let ch = self.current_char();

        match ch {
            '-' if self.peek_char() == Some('-') => self.skip_line_comment(),
            '/' if self.peek_char() == Some('*') => self.skip_block_comment(),
            '\'' => Token::String(self.read_quoted('\'')),
            '"' => Token::QuotedIdent(self.read_quoted('"')),
            '`' => Token::QuotedIdent(self.read_quoted('`')),
            '[' => Token::QuotedIdent(self.read_quoted(']')),
            ';' => {
                self.advance();
                Token::Semicolon
            }
            c if c.is_alphabetic() || c == '_' => self.read_word(after_dot),
            c if c.is_ascii_digit() => self.read_number(),
            c => {
                self.advance();
                Token::Punct(c)
            }
        }
    }

    // --- Navigation Helpers ---

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn skip_line_comment(&mut self) -> Token {
        while !self.is_at_end() && self.current_char() != '\n' {
            self.advance();
        }
        Token::Comment
    }

    fn skip_block_comment(&mut self) -> Token {
        self.position += 2; // Skip `/*`
        while !self.is_at_end() {
            if self.current_char() == '*' && self.peek_char() == Some('/') {
                self.position += 2;
                break;
            }
            self.advance();
        }
        Token::Comment
    }

    // --- Extraction Logic ---

    /// Reads a run of word characters; DML keywords are matched case-insensitively.
    fn read_word(&mut self, after_dot: bool) -> Token {
        let mut word = String::new();

        while !self.is_at_end()
            && (self.current_char().is_alphanumeric()
                || self.current_char() == '_'
                || self.current_char() == '$')
        {
            word.push(self.current_char());
            self.advance();
        }

        match StatementKind::from_keyword(&word) {
            Some(kind) if !after_dot => Token::Dml(kind),
            _ => Token::Word(word),
        }
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();

        while !self.is_at_end()
            && (self.current_char().is_ascii_alphanumeric() || self.current_char() == '.')
        {
            number.push(self.current_char());
            self.advance();
        }

        Token::Number(number)
    }

    /// Reads a literal closed by `close`, where a doubled `close` is an escaped
    /// occurrence of it.
    fn read_quoted(&mut self, close: char) -> String {
        self.advance(); // Skip the opening quote

        let mut text = String::new();
        while !self.is_at_end() {
            let ch = self.current_char();
            self.advance();
            if ch != close {
                text.push(ch);
            } else if !self.is_at_end() && self.current_char() == close {
                text.push(close);
                self.advance();
            } else {
                break;
            }
        }
        text
    }
}

/// Index of the `;` or [Token::Eof] closing the first statement of `tokens`.
///
/// The body of a `CREATE TRIGGER` holds its own `;`-separated statements
/// between `BEGIN` and `END`; those separators do not close the trigger.
fn statement_end(tokens: &[Token]) -> usize {
    let mut words = tokens.iter().filter_map(|t| match t {
        Token::Word(w) => Some(w.to_uppercase()),
        Token::Comment => None,
        _ => Some(String::new()),
    });
    let is_trigger = words.next().as_deref() == Some("CREATE")
        && match words.next().as_deref() {
            Some("TEMP" | "TEMPORARY") => words.next().as_deref() == Some("TRIGGER"),
            next => next == Some("TRIGGER"),
        };

    let mut depth = 0_usize;
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Eof => return idx,
            Token::Semicolon if depth == 0 => return idx,
            Token::Word(w) if is_trigger => {
                if w.eq_ignore_ascii_case("BEGIN") || w.eq_ignore_ascii_case("CASE") {
                    depth += 1;
                } else if w.eq_ignore_ascii_case("END") {
                    depth = depth.saturating_sub(1);
                }
            }
            _ => {}
        }
    }
    tokens.len()
}

/// Whether anything but comments and empty statements follows the first
/// statement of `sql`.
///
/// # Example
/// ```
/// # use dfquery::tokenizer::has_trailing_statement;
/// assert!(!has_trailing_statement("select 1; -- done"));
/// assert!(has_trailing_statement("select 1; drop table t"));
/// ```
pub fn has_trailing_statement(sql: &str) -> bool {
    let tokens = Tokenizer::new(sql).tokenize();
    tokens[statement_end(&tokens)..]
        .iter()
        .any(|t| !matches!(t, Token::Semicolon | Token::Comment | Token::Eof))
}

/// Whether the first statement of `sql` contains `expected` as a DML keyword.
///
/// This only looks at keywords, it does not check the statement is valid SQL.
/// An `UPDATE` with a sub-`SELECT` classifies as both kinds.
///
/// # Example
/// ```
/// # use dfquery::{classify, StatementKind};
/// assert!(classify("select * from T where id = 200", StatementKind::Select));
/// assert!(!classify("update T set AGE = 50", StatementKind::Select));
/// ```
pub fn classify(sql: &str, expected: StatementKind) -> bool {
    Tokenizer::new(sql)
        .first_statement()
        .iter()
        .any(|token| *token == Token::Dml(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let tokens = Tokenizer::new("select * from DT").tokenize();

        assert_eq!(
            tokens,
            vec![
                Token::Dml(StatementKind::Select),
                Token::Punct('*'),
                Token::Word("from".into()),
                Token::Word("DT".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_literals() {
        let tokens = Tokenizer::new("'it''s', \"col\"\"x\", [a b], 3.5e2").tokenize();

        assert_eq!(
            tokens,
            vec![
                Token::String("it's".into()),
                Token::Punct(','),
                Token::QuotedIdent("col\"x".into()),
                Token::Punct(','),
                Token::QuotedIdent("a b".into()),
                Token::Punct(','),
                Token::Number("3.5e2".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_tokenize_comments() {
        let tokens = Tokenizer::new("-- update\n/* delete */ select").tokenize();

        assert_eq!(
            tokens,
            vec![
                Token::Comment,
                Token::Comment,
                Token::Dml(StatementKind::Select),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_input_is_lenient() {
        let tokens = Tokenizer::new("select 'abc").tokenize();
        assert_eq!(tokens[1], Token::String("abc".into()));

        let tokens = Tokenizer::new("/* never closed").tokenize();
        assert_eq!(tokens, vec![Token::Comment, Token::Eof]);
    }

    #[test]
    fn test_qualified_name_is_not_keyword() {
        let tokens = Tokenizer::new("t.update").tokenize();

        assert_eq!(tokens[2], Token::Word("update".into()));
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert!(classify("SELECT 1", StatementKind::Select));
        assert!(classify("sElEcT 1", StatementKind::Select));
        assert!(classify("Update T set AGE = 50", StatementKind::Update));
        assert!(classify("  \n\tdelete from T", StatementKind::Delete));
    }

    #[test]
    fn test_classify_rejects_other_kinds() {
        assert!(!classify("update T set AGE = 50", StatementKind::Select));
        assert!(!classify("create table X (id int)", StatementKind::Select));
        assert!(!classify("select * from T", StatementKind::Update));
        assert!(!classify("", StatementKind::Select));
    }

    #[test]
    fn test_classify_any_position() {
        let sql = "update T set AGE = 60 where ID = (select ID from R)";

        assert!(classify(sql, StatementKind::Update));
        assert!(classify(sql, StatementKind::Select));
        assert!(classify("with x as (select 1) select * from x", StatementKind::Select));
    }

    #[test]
    fn test_classify_ignores_hidden_keywords() {
        assert!(!classify("select 'update'", StatementKind::Update));
        assert!(!classify("select \"update\" from t", StatementKind::Update));
        assert!(!classify("select 1 -- update", StatementKind::Update));
        assert!(!classify("select t.update from t", StatementKind::Update));
    }

    #[test]
    fn test_classify_first_statement_only() {
        assert!(!classify("select 1; update T set a = 1", StatementKind::Update));
        assert!(classify("select 1; update T set a = 1", StatementKind::Select));
    }

    #[test]
    fn test_trailing_statement() {
        assert!(!has_trailing_statement("select * from DT"));
        assert!(!has_trailing_statement("select * from DT;"));
        assert!(!has_trailing_statement("select 1;; -- done\n/* really */ ;"));
        assert!(!has_trailing_statement("select ';drop table DT'"));
        assert!(!has_trailing_statement(""));
        assert!(has_trailing_statement("select * from DT; drop table DT"));
        assert!(has_trailing_statement(
            "create table a (x integer); create table b (y integer)"
        ));
    }

    #[test]
    fn test_trigger_body_is_one_statement() {
        let trigger = "create temp trigger log_t after insert on t begin \
                       insert into log values (new.x); \
                       update t set y = case when new.x > 0 then 1 else 0 end; \
                       end;";

        assert!(!has_trailing_statement(trigger));
        assert!(has_trailing_statement(&format!("{trigger} select 1")));
        assert!(!classify(trigger, StatementKind::Select));
        assert!(classify(trigger, StatementKind::Update));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(StatementKind::Select.to_string(), "SELECT");
        assert_eq!(StatementKind::from_keyword("merge"), Some(StatementKind::Merge));
        assert_eq!(StatementKind::from_keyword("create"), None);
    }
}
