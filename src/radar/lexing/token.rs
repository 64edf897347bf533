//! Token definitions for the javascript subset
//!
//! The tokens are defined using the logos derive macro. Whitespace and comments are
//! skipped by the lexer itself, so the parser only ever sees significant tokens.
//!
//! Two tokens depend on what precedes them and are settled in [super::tokenize]:
//! a `/` where an operand is expected starts a [Token::RegExp], and `?.` followed by a
//! digit is a `?` in front of a number (`c ?.5 : 1`).
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
pub enum Token {
    // Keywords
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("var")]
    Var,
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("function")]
    Function,
    #[token("new")]
    New,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("typeof")]
    TypeOf,
    #[token("void")]
    Void,
    #[token("delete")]
    Delete,
    #[token("in")]
    In,
    #[token("instanceof")]
    InstanceOf,
    #[token("do")]
    Do,
    #[token("for")]
    For,
    #[token("switch")]
    Switch,
    #[token("case")]
    Case,
    #[token("default")]
    Default,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("throw")]
    Throw,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("class")]
    Class,
    #[token("import")]
    Import,
    #[token("export")]
    Export,
    #[token("async")]
    Async,
    #[token("await")]
    Await,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Identifier,
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0[oO][0-7]+")]
    #[regex(r"0[bB][01]+")]
    Number,
    #[regex(r"[0-9]+n")]
    #[regex(r"0[xX][0-9a-fA-F]+n")]
    #[regex(r"0[oO][0-7]+n")]
    #[regex(r"0[bB][01]+n")]
    BigInt,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,
    /// Template literal, substitutions included, kept as a single token
    #[regex(r"`([^`\\]|\\.)*`")]
    Template,
    /// Regular expression literal, produced by [super::tokenize] only
    RegExp,

    // Grouping
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,

    // Punctuation
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?.")]
    QuestionDot,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("=>")]
    Arrow,
    #[token("...")]
    Ellipsis,

    // Operators
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    BangEqual,
    #[token("===")]
    EqualEqualEqual,
    #[token("!==")]
    BangEqualEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<<")]
    LessLess,
    #[token(">>")]
    GreaterGreater,
    #[token(">>>")]
    GreaterGreaterGreater,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    StarStar,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("??")]
    QuestionQuestion,

    // Assignment
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("**=")]
    StarStarAssign,
    #[token("<<=")]
    LessLessAssign,
    #[token(">>=")]
    GreaterGreaterAssign,
    #[token(">>>=")]
    GreaterGreaterGreaterAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,
    #[token("&&=")]
    AmpAmpAssign,
    #[token("||=")]
    PipePipeAssign,
    #[token("??=")]
    QuestionQuestionAssign,
}

impl Token {
    /// Human-readable description, used in parser errors
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Identifier => "identifier",
            Token::Number | Token::BigInt => "number",
            Token::String => "string",
            Token::Template => "template literal",
            Token::RegExp => "regular expression",
            Token::If => "'if'",
            Token::Else => "'else'",
            Token::While => "'while'",
            Token::Return => "'return'",
            Token::Var => "'var'",
            Token::Let => "'let'",
            Token::Const => "'const'",
            Token::Function => "'function'",
            Token::New => "'new'",
            Token::This => "'this'",
            Token::True => "'true'",
            Token::False => "'false'",
            Token::Null => "'null'",
            Token::TypeOf => "'typeof'",
            Token::Void => "'void'",
            Token::Delete => "'delete'",
            Token::In => "'in'",
            Token::InstanceOf => "'instanceof'",
            Token::Do => "'do'",
            Token::For => "'for'",
            Token::Switch => "'switch'",
            Token::Case => "'case'",
            Token::Default => "'default'",
            Token::Break => "'break'",
            Token::Continue => "'continue'",
            Token::Throw => "'throw'",
            Token::Try => "'try'",
            Token::Catch => "'catch'",
            Token::Finally => "'finally'",
            Token::Class => "'class'",
            Token::Import => "'import'",
            Token::Export => "'export'",
            Token::Async => "'async'",
            Token::Await => "'await'",
            Token::OpenParen => "'('",
            Token::CloseParen => "')'",
            Token::OpenBrace => "'{'",
            Token::CloseBrace => "'}'",
            Token::OpenBracket => "'['",
            Token::CloseBracket => "']'",
            Token::Semicolon => "';'",
            Token::Comma => "','",
            Token::Dot => "'.'",
            Token::QuestionDot => "'?.'",
            Token::Question => "'?'",
            Token::Colon => "':'",
            Token::Arrow => "'=>'",
            Token::Ellipsis => "'...'",
            Token::Assign => "'='",
            _ => "operator",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        Token::lexer(source).map(|t| t.expect("valid token")).collect()
    }

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(kinds("if iffy"), vec![Token::If, Token::Identifier]);
        assert_eq!(
            kinds("instanceof in"),
            vec![Token::InstanceOf, Token::In]
        );
    }

    #[test]
    fn test_longest_operator_match() {
        assert_eq!(
            kinds("!== === >>>= ??= ?."),
            vec![
                Token::BangEqualEqual,
                Token::EqualEqualEqual,
                Token::GreaterGreaterGreaterAssign,
                Token::QuestionQuestionAssign,
                Token::QuestionDot,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1 1.5 .5 1e3 0xff 0o17 0b101 10n"),
            vec![
                Token::Number,
                Token::Number,
                Token::Number,
                Token::Number,
                Token::Number,
                Token::Number,
                Token::Number,
                Token::BigInt,
            ]
        );
    }

    #[test]
    fn test_prefixed_bigints() {
        assert_eq!(
            kinds("0x10n 0o7n 0b1n 0xffffffffffffffffffffn"),
            vec![Token::BigInt, Token::BigInt, Token::BigInt, Token::BigInt]
        );
    }

    #[test]
    fn test_strings_and_templates() {
        assert_eq!(
            kinds(r#"'a\'b' "c\"d" `e ${f}`"#),
            vec![Token::String, Token::String, Token::Template]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // line\n/* block\n * more */ b"),
            vec![Token::Identifier, Token::Identifier]
        );
    }

    #[test]
    fn test_block_comment_shapes() {
        assert_eq!(kinds("/** doc */ a"), vec![Token::Identifier]);
        assert_eq!(kinds("/* x **/ a"), vec![Token::Identifier]);
        assert_eq!(kinds("/***/ a /**/"), vec![Token::Identifier]);
        assert_eq!(
            kinds("/**\n * Header.\n * @param {number} x\n */\na"),
            vec![Token::Identifier]
        );
        // Code inside a comment is not lexed
        assert_eq!(
            kinds("a /* if (a) {} */ ;"),
            vec![Token::Identifier, Token::Semicolon]
        );
    }

    #[test]
    fn test_arrow_and_spread() {
        assert_eq!(
            kinds("(...xs) => x"),
            vec![
                Token::OpenParen,
                Token::Ellipsis,
                Token::Identifier,
                Token::CloseParen,
                Token::Arrow,
                Token::Identifier,
            ]
        );
    }

    #[test]
    fn test_unknown_character() {
        let mut lexer = Token::lexer("a # b");
        assert_eq!(lexer.next(), Some(Ok(Token::Identifier)));
        assert_eq!(lexer.next(), Some(Err(())));
    }
}
