//! Literal-aware masking of source lines.
//!
//! Produces a "code view" of each line in which comment text and the contents
//! of string, template, and regex literals are replaced by spaces. Delimiters
//! of string literals are kept so the shape of the line stays recognizable.
//! Template substitutions (`${ ... }`) are code and stay visible, but their
//! `${` and closing `}` are masked so they never affect brace balance.

const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "do", "else", "in", "of", "new", "delete", "void", "throw",
    "yield", "await",
];

const REGEX_PRECEDING_PUNCT: &str = "(,=:[!&|?{};+-*%<>~^";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Code,
    BlockComment,
    Str(char),
    Template,
    Regex {
        in_class: bool,
    },
}

#[derive(Debug, Default)]
struct Masker {
    state: State,
    /// Brace depth inside each open `${` substitution.
    template_stack: Vec<usize>,
    last_sig: Option<char>,
    last_word: String,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

impl Masker {
    fn regex_allowed(&self) -> bool {
        match self.last_sig {
            None => true,
            Some(c) if REGEX_PRECEDING_PUNCT.contains(c) => true,
            Some(c) if is_word_char(c) => REGEX_PRECEDING_KEYWORDS.contains(&self.last_word.as_str()),
            Some(_) => false,
        }
    }

    fn note_code_char(&mut self, c: char) {
        if c.is_whitespace() {
            return;
        }
        if is_word_char(c) {
            if !self.last_sig.is_some_and(is_word_char) {
                self.last_word.clear();
            }
            self.last_word.push(c);
        } else {
            self.last_word.clear();
        }
        self.last_sig = Some(c);
    }

    fn mask_line(&mut self, line: &str) -> String {
        let chars: Vec<char> = line.chars().collect();
        let mut out = String::with_capacity(line.len());
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let next = chars.get(i + 1).copied();

            match self.state {
                State::BlockComment => {
                    if c == '*' && next == Some('/') {
                        out.push_str("  ");
                        self.state = State::Code;
                        i += 2;
                        continue;
                    }
                    out.push(' ');
                }
                State::Str(quote) => {
                    if c == '\\' {
                        out.push(' ');
                        if next.is_some() {
                            out.push(' ');
                            i += 1;
                        }
                    } else if c == quote {
                        out.push(c);
                        self.state = State::Code;
                        self.last_sig = Some(c);
                        self.last_word.clear();
                    } else {
                        out.push(' ');
                    }
                }
                State::Template => {
                    if c == '\\' {
                        out.push(' ');
                        if next.is_some() {
                            out.push(' ');
                            i += 1;
                        }
                    } else if c == '`' {
                        out.push(c);
                        self.state = State::Code;
                        self.last_sig = Some(c);
                        self.last_word.clear();
                    } else if c == '$' && next == Some('{') {
                        out.push_str("  ");
                        self.template_stack.push(0);
                        self.state = State::Code;
                        self.last_sig = Some('{');
                        self.last_word.clear();
                        i += 2;
                        continue;
                    } else {
                        out.push(' ');
                    }
                }
                State::Regex { in_class } => {
                    if c == '\\' {
                        out.push(' ');
                        if next.is_some() {
                            out.push(' ');
                            i += 1;
                        }
                    } else if c == '[' {
                        out.push(' ');
                        self.state = State::Regex { in_class: true };
                    } else if c == ']' && in_class {
                        out.push(' ');
                        self.state = State::Regex { in_class: false };
                    } else if c == '/' && !in_class {
                        out.push('/');
                        self.state = State::Code;
                        // A finished literal behaves like an operand.
                        self.last_sig = Some(')');
                        self.last_word.clear();
                    } else {
                        out.push(' ');
                    }
                }
                State::Code => {
                    if c == '/' && next == Some('/') {
                        out.extend(std::iter::repeat(' ').take(chars.len() - i));
                        break;
                    }
                    if c == '/' && next == Some('*') {
                        out.push_str("  ");
                        self.state = State::BlockComment;
                        i += 2;
                        continue;
                    }
                    if c == '/' && self.regex_allowed() {
                        out.push('/');
                        self.state = State::Regex { in_class: false };
                    } else if c == '"' || c == '\'' {
                        out.push(c);
                        self.state = State::Str(c);
                    } else if c == '`' {
                        out.push(c);
                        self.state = State::Template;
                    } else if c == '}' && self.template_stack.last() == Some(&0) {
                        self.template_stack.pop();
                        out.push(' ');
                        self.state = State::Template;
                    } else {
                        if let Some(depth) = self.template_stack.last_mut() {
                            match c {
                                '{' => *depth += 1,
                                '}' => *depth -= 1,
                                _ => {}
                            }
                        }
                        out.push(c);
                        self.note_code_char(c);
                    }
                }
            }
            i += 1;
        }

        match self.state {
            State::Str(_) if !line.ends_with('\\') => self.state = State::Code,
            State::Regex { .. } => self.state = State::Code,
            _ => {}
        }
        out
    }
}

/// Mask every line of `source`. The result has exactly one entry per
/// `source.lines()` item.
pub fn mask_lines(source: &str) -> Vec<String> {
    let mut masker = Masker::default();
    source.lines().map(|line| masker.mask_line(line)).collect()
}
