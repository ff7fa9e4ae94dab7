//! Spacing policy: whether one space goes between two adjacent tokens
//!
//! [`space_before`] is a pure function of a small [`SpacingState`] (the last
//! two emitted characters, the last word-like token and the angle-bracket
//! bookkeeping) and the text of the next token. Both the emitter and the
//! measurer consult it, so measured widths always match emitted ones.
//!
//! Angle brackets are classified with a lettercase heuristic: a `<` after an
//! uppercase-led name (`List<`, `Map.Entry<`), after a `.` (`Foo.<T>bar()`),
//! after a modifier (`static <T>`) or at the start of a line opens a type
//! argument list; anything else is a comparison or shift. The heuristic is
//! best effort: a single-letter uppercase value compared with `<` prints as
//! a generic.

use crate::cst::is_keyword;

/// Keywords after which `(` is separated by a space
const CONTROL_KEYWORDS: &[&str] = &[
    "if",
    "for",
    "while",
    "switch",
    "catch",
    "synchronized",
    "try",
    "return",
    "throw",
    "yield",
    "case",
    "assert",
];

/// Modifiers that may precede a generic method's type parameters
const MODIFIER_KEYWORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "abstract",
    "final",
    "native",
    "synchronized",
    "strictfp",
    "default",
];

/// How the last emitted angle bracket was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Angle {
    Generic,
    Operator,
}

/// Short-range lexical context for spacing decisions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpacingState {
    last: Option<char>,
    before_last: Option<char>,
    prev_word: String,
    angle: Option<Angle>,
    open_generics: usize,
}

impl SpacingState {
    /// Record an emitted token
    pub fn record(&mut self, text: &str) {
        self.angle = match text {
            "<" if self.opens_generic() => {
                self.open_generics += 1;
                Some(Angle::Generic)
            }
            "<" => Some(Angle::Operator),
            ">" if self.open_generics > 0 => {
                self.open_generics -= 1;
                Some(Angle::Generic)
            }
            ">" => Some(Angle::Operator),
            _ => None,
        };
        if matches!(text, ";" | "{" | "}") {
            self.open_generics = 0;
        }

        let mut chars = text.chars().rev();
        if let Some(last) = chars.next() {
            self.before_last = chars.next().or(self.last);
            self.last = Some(last);
        }
        if text.chars().next().is_some_and(is_word_char) {
            self.prev_word = text.to_string();
        }
    }

    /// Forget character context at a line break
    pub fn record_newline(&mut self) {
        self.last = None;
        self.before_last = None;
    }

    fn opens_generic(&self) -> bool {
        match self.last {
            None | Some('.') => true,
            Some(c) if is_word_char(c) => {
                looks_like_type(&self.prev_word)
                    || MODIFIER_KEYWORDS.contains(&self.prev_word.as_str())
            }
            _ => false,
        }
    }

    fn last_is_generic(&self, bracket: char) -> bool {
        self.last == Some(bracket) && self.angle == Some(Angle::Generic)
    }

    fn ends_with(&self, pair: &str) -> bool {
        let mut chars = pair.chars();
        chars.next() == self.before_last && chars.next() == self.last
    }
}

/// Word characters: identifiers, keywords and literals (quotes included)
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '"' | '\'')
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '=' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '!' | '~' | '<' | '>' | '?' | ':'
    )
}

/// Uppercase-led names are treated as types; all-caps names as constants
fn looks_like_type(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }
    let constant = word.chars().count() > 1
        && word
            .chars()
            .all(|c| c.is_uppercase() || c.is_ascii_digit() || c == '_');
    !constant
}

/// Whether a space must be emitted before `next`
pub fn space_before(state: &SpacingState, next: &str) -> bool {
    let Some(last) = state.last else {
        return false;
    };
    let Some(first) = next.chars().next() else {
        return false;
    };

    // Empty delimiter pairs
    if matches!((last, next), ('(', ")") | ('[', "]") | ('{', "}")) {
        return false;
    }
    if last == '<' && next == ">" && state.angle == Some(Angle::Generic) {
        return false;
    }

    // Closers and separators hug the previous token
    if matches!(next, "," | ";" | ")" | "]" | "." | "..." | "::") {
        return false;
    }
    if next == "}" && last == ',' {
        return false;
    }
    if state.ends_with("::") {
        return false;
    }

    // Variadic ellipsis is followed by a space, a member dot is not
    if last == '.' {
        return state.ends_with("..");
    }
    if matches!(last, '(' | '[' | '@' | '{') {
        return false;
    }

    if last == ',' {
        return true;
    }
    if last == ';' {
        return next != ";";
    }
    if last == '}' {
        return true;
    }

    if next == "->" || state.ends_with("->") {
        return true;
    }

    // Angle brackets
    if next == "<" {
        if state.opens_generic() {
            return is_word_char(last) && MODIFIER_KEYWORDS.contains(&state.prev_word.as_str());
        }
        return true;
    }
    if state.last_is_generic('<') {
        return false;
    }
    if next == ">" {
        return state.open_generics == 0;
    }
    if state.last_is_generic('>') {
        return !matches!(first, '(' | '[');
    }

    if next == "(" {
        if is_word_char(last) {
            return CONTROL_KEYWORDS.contains(&state.prev_word.as_str());
        }
        return is_operator_char(last);
    }

    if next == "?" {
        return last != '<';
    }

    if next == "++" || next == "--" {
        let postfix = (is_word_char(last) && !is_keyword(&state.prev_word))
            || matches!(last, ')' | ']');
        if postfix {
            return false;
        }
    }

    if next == "{" || first == '@' {
        return true;
    }
    if is_operator_char(first) || first == '/' {
        return true;
    }
    if is_operator_char(last) {
        return true;
    }
    if matches!(last, ')' | ']') && is_word_char(first) {
        return true;
    }
    is_word_char(last) && is_word_char(first)
}
