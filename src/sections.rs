//! Section Parser - TITLE / DESCRIPTION / TAG extraction
//!
//! A line-oriented state machine. Each section moves Idle -> Collecting -> Done
//! exactly once; the first occurrence of a section wins.
//! Parsing never fails: missing or unterminated sections just yield
//! empty or partial text and the caller decides what to do with it.

use crate::artifact::ReleaseRecord;

/// Literal token that closes a section.
pub const END_MARKER: &str = "//ASYNC_END";

/// Prefixes that mark a line as a comment outside of a section body.
pub const COMMENT_PREFIXES: [&str; 2] = ["#", "//"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Title,
    Description,
    Tag,
}

impl SectionKind {
    /// Start tokens are tried in this order.
    pub const ALL: [SectionKind; 3] = [Self::Title, Self::Description, Self::Tag];

    pub fn start_token(self) -> &'static str {
        match self {
            Self::Title => "TITLE:",
            Self::Description => "DESCRIPTION:",
            Self::Tag => "TAG:",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Title => 0,
            Self::Description => 1,
            Self::Tag => 2,
        }
    }

    /// Returns the text following the start token if `line` opens this section.
    fn strip_start<'a>(self, line: &'a str) -> Option<&'a str> {
        let token = self.start_token();
        let head = line.get(..token.len())?;
        if head.eq_ignore_ascii_case(token) {
            Some(&line[token.len()..])
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SectionState {
    #[default]
    Idle,
    Collecting,
    Done,
}

/// Raw parser output. Escapes are decoded, but fields are not yet trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    pub title: String,
    pub description: String,
    pub tag: String,
}

impl ParsedSections {
    /// Strip leftover end markers and surrounding whitespace.
    pub fn into_record(self) -> ReleaseRecord {
        ReleaseRecord {
            title: clean_field(&self.title),
            description: clean_field(&self.description),
            tag: clean_field(&self.tag),
        }
    }
}

fn clean_field(text: &str) -> String {
    text.replace(END_MARKER, "").trim().to_string()
}

#[derive(Debug, Default)]
struct SectionParser {
    states: [SectionState; 3],
    buffers: [String; 3],
}

impl SectionParser {
    fn collecting(&self) -> bool {
        self.states.contains(&SectionState::Collecting)
    }

    /// Sections are visited in `SectionKind::ALL` order; the first one that
    /// either starts on this line or is collecting takes the line.
    fn feed(&mut self, raw: &str) {
        let line = raw.trim();

        // Inside a section body every line is content, comments included.
        if !self.collecting() && is_comment(line) {
            return;
        }

        for kind in SectionKind::ALL {
            match self.states[kind.index()] {
                SectionState::Idle => {
                    if let Some(rest) = kind.strip_start(line) {
                        self.start_section(kind, line, rest);
                        return;
                    }
                }
                SectionState::Collecting => {
                    self.continue_section(kind, line);
                    return;
                }
                SectionState::Done => {}
            }
        }
    }

    fn start_section(&mut self, kind: SectionKind, line: &str, rest: &str) {
        let content = rest.replace(END_MARKER, "");
        let buffer = &mut self.buffers[kind.index()];
        buffer.clear();
        buffer.push_str(content.trim());
        if kind == SectionKind::Description {
            buffer.push('\n');
        }

        if line.contains(END_MARKER) {
            self.states[kind.index()] = SectionState::Done;
        } else {
            self.states[kind.index()] = SectionState::Collecting;
        }
    }

    fn continue_section(&mut self, kind: SectionKind, line: &str) {
        let (part, closed) = match line.split_once(END_MARKER) {
            Some((before, _)) => (before.trim(), true),
            None => (line, false),
        };

        let buffer = &mut self.buffers[kind.index()];
        match kind {
            SectionKind::Description => {
                buffer.push_str(part);
                buffer.push('\n');
            }
            SectionKind::Title | SectionKind::Tag => {
                buffer.push(' ');
                buffer.push_str(part);
            }
        }

        if closed {
            self.states[kind.index()] = SectionState::Done;
        }
    }

    fn finish(self) -> ParsedSections {
        let [title, description, tag] = self.buffers;
        ParsedSections {
            title: decode_escapes(&title),
            description: decode_escapes(&description),
            tag: decode_escapes(&tag),
        }
    }
}

fn is_comment(line: &str) -> bool {
    COMMENT_PREFIXES.iter().any(|p| line.starts_with(p))
}

/// Parse template text into its three sections.
///
/// An unterminated section keeps whatever was collected before end of input.
pub fn parse_sections(text: &str) -> ParsedSections {
    let mut parser = SectionParser::default();
    for line in text.split('\n') {
        parser.feed(line);
    }
    parser.finish()
}

/// Decode backslash escape sequences into the characters they name.
///
/// Unknown or malformed escapes are kept as written.
pub fn decode_escapes(input: &str) -> String {
    if !input.contains('\\') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(&next) = chars.peek() else {
            out.push('\\');
            break;
        };

        let simple = match next {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'v' => Some('\u{0B}'),
            _ => None,
        };
        if let Some(decoded) = simple {
            chars.next();
            out.push(decoded);
            continue;
        }

        match next {
            '\n' => {
                chars.next();
            }
            '0'..='7' => {
                let mut digits = String::new();
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(&d) if d.is_digit(8) => {
                            digits.push(d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                chars.next();
                let digits: String = chars
                    .clone()
                    .take(width)
                    .take_while(|d| d.is_ascii_hexdigit())
                    .collect();
                let decoded = if digits.len() == width {
                    u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(ch) => {
                        for _ in 0..width {
                            chars.next();
                        }
                        out.push(ch);
                    }
                    None => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            }
            _ => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_sections() {
        let text = "TITLE: My Title//ASYNC_END\nDESCRIPTION: My Description//ASYNC_END\nTAG: v1.0.0//ASYNC_END";
        let parsed = parse_sections(text);
        assert_eq!(parsed.title, "My Title");
        assert_eq!(parsed.description, "My Description\n");
        assert_eq!(parsed.tag, "v1.0.0");
    }

    #[test]
    fn test_section_order_does_not_matter() {
        let text = "TAG: v2//ASYNC_END\nDESCRIPTION: Body//ASYNC_END\nTITLE: Heading//ASYNC_END";
        let record = parse_sections(text).into_record();
        assert_eq!(record.title, "Heading");
        assert_eq!(record.description, "Body");
        assert_eq!(record.tag, "v2");
    }

    #[test]
    fn test_multiline_description_keeps_line_breaks() {
        let text = "\n    TITLE: Title//ASYNC_END\n    DESCRIPTION: Line1\n    Line2\n    //ASYNC_END\n    TAG: tag//ASYNC_END\n";
        let parsed = parse_sections(text);
        assert_eq!(parsed.description, "Line1\nLine2\n\n");
        assert_eq!(parsed.tag, "tag");
        assert_eq!(parsed.into_record().description, "Line1\nLine2");
    }

    #[test]
    fn test_multiline_title_and_tag_join_with_spaces() {
        let text = "TITLE: First\nSecond\nThird//ASYNC_END\nTAG: v1\nbeta//ASYNC_END";
        let parsed = parse_sections(text);
        assert_eq!(parsed.title, "First Second Third");
        assert_eq!(parsed.tag, "v1 beta");
    }

    #[test]
    fn test_start_token_is_case_insensitive() {
        let parsed = parse_sections("  title:   Lower//ASYNC_END  \nTag: v3//ASYNC_END");
        assert_eq!(parsed.title, "Lower");
        assert_eq!(parsed.tag, "v3");
    }

    #[test]
    fn test_comments_skipped_outside_sections() {
        let text = "# TITLE: Commented//ASYNC_END\n// TAG: nope//ASYNC_END\nTITLE: Real//ASYNC_END";
        let parsed = parse_sections(text);
        assert_eq!(parsed.title, "Real");
        assert_eq!(parsed.tag, "");
    }

    #[test]
    fn test_comment_lines_inside_section_are_content() {
        let text = "DESCRIPTION: Intro\n# Heading\n// not a comment here//ASYNC_END";
        let parsed = parse_sections(text);
        assert_eq!(parsed.description, "Intro\n# Heading\n// not a comment here\n");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "TITLE: First//ASYNC_END\nTITLE: Second//ASYNC_END\nTITLE: Third";
        let parsed = parse_sections(text);
        assert_eq!(parsed.title, "First");
    }

    #[test]
    fn test_idle_section_starts_inside_open_description() {
        let text = "DESCRIPTION: Body\nTITLE: Heading//ASYNC_END\nmore//ASYNC_END\nTAG: v1//ASYNC_END";
        let parsed = parse_sections(text);
        assert_eq!(parsed.title, "Heading");
        assert_eq!(parsed.description, "Body\nmore\n");
        assert_eq!(parsed.tag, "v1");
    }

    #[test]
    fn test_open_title_takes_lines_before_open_description() {
        let text = "DESCRIPTION: Body\nTITLE: Long\nheading//ASYNC_END\nrest//ASYNC_END";
        let parsed = parse_sections(text);
        assert_eq!(parsed.title, "Long heading");
        assert_eq!(parsed.description, "Body\nrest\n");
    }

    #[test]
    fn test_closed_section_token_is_content_of_open_one() {
        let text = "TITLE: First//ASYNC_END\nDESCRIPTION: Body\nTITLE: Again//ASYNC_END";
        let parsed = parse_sections(text);
        assert_eq!(parsed.title, "First");
        assert_eq!(parsed.description, "Body\nTITLE: Again\n");
    }

    #[test]
    fn test_later_start_tokens_are_content_while_collecting() {
        let text = "DESCRIPTION: Body\nTAG: swallowed//ASYNC_END\nTAG: real//ASYNC_END";
        let parsed = parse_sections(text);
        assert_eq!(parsed.description, "Body\nTAG: swallowed\n");
        assert_eq!(parsed.tag, "real");
    }

    #[test]
    fn test_unterminated_section_keeps_partial_content() {
        let parsed = parse_sections("TITLE: Open\nstill going");
        assert_eq!(parsed.title, "Open still going");
        assert_eq!(parsed.into_record().title, "Open still going");
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let parsed = parse_sections("# only comments\n\nrandom text");
        assert_eq!(parsed, ParsedSections::default());
        assert_eq!(parsed.into_record(), ReleaseRecord::EMPTY);
    }

    #[test]
    fn test_marker_in_middle_of_start_line_is_stripped() {
        let parsed = parse_sections("TITLE: a//ASYNC_END b");
        assert_eq!(parsed.title, "a b");
    }

    #[test]
    fn test_escapes_decoded_after_parse() {
        let parsed = parse_sections(r"DESCRIPTION: one\ntwo\tthree//ASYNC_END");
        assert_eq!(parsed.description, "one\ntwo\tthree\n");
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_escapes("plain"), "plain");
        assert_eq!(decode_escapes(r"a\\b"), r"a\b");
        assert_eq!(decode_escapes(r"\x41é\U0001F600"), "Aé😀");
        assert_eq!(decode_escapes(r"\101"), "A");
        assert_eq!(decode_escapes(r"keep \q and \xZZ"), r"keep \q and \xZZ");
        assert_eq!(decode_escapes("trailing \\"), "trailing \\");
        assert_eq!(decode_escapes("joined \\\nline"), "joined line");
    }
}
