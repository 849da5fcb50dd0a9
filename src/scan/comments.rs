//! Comment stripping for C source lines.
//!
//! The stripper is fed one line at a time and carries "inside a block comment"
//! state from one line to the next. It does not understand string literals;
//! callers only look at include directives and top-level declarations, where
//! that does not matter.

/// Removes `/* ... */` and `// ...` comments from a stream of lines.
#[derive(Debug, Clone, Default)]
pub struct CommentStripper {
    in_block: bool,
}

impl CommentStripper {
    pub fn new() -> Self {
        CommentStripper::default()
    }

    /// Whether the last line fed ended inside an unterminated block comment.
    pub fn in_block_comment(&self) -> bool {
        self.in_block
    }

    /// Strip comments from a single line.
    ///
    /// Block comments are replaced by a single space. Any number of block
    /// comments may open and close on one line; an opening without a close
    /// swallows the rest of the line and every following line up to the
    /// matching `*/`. A `//` outside a block comment truncates the line.
    pub fn strip_line(&mut self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        loop {
            if self.in_block {
                match rest.find("*/") {
                    Some(end) => {
                        rest = &rest[end + 2..];
                        self.in_block = false;
                        out.push(' ');
                    }
                    None => return out,
                }
                continue;
            }

            match (rest.find("/*"), rest.find("//")) {
                (Some(block), Some(line_comment)) if line_comment < block => {
                    out.push_str(&rest[..line_comment]);
                    return out;
                }
                (Some(block), _) => {
                    out.push_str(&rest[..block]);
                    rest = &rest[block + 2..];
                    self.in_block = true;
                }
                (None, Some(line_comment)) => {
                    out.push_str(&rest[..line_comment]);
                    return out;
                }
                (None, None) => {
                    out.push_str(rest);
                    return out;
                }
            }
        }
    }

    /// Strip comments from every line of `content`.
    pub fn strip_all(content: &str) -> Vec<String> {
        let mut stripper = CommentStripper::new();
        content.lines().map(|line| stripper.strip_line(line)).collect()
    }
}
