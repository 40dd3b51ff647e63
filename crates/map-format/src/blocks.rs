//! Brace-delimited block splitting.

/// A `{ ... }` block with its non-blank, non-comment lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    /// 1-based line of the opening brace.
    pub line: usize,
    /// `(line number, trimmed text)` pairs.
    pub lines: Vec<(usize, &'a str)>,
}

/// What a block describes, judged by its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Entity,
    Brush,
    Other,
}

impl Block<'_> {
    pub fn kind(&self) -> BlockKind {
        match self.lines.first().map(|(_, text)| text.chars().next()) {
            Some(Some('"')) => BlockKind::Entity,
            Some(Some('(')) => BlockKind::Brush,
            _ => BlockKind::Other,
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, text)| text.contains(needle))
    }
}

/// Split `text` into blocks in order of their opening braces.
///
/// A brace delimits only as a standalone token: a line may open with `{` or end with
/// `}` around other content, but braces glued to a word (`{fence`) are text. A nested
/// block (a brush inside an entity) is returned as its own block and its lines are not
/// part of the parent.
pub fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks: Vec<Block<'_>> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let mut rest = raw.trim();
        if rest.starts_with("//") {
            continue;
        }
        while let Some(after) = strip_open(rest) {
            open.push(blocks.len());
            blocks.push(Block {
                line,
                lines: Vec::new(),
            });
            rest = after;
        }
        let mut closes = 0;
        while let Some(before) = strip_close(rest) {
            closes += 1;
            rest = before;
        }
        if !rest.is_empty() {
            match open.last() {
                Some(&current) => blocks[current].lines.push((line, rest)),
                None => tracing::debug!(line, "text outside any block"),
            }
        }
        for _ in 0..closes {
            if open.pop().is_none() {
                tracing::debug!(line, "unmatched closing brace");
            }
        }
    }
    blocks
}

// Leading `{` token, and the trimmed text after it.
fn strip_open(text: &str) -> Option<&str> {
    let after = text.strip_prefix('{')?;
    (after.is_empty() || after.starts_with(char::is_whitespace)).then(|| after.trim_start())
}

// Trailing `}` token, and the trimmed text before it.
fn strip_close(text: &str) -> Option<&str> {
    let before = text.strip_suffix('}')?;
    (before.is_empty() || before.ends_with(char::is_whitespace)).then(|| before.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks_are_separate() {
        let text = "// level\n{\n\"classname\" \"worldspawn\"\n{\n( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) a 0 0 0 1 1\n}\n\"wad\" \"x.wad\"\n}\n";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].line, 2);
        assert_eq!(blocks[0].kind(), BlockKind::Entity);
        assert_eq!(
            blocks[0].lines,
            vec![(3, "\"classname\" \"worldspawn\""), (7, "\"wad\" \"x.wad\"")]
        );
        assert_eq!(blocks[1].line, 4);
        assert_eq!(blocks[1].kind(), BlockKind::Brush);
        assert_eq!(blocks[1].lines.len(), 1);
    }

    #[test]
    fn test_braces_inside_names_do_not_split() {
        let text = "{\n( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) {fence 0 0 0 1 1\n( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) }weird 0 0 0 1 1\n}";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines.len(), 2);
    }

    #[test]
    fn test_unbalanced_braces_are_tolerated() {
        let blocks = split_blocks("}\n{\n\"a\" \"b\"\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind(), BlockKind::Entity);
        assert!(blocks[0].contains("\"a\""));
    }

    #[test]
    fn test_comment_lines_are_skipped() {
        let blocks = split_blocks("{\n// brush 0\n( 1 2 3 )\n}");
        assert_eq!(blocks[0].lines, vec![(3, "( 1 2 3 )")]);
        assert_eq!(blocks[0].kind(), BlockKind::Brush);
    }

    #[test]
    fn test_braces_sharing_a_line_with_content() {
        let text = "{ \"classname\" \"worldspawn\"\n{\n( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) {fence 0 0 0 1 1 }\n\"wad\" \"x.wad\" }\n{ \"classname\" \"light\" }\n";
        let blocks = split_blocks(text);
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0].lines,
            vec![(1, "\"classname\" \"worldspawn\""), (4, "\"wad\" \"x.wad\"")]
        );
        assert_eq!(blocks[1].line, 2);
        assert_eq!(blocks[1].lines, vec![(3, "( 0 0 0 ) ( 0 1 0 ) ( 1 0 0 ) {fence 0 0 0 1 1")]);
        assert_eq!(blocks[2].line, 5);
        assert_eq!(blocks[2].lines, vec![(5, "\"classname\" \"light\"")]);
    }
}
