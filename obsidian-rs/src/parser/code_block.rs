//! Code span detection, so links inside code are not treated as links.

/// A byte range of the text that is code (fenced block or inline span).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Whether this is a fenced block (vs an inline span).
    pub is_fenced: bool,
}

struct Fence {
    marker: char,
    len: usize,
    start: usize,
}

/// Find all fenced blocks and inline code spans, sorted by start offset.
///
/// An unclosed fence runs to the end of the text. Inline spans close on a
/// backtick run of the same length on the same line.
pub fn find_code_ranges(content: &str) -> Vec<CodeRange> {
    let mut ranges = Vec::new();
    let mut open: Option<Fence> = None;
    let mut offset = 0;

    for raw_line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim_start();

        if let Some(fence) = &open {
            if let Some((marker, len)) = fence_marker(trimmed) {
                if marker == fence.marker
                    && len >= fence.len
                    && trimmed.trim_end().chars().all(|c| c == marker)
                {
                    ranges.push(CodeRange {
                        start: fence.start,
                        end: line_start + line.len(),
                        is_fenced: true,
                    });
                    open = None;
                }
            }
            continue;
        }

        if let Some((marker, len)) = fence_marker(trimmed) {
            open = Some(Fence {
                marker,
                len,
                start: line_start,
            });
            continue;
        }

        push_inline_spans(line, line_start, &mut ranges);
    }

    if let Some(fence) = open {
        ranges.push(CodeRange {
            start: fence.start,
            end: content.len(),
            is_fenced: true,
        });
    }

    ranges.sort_by_key(|r| r.start);
    ranges
}

/// Recognize a ``` or ~~~ fence (three or more) at the start of a line.
fn fence_marker(trimmed: &str) -> Option<(char, usize)> {
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some((marker, len))
}

fn push_inline_spans(line: &str, line_start: usize, ranges: &mut Vec<CodeRange>) {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }

        let open_start = i;
        while i < bytes.len() && bytes[i] == b'`' {
            i += 1;
        }
        let run = i - open_start;

        // Look for a closing run of exactly the same length.
        let mut j = i;
        let mut closed = None;
        while j < bytes.len() {
            if bytes[j] == b'`' {
                let close_start = j;
                while j < bytes.len() && bytes[j] == b'`' {
                    j += 1;
                }
                if j - close_start == run {
                    closed = Some(j);
                    break;
                }
            } else {
                j += 1;
            }
        }

        if let Some(end) = closed {
            ranges.push(CodeRange {
                start: line_start + open_start,
                end: line_start + end,
                is_fenced: false,
            });
            i = end;
        }
    }
}

/// Check if a byte offset is inside any code range.
pub fn is_in_code(offset: usize, ranges: &[CodeRange]) -> bool {
    ranges.iter().any(|r| offset >= r.start && offset < r.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_code_block() {
        let content = "Some text\n\n```rust\nlet x = [[not a link]];\n```\n\nMore text";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert!(ranges[0].is_fenced);
        assert!(is_in_code(content.find("[[").unwrap(), &ranges));
        assert!(!is_in_code(content.find("More").unwrap(), &ranges));
    }

    #[test]
    fn test_inline_code() {
        let content = "Some `inline [[code]]` here";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert!(!ranges[0].is_fenced);
    }

    #[test]
    fn test_double_backtick_inline() {
        let content = "Some ``inline `code` with backticks`` here";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert_eq!(&content[ranges[0].start..ranges[0].end], "``inline `code` with backticks``");
    }

    #[test]
    fn test_tilde_and_backtick_fences() {
        let content = "```\nouter\n```\n\ntext\n\n~~~\ninner\n~~~";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 2);
        assert!(ranges.iter().all(|r| r.is_fenced));
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let content = "intro\n```\n[[hidden]]\n";
        let ranges = find_code_ranges(content);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].end, content.len());
    }

    #[test]
    fn test_unmatched_backtick_is_text() {
        let content = "a ` b [[link]]";
        assert!(find_code_ranges(content).is_empty());
    }
}
