use crate::constant::{COMMA, COMMENT};

/// Strips commas, the line terminator and any `//` comment, then trims.
pub fn normalize_line(raw: &str) -> String {
    let mut line: String = raw.chars().filter(|c| *c != COMMA).collect();
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    if let Some(comment_index) = line.find(COMMENT) {
        line.truncate(comment_index);
    }
    line.trim().to_string()
}

/// Splits a normalized instruction line into mnemonic and operands.
pub fn split_instruction(line: &str) -> Option<(&str, Vec<&str>)> {
    let mut tokens = line.split_whitespace();
    let mnemonic = tokens.next()?;
    Some((mnemonic, tokens.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_commas_comments_and_padding() {
        assert_eq!(normalize_line("  LD64 1, MYVAR   // load\n"), "LD64 1 MYVAR");
        assert_eq!(normalize_line("PR 3, 100\r\n"), "PR 3 100");
        assert_eq!(normalize_line("A = TX_GATE | RX_GATE"), "A = TX_GATE | RX_GATE");
    }

    #[test]
    fn comment_only_line_is_empty() {
        assert_eq!(normalize_line("// setup section\n"), "");
        assert_eq!(normalize_line("   \t\n"), "");
    }

    #[test]
    fn comment_marker_inside_commas() {
        // commas go first, so `/,/` forms a comment marker
        assert_eq!(normalize_line("NOP /,/ x"), "NOP");
    }

    #[test]
    fn splits_on_any_whitespace() {
        let (mnemonic, operands) = split_instruction("LD64\t2   VAR").unwrap();
        assert_eq!(mnemonic, "LD64");
        assert_eq!(operands, vec!["2", "VAR"]);
        assert!(split_instruction("").is_none());
    }
}
