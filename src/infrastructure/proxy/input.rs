/// Ctrl+] as a lone byte.
const CTRL_RIGHT_BRACKET: u8 = 0x1d;

/// Ctrl+] under the kitty keyboard protocol: `ESC [ 9 3 ; 5 u`.
const KITTY_CTRL_RIGHT_BRACKET: &[u8] = b"\x1b[93;5u";

/// True when a stdin read is exactly the overlay toggle hotkey.
pub fn is_overlay_hotkey(data: &[u8]) -> bool {
    data == [CTRL_RIGHT_BRACKET] || data == KITTY_CTRL_RIGHT_BRACKET
}

/// True when a stdin read is shaped like a DA/DSR response: CSI-prefixed
/// and terminated by one of the response finals. Only consulted while a
/// forwarded query is waiting for its answer.
pub fn is_query_response(data: &[u8]) -> bool {
    data.len() >= 3
        && data.starts_with(b"\x1b[")
        && matches!(data.last(), Some(&b'c') | Some(&b'n') | Some(&b'R'))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Tests: hotkey detection
    // =========================================================================

    #[test]
    fn ctrl_bracket_byte_is_hotkey() {
        assert!(is_overlay_hotkey(&[0x1d]));
    }

    #[test]
    fn kitty_sequence_is_hotkey() {
        assert!(is_overlay_hotkey(b"\x1b[93;5u"));
    }

    #[test]
    fn hotkey_must_be_the_entire_read() {
        assert!(!is_overlay_hotkey(&[0x1d, b'a']));
        assert!(!is_overlay_hotkey(b"a\x1d"));
        assert!(!is_overlay_hotkey(b"\x1b[93;5ux"));
        assert!(!is_overlay_hotkey(b""));
    }

    #[test]
    fn ordinary_keys_are_not_hotkeys() {
        assert!(!is_overlay_hotkey(b"q"));
        assert!(!is_overlay_hotkey(b"\x1b"));
        assert!(!is_overlay_hotkey(b"\x1b[A"));
    }

    // =========================================================================
    // Tests: query response shape
    // =========================================================================

    #[test]
    fn da_response_is_recognized() {
        assert!(is_query_response(b"\x1b[?62;1c"));
    }

    #[test]
    fn dsr_ok_and_cursor_reports_are_recognized() {
        assert!(is_query_response(b"\x1b[0n"));
        assert!(is_query_response(b"\x1b[24;80R"));
    }

    #[test]
    fn too_short_or_unprefixed_is_not_a_response() {
        assert!(!is_query_response(b"\x1b["));
        assert!(!is_query_response(b"abc"));
        assert!(!is_query_response(b"[0n"));
    }

    #[test]
    fn wrong_final_byte_is_not_a_response() {
        assert!(!is_query_response(b"\x1b[1;5u"));
        assert!(!is_query_response(b"\x1b[0m"));
    }
}
