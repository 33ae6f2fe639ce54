//! WebDriver key codes (Unicode private-use points) understood by `send_keys`.

pub const BACKSPACE: char = '\u{E003}';
pub const TAB: char = '\u{E004}';
pub const ENTER: char = '\u{E007}';

/// `count` backspaces in one string.
pub fn backspaces(count: usize) -> String {
    std::iter::repeat_n(BACKSPACE, count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspaces_repeat_the_key() {
        assert_eq!(backspaces(0), "");
        let three = backspaces(3);
        assert_eq!(three.chars().count(), 3);
        assert!(three.chars().all(|c| c == BACKSPACE));
    }
}
