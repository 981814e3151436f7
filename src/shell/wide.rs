//! UTF-16 helpers for the fixed-size text fields of tray entries.

/// Capacity of the tooltip field, terminator included.
pub const TOOLTIP_CAPACITY: usize = 128;
/// Capacity of the balloon message field, terminator included.
pub const INFO_CAPACITY: usize = 256;
/// Capacity of the balloon title field, terminator included.
pub const INFO_TITLE_CAPACITY: usize = 64;

/// NUL-terminated UTF-16 copy of `text`.
#[must_use]
pub fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Copies `text` into `dst` as UTF-16, truncated so the terminator fits and a
/// surrogate pair is never split. Returns the number of code units written,
/// terminator excluded.
pub fn fill_fixed(dst: &mut [u16], text: &str) -> usize {
    let Some(room) = dst.len().checked_sub(1) else {
        return 0;
    };
    let mut written = 0;
    for ch in text.chars() {
        let mut units = [0_u16; 2];
        let encoded = ch.encode_utf16(&mut units);
        if written + encoded.len() > room {
            break;
        }
        dst[written..written + encoded.len()].copy_from_slice(encoded);
        written += encoded.len();
    }
    dst[written] = 0;
    written
}
