use std::borrow::Cow;

/// Cắt chuỗi còn `max_chars` ký tự đầu và thêm `"..."`; chuỗi đủ ngắn giữ nguyên.
///
/// Đếm theo `char` (Unicode scalar value), không theo grapheme cluster, nên
/// một ký hiệu ghép từ nhiều scalar có thể bị cắt đôi.
pub fn truncate_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
    }
}
