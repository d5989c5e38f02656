use chrono::{DateTime, Local, TimeZone};

pub fn format_timestamp(timestamp_ms: i64) -> String {
    let datetime: DateTime<Local> = match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(dt) => dt,
        None => return "-".to_string(),
    };

    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn preview_text(input: &str, max_len: usize) -> String {
    if input.chars().count() <= max_len {
        return input.to_string();
    }

    let mut preview = input.chars().take(max_len).collect::<String>();
    preview.push('…');
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_leaves_short_text_alone() {
        assert_eq!(preview_text("short", 10), "short");
    }

    #[test]
    fn preview_truncates_long_text() {
        let preview = preview_text("abcdefghij", 4);
        assert_eq!(preview, "abcd…");
    }

    #[test]
    fn invalid_timestamp_renders_dash() {
        assert_eq!(format_timestamp(i64::MAX), "-");
    }
}
