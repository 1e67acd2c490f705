//! 时间格式化模块
//!
//! 提供界面上使用的三种时间展示：
//! - `format_duration`: 视频时长 `mm:ss`
//! - `format_date`: 发布日期 `May 1, 2024`
//! - `relative_time`: 评论时间 `5 minutes ago`

use chrono::{DateTime, Utc};

// =========================================================
// 时长
// =========================================================

/// 将秒数格式化为 `mm:ss`，未知时长显示为 `--:--`
///
/// 分钟数不封顶（超过一小时的视频显示为 `75:00`）。
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            let total = secs as u64;
            format!("{:02}:{:02}", total / 60, total % 60)
        }
        _ => "--:--".to_string(),
    }
}

// =========================================================
// 日期
// =========================================================

/// 长日期格式，例如 `January 5, 2024`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// 相对时间，粒度依次为秒、分钟、小时、天
pub fn relative_time(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let diff = (*now - *then).num_seconds().max(0);

    if diff < 60 {
        return format!("{} seconds ago", diff);
    }

    let (amount, unit) = if diff < 3600 {
        (diff / 60, "minute")
    } else if diff < 86_400 {
        (diff / 3600, "hour")
    } else {
        (diff / 86_400, "day")
    };

    let plural = if amount > 1 { "s" } else { "" };
    format!("{} {}{} ago", amount, unit, plural)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(0.0)), "00:00");
        assert_eq!(format_duration(Some(65.9)), "01:05");
        assert_eq!(format_duration(Some(4500.0)), "75:00");
        assert_eq!(format_duration(None), "--:--");
        assert_eq!(format_duration(Some(f64::NAN)), "--:--");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date), "January 5, 2024");
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        let cases = vec![
            (Duration::seconds(33), "33 seconds ago"),
            (Duration::minutes(1), "1 minute ago"),
            (Duration::minutes(15), "15 minutes ago"),
            (Duration::hours(10), "10 hours ago"),
            (Duration::days(1), "1 day ago"),
            (Duration::days(9), "9 days ago"),
        ];

        for (ago, expected) in cases {
            assert_eq!(relative_time(&(now - ago), &now), expected, "for {:?}", ago);
        }
    }

    #[test]
    fn future_timestamps_clamp_to_zero() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let later = now + Duration::seconds(30);
        assert_eq!(relative_time(&later, &now), "0 seconds ago");
    }
}
