/// Format seconds into MM:SS or HH:MM:SS
pub fn format_time(seconds: f64) -> String {
    let total_secs = if seconds.is_finite() {
        seconds.max(0.0) as u64
    } else {
        0
    };
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// A playback time that can be sent to or applied on a player
pub fn is_valid_time(time: f64) -> bool {
    time.is_finite() && time >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(75.9), "01:15");
        assert_eq!(format_time(3725.0), "01:02:05");
        assert_eq!(format_time(-4.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time(0.0));
        assert!(is_valid_time(42.5));
        assert!(!is_valid_time(-0.5));
        assert!(!is_valid_time(f64::NAN));
        assert!(!is_valid_time(f64::INFINITY));
    }
}
