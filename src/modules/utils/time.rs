use chrono::DateTime;
use std::time::{SystemTime, UNIX_EPOCH};

/// Function to format timestamp as readable date
pub fn format_timestamp(timestamp: u64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Get current Unix timestamp
pub fn get_current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_formatting() {
        let timestamp = 1609459200; // 2021-01-01 00:00:00
        assert_eq!(format_timestamp(timestamp), "2021-01-01 00:00:00");
    }

    #[test]
    fn test_current_timestamp() {
        let timestamp = get_current_timestamp();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert!(timestamp > 0);
        assert!(now - timestamp < 60);
    }
}
