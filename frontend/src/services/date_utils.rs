use chrono::NaiveDate;

/// Today's date in the local timezone; used as the default transaction date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Format a date for display, e.g. "March 14, 2025"
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_display_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(format_display_date(date), "March 4, 2025");
    }
}
