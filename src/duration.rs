/// (seconds, singular, plural), largest unit first.
/// A month is 28 days and a year is twelve of those.
const UNITS: [(u64, &str, &str); 7] = [
    (29_030_400, "year", "years"),
    (2_419_200, "month", "months"),
    (604_800, "week", "weeks"),
    (86_400, "day", "days"),
    (3_600, "hour", "hours"),
    (60, "minute", "minutes"),
    (1, "second", "seconds"),
];

/// Turn a number of seconds into something like `1 minute 45 seconds`.
///
/// Units are emitted largest first and zero counts are skipped, so `0`
/// gives an empty string.
pub fn humanize_seconds(seconds: u64) -> String {
    let mut remaining = seconds;
    let mut parts = Vec::new();
    for (unit, singular, plural) in UNITS {
        let count = remaining / unit;
        if count > 0 {
            let name = if count == 1 { singular } else { plural };
            parts.push(format!("{} {}", count, name));
            remaining -= count * unit;
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize_seconds() {
        assert_eq!(humanize_seconds(1), "1 second");
        assert_eq!(humanize_seconds(45), "45 seconds");
        assert_eq!(humanize_seconds(45 + 60), "1 minute 45 seconds");
        assert_eq!(humanize_seconds(45 + 60 * 2), "2 minutes 45 seconds");
        assert_eq!(humanize_seconds(60 * 60), "1 hour");
        assert_eq!(humanize_seconds(60 * 60 * 2), "2 hours");
        assert_eq!(humanize_seconds(60 * 60 * 24), "1 day");
        assert_eq!(humanize_seconds(60 * 60 * 24 * 2), "2 days");
        assert_eq!(humanize_seconds(60 * 60 * 24 * 7), "1 week");
        assert_eq!(humanize_seconds(60 * 60 * 24 * 14), "2 weeks");
        assert_eq!(humanize_seconds(60 * 60 * 24 * 28), "1 month");
        assert_eq!(humanize_seconds(60 * 60 * 24 * 28 * 2), "2 months");
        assert_eq!(humanize_seconds(60 * 60 * 24 * 28 * 12), "1 year");
        assert_eq!(humanize_seconds(60 * 60 * 24 * 28 * 12 * 2), "2 years");
    }

    #[test]
    fn test_zero_is_empty() {
        assert_eq!(humanize_seconds(0), "");
    }

    #[test]
    fn test_units_descend_without_zero_counts() {
        let names: Vec<&str> = UNITS.iter().map(|(_, _, plural)| *plural).collect();
        for seconds in [59, 61, 3_601, 90_061, 694_861, 31_536_000, 123_456_789] {
            let output = humanize_seconds(seconds);
            let fragments: Vec<&str> = output.split(' ').collect();
            let mut last_index = None;
            for pair in fragments.chunks(2) {
                let count: u64 = pair[0].parse().unwrap();
                assert!(count > 0, "zero fragment in {:?}", output);
                let unit = pair[1].trim_end_matches('s');
                let index = names
                    .iter()
                    .position(|name| name.trim_end_matches('s') == unit)
                    .unwrap();
                if let Some(last) = last_index {
                    assert!(index > last, "units out of order in {:?}", output);
                }
                last_index = Some(index);
            }
        }
    }
}
