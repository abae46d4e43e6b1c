use chrono::{DateTime, Duration, Utc};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Human-readable size in binary units: bytes up to 1023, then kB from 1024
/// bytes and MB from 1024 kB, each with three decimals.
///
/// Boundaries are inclusive: exactly 1024 bytes is `1.000 kB` and exactly
/// 1 MiB is `1.000 MB`. Older tooling compared with a strict `>`, which renders
/// those as `1,024 B` and `1,024.000 kB`; keep `>=`.
pub fn format_size(bytes: u64) -> String {
    if bytes >= MIB {
        format!("{} MB", format_decimal(bytes as f64 / MIB as f64, 3))
    } else if bytes >= KIB {
        format!("{} kB", format_decimal(bytes as f64 / KIB as f64, 3))
    } else {
        format!("{} B", group_thousands(bytes))
    }
}

/// `1234567` -> `"1,234,567"`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_decimal(value: f64, precision: usize) -> String {
    let fixed = format!("{:.*}", precision, value);
    match fixed.split_once('.') {
        Some((whole, frac)) => match whole.parse::<u64>() {
            Ok(n) => format!("{}.{}", group_thousands(n), frac),
            Err(_) => fixed,
        },
        None => fixed,
    }
}

/// Elapsed time as `[D day[s], ]H:MM:SS[.ffffff]`.
pub fn format_coverage_period(period: Duration) -> String {
    const MICROS_PER_DAY: i64 = 86_400 * 1_000_000;

    let total = period
        .num_microseconds()
        .unwrap_or_else(|| period.num_milliseconds().saturating_mul(1000));
    let days = total.div_euclid(MICROS_PER_DAY);
    let rem = total.rem_euclid(MICROS_PER_DAY);

    let micros = rem % 1_000_000;
    let secs = rem / 1_000_000;
    let clock = format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60);
    let clock = if micros != 0 {
        format!("{}.{:06}", clock, micros)
    } else {
        clock
    };

    match days {
        0 => clock,
        1 | -1 => format!("{} day, {}", days, clock),
        _ => format!("{} days, {}", days, clock),
    }
}

/// `2023-01-02 06:30Z`
pub fn format_run_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%MZ").to_string()
}
