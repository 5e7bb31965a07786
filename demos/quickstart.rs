use chrono::{NaiveDate, TimeDelta, Utc};
use tempoch_json::{EncodingMode, Mapper};

fn main() {
    let now = Utc::now();
    let meeting = NaiveDate::from_ymd_opt(2005, 11, 5)
        .and_then(|d| d.and_hms_nano_opt(22, 31, 5, 422_829_837))
        .expect("valid date-time");
    let elapsed = TimeDelta::milliseconds(29_172_345);

    for (label, mode) in [
        ("nanoseconds", EncodingMode::DEFAULT),
        ("milliseconds", EncodingMode::MILLISECONDS),
        ("iso strings", EncodingMode::ISO_STRINGS),
    ] {
        let mapper = Mapper::from(mode);
        println!("── {label}");
        println!("  now:     {}", mapper.write_string(&now).expect("encode instant"));
        println!("  meeting: {}", mapper.write_string(&meeting).expect("encode date-time"));
        println!("  elapsed: {}", mapper.write_string(&elapsed).expect("encode duration"));
    }
}
