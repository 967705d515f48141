#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use checkit::rules::{self, Between, Length, Rule};
use checkit::value::{Key, Value};
use libfuzzer_sys::fuzz_target;

const CHECKS: &[&str] = &[
    "accepted",
    "alpha",
    "alpha_dash",
    "alpha_numeric",
    "alpha_underscore",
    "base64",
    "email",
    "integer",
    "ipv4",
    "ipv6",
    "luhn",
    "natural",
    "natural_non_zero",
    "required",
    "url",
    "uuid",
];

/// Generate an arbitrary dynamic value from fuzzer bytes.
fn arbitrary_value(u: &mut Unstructured<'_>, depth: u32) -> arbitrary::Result<Value> {
    let max = if depth == 0 { 5 } else { 8 };
    match u.int_in_range(0..=max)? {
        0 => Ok(Value::Null),
        1 => Ok(Value::Bool(bool::arbitrary(u)?)),
        2 => Ok(Value::Int(i64::arbitrary(u)?)),
        3 => Ok(Value::UInt(u64::arbitrary(u)?)),
        4 => Ok(Value::Float(f64::arbitrary(u)?)),
        5 => Ok(Value::String(String::arbitrary(u)?)),
        6 => {
            let len = u.int_in_range(0..=4)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Sequence(items))
        }
        7 => {
            let len = u.int_in_range(0..=4)?;
            let mut entries = Vec::with_capacity(len);
            for _ in 0..len {
                entries.push((Key::I8(i8::arbitrary(u)?), arbitrary_value(u, depth - 1)?));
            }
            Ok(Value::Map(entries))
        }
        _ => {
            if bool::arbitrary(u)? {
                Ok(Value::Boxed(Some(Box::new(arbitrary_value(u, depth - 1)?))))
            } else {
                Ok(Value::Boxed(None))
            }
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);

    let Ok(value) = arbitrary_value(&mut u, 3) else {
        return;
    };

    for name in CHECKS {
        if let Some(check) = rules::check_by_name(name) {
            assert!(check.evaluate(&value).is_ok(), "built-in checks never error");
        }
    }

    let _ = Between::new(-10.0, 10.0).evaluate(&value);
    let _ = Length::max(3).evaluate(&value);

    if let Ok(expression) = rules::Expression::new("value == value") {
        let _ = expression.evaluate(&value);
    }
});
