#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    if let Ok(doc) = checkit::parse(&s) {
        if let Ok(validator) = doc.build() {
            let _ = validator.validate(&checkit::Value::Null);
        }
    }
});
