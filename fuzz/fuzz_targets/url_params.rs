#![no_main]

use libfuzzer_sys::fuzz_target;
use query::UrlParams;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let params = UrlParams::parse(&input);

    // Serializing is a fixed point after one pass.
    let once = params.to_string();
    let reparsed = UrlParams::parse(&once);
    assert_eq!(reparsed, params);
    assert_eq!(reparsed.to_string(), once);
});
