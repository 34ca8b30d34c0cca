#![no_main]

use demo_schema::DemoScreen;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    let parser = DemoScreen::Alerts.parser();

    // Any query decodes; its object re-encodes to the same state.
    let result = parser.from_query(&input);
    let object = result.to_object();
    assert_eq!(parser.from_object(&object), result);

    // Deltas are stable.
    let delta = parser.delta_params(result.params());
    assert_eq!(parser.delta_params(delta.params()), delta);
});
