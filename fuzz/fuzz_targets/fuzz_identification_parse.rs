#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(ids) = facturacr::xml::read_identifications(s) {
            for parsed in ids {
                assert_eq!(parsed.identification.number().len(), 12);
            }
        }
    }
});
