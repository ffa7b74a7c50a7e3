#![no_main]

use libfuzzer_sys::fuzz_target;
use plydata::PlyData;

fuzz_target!(|data: &[u8]| {
    // We are only interested in panics or other even worse crashes. It's
    // fine if the parser says "this is not a valid PLY file".
    if let Ok(ply) = PlyData::from_bytes(data) {
        // Touch every stored value once to exercise the accessors, too. The
        // row count is taken from the column since elements without
        // properties may claim any count.
        for elem in ply.elements() {
            for (name, column) in elem.property_names().zip(elem.columns()) {
                for row in 0..column.len() {
                    let _ = elem.get(row, name);
                }
            }
        }
    }
});
