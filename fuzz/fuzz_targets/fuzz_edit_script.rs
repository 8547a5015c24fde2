#![no_main]
use injector_core::{Calibrator, Field, fmt_value};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Edit {
    Append,
    Update { row: u8, field: u8, raw: String },
    Include { row: u8, included: bool },
    Remove { row: u8 },
}

fuzz_target!(|edits: Vec<Edit>| {
    // Any edit sequence must keep the store non-empty and never panic on recompute.
    let mut cal = Calibrator::new();
    for e in edits {
        let n = cal.rows().len();
        match e {
            Edit::Append => {
                cal.append();
            }
            Edit::Update { row, field, raw } => {
                let id = cal.rows()[row as usize % n].id;
                let field = Field::ALL[field as usize % Field::ALL.len()];
                let _ = cal.update(id, field, &raw);
            }
            Edit::Include { row, included } => {
                let id = cal.rows()[row as usize % n].id;
                let _ = cal.set_include(id, included);
            }
            Edit::Remove { row } => {
                let id = cal.rows()[row as usize % n].id;
                let _ = cal.remove(id);
            }
        }
        assert!(!cal.rows().is_empty());
    }
    let rep = cal.report();
    assert!(!fmt_value(rep.summary.deadtime_ms, 1).contains("NaN"));
});
