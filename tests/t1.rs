use anyhow::Result;
use std::io::Write;
use streamini::read::entries;
use streamini::settings::DEFAULT_SETTINGS;

const INPUT: &[u8] = include_bytes!("t-input.ini");
const EXPECTED: &[u8] = include_bytes!("t-expected.txt");

#[test]
fn t1() -> Result<()> {
    let mut out = Vec::<u8>::new();
    for e in entries(&DEFAULT_SETTINGS, INPUT) {
        writeln!(out, "{}", e?)?;
    }
    assert_eq!(String::from_utf8(out)?, String::from_utf8(EXPECTED.to_vec())?);
    Ok(())
}
