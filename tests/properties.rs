//! Property tests over generated documents.

use proptest::prelude::*;
use streamini::parse::DecodeError;
use streamini::read::{read, read_ini};
use streamini::settings::DEFAULT_SETTINGS;
use streamini::value::{Entry, Values};

fn decode(input: &str) -> Result<Vec<Entry>, DecodeError> {
    let mut out = Vec::new();
    read(&DEFAULT_SETTINGS, input.as_bytes(), &mut out)?;
    Ok(out)
}

fn single(input: &str) -> Option<(String, String)> {
    let mut es = decode(input).ok()?;
    if es.len() != 1 {
        return None
    }
    es.pop().map(|e| (e.key, e.value))
}

// Write `s` as the body of a quoted string, escaping what has to be
// and some of what doesn't.
fn quote(s: &str) -> String {
    let mut out = String::new();
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if (c as u32) > 0xFFFF => out.push_str(&format!("\\U{:08X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

proptest! {
    #[test]
    fn lone_keys_are_flags(
        key in "[a-z][a-z0-9_.-]{0,8}",
        before in "[ \t\n]{0,3}",
        after in "[ \t]{0,3}",
        comment in proptest::option::of("[;#][ a-z]{0,8}"),
    ) {
        let input = format!("{before}{key}{after}{}", comment.unwrap_or_default());
        prop_assert_eq!(single(&input), Some((key, "1".to_string())));
    }

    #[test]
    fn quoted_values_survive_escaping(s in any::<String>()) {
        let input = format!("k = \"{}\"", quote(&s));
        prop_assert_eq!(single(&input), Some(("k".to_string(), s)));
    }

    #[test]
    fn raw_values_only_double_backquotes(s in any::<String>()) {
        let input = format!("k = `{}`\n", s.replace('`', "``"));
        prop_assert_eq!(single(&input), Some(("k".to_string(), s)));
    }

    #[test]
    fn plain_values_are_trimmed(
        value in "[a-z]{1,5}( [a-z]{1,5}){0,3}",
        before in "[ \t]{0,3}",
        after in "[ \t\r]{0,3}",
    ) {
        let input = format!("k ={before}{value}{after}\n");
        prop_assert_eq!(single(&input), Some(("k".to_string(), value)));
    }

    #[test]
    fn errors_report_their_line(n in 0usize..20) {
        let mut input = String::new();
        for i in 0..n {
            input.push_str(&format!("k{i}\n"));
        }
        input.push_str("b = \"\\xZZ\"\n");
        let e = read_ini(input.as_bytes(), None).unwrap_err();
        prop_assert_eq!(e.syntax().map(|e| e.line()), Some(n as u32 + 1));
    }

    #[test]
    fn documents_merge_in_order(
        values in proptest::collection::vec("[a-z]{1,6}", 1..6),
    ) {
        let input: String = values.iter()
            .map(|v| format!("k = {v}\n"))
            .collect();
        let got = read_ini(input.as_bytes(), Some(Values::new())).unwrap();
        prop_assert_eq!(got.get_all("k").map(|vs| vs.to_vec()), Some(values));
    }
}
