/// Formats an integer with the digit grouping of `locale`.
///
/// German locales (`de`, `de-DE`, `de-AT`, ...) group with `.`; every other
/// locale groups with `,`.
pub fn format_integer(value: i64, locale: &str) -> String {
    let separator = grouping_separator(locale);
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

fn grouping_separator(locale: &str) -> char {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if language == "de" { '.' } else { ',' }
}
