use crate::models::SignupRecord;

const HEADER: [&str; 3] = ["Name", "Email", "Date"];

/// Quotes a field when it contains a delimiter, a quote or a line break.
/// Embedded quotes are doubled.
pub fn escape_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn join_row(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders `Name,Email,Date` plus one line per record, in the given order.
/// Lines are joined with `\n` and there is no trailing newline.
pub fn signups_to_csv(signups: &[SignupRecord]) -> String {
    let mut lines = Vec::with_capacity(signups.len() + 1);
    lines.push(join_row(&HEADER));

    for s in signups {
        lines.push(join_row(&[s.name.as_str(), s.email.as_str(), s.date.as_str()]));
    }

    lines.join("\n")
}

/// `dr-spill-signups-YYYY-MM-DD.csv` for the given export date.
pub fn export_filename(date: chrono::NaiveDate) -> String {
    format!("dr-spill-signups-{}.csv", date.format("%Y-%m-%d"))
}
