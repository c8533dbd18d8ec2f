use hexforge_core::report::Report;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// One `  <action>: <path>` line per touched file, then warnings on stderr.
pub fn print_report(report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    if report.files.is_empty() {
        println!("Nothing to do.");
    }
    for file in &report.files {
        println!("  {}: {}", file.action, file.path.display());
    }
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}
