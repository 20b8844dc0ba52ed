use anyhow::Result;
use std::io::Write;

use crate::report::{BlockerRef, JobRecord, Outcome, Summary};

/// Renders the full HTML report document.
///
/// Self-contained page with inline CSS: header line, summary block, and
/// one table row per classified job with links to the job, its last
/// completed build, and every blocker that has a browse URL.
pub fn render_report(
    header: &str,
    rows: &[JobRecord],
    summary: &Summary,
    output: &mut dyn Write,
) -> Result<()> {
    writeln!(output, "<!DOCTYPE html>")?;
    writeln!(output, "<html lang=\"en\">")?;
    writeln!(output, "<head>")?;
    writeln!(output, "    <meta charset=\"UTF-8\">")?;
    writeln!(output, "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">")?;
    writeln!(output, "    <title>Jenkins CI Report</title>")?;
    writeln!(output, "    <style>")?;
    writeln!(output, "        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 40px; background: #f5f5f5; }}")?;
    writeln!(output, "        .container {{ max-width: 1200px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }}")?;
    writeln!(output, "        h1 {{ color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }}")?;
    writeln!(output, "        h2 {{ color: #34495e; margin-top: 30px; }}")?;
    writeln!(output, "        .summary {{ background: #ecf0f1; padding: 20px; border-radius: 5px; margin: 20px 0; }}")?;
    writeln!(output, "        table {{ width: 100%; border-collapse: collapse; margin: 20px 0; }}")?;
    writeln!(output, "        th, td {{ padding: 12px; text-align: left; border-bottom: 1px solid #ddd; }}")?;
    writeln!(output, "        th {{ background: #3498db; color: white; }}")?;
    writeln!(output, "        tr:nth-child(even) {{ background: #f8f9fa; }}")?;
    writeln!(output, "        .good {{ color: #27ae60; }}")?;
    writeln!(output, "        .warning {{ color: #f39c12; }}")?;
    writeln!(output, "        .bad {{ color: #e74c3c; }}")?;
    writeln!(output, "        .result {{ font-weight: bold; }}")?;
    writeln!(output, "    </style>")?;
    writeln!(output, "</head>")?;
    writeln!(output, "<body>")?;
    writeln!(output, "    <div class=\"container\">")?;
    writeln!(output, "        <h1>📬 Jenkins CI Report</h1>")?;
    writeln!(output, "        <p>{header}</p>")?;

    writeln!(output, "        <div class=\"summary\">")?;
    writeln!(output, "            <h2>Summary</h2>")?;
    writeln!(output, "            <p>{}</p>", summary.success_line())?;
    writeln!(output, "            <p>{}</p>", summary.unstable_line())?;
    writeln!(output, "            <p>{}</p>", summary.failure_line())?;
    if let Some(error_line) = summary.error_line() {
        writeln!(output, "            <p>{error_line}</p>")?;
    }
    writeln!(output, "            <p>{}</p>", summary.bugs_line())?;
    writeln!(output, "            <p>{}</p>", summary.tickets_line())?;
    writeln!(output, "        </div>")?;

    writeln!(output, "        <h2>Jobs</h2>")?;
    writeln!(output, "        <table>")?;
    writeln!(output, "            <thead>")?;
    writeln!(output, "                <tr>")?;
    writeln!(output, "                    <th>Version</th>")?;
    writeln!(output, "                    <th>Job</th>")?;
    writeln!(output, "                    <th>Last Completed Build</th>")?;
    writeln!(output, "                    <th>Result</th>")?;
    writeln!(output, "                    <th>Blocker Bugs</th>")?;
    writeln!(output, "                    <th>Blocker Tickets</th>")?;
    writeln!(output, "                </tr>")?;
    writeln!(output, "            </thead>")?;
    writeln!(output, "            <tbody>")?;

    for row in rows {
        let result_class = match row.outcome {
            Outcome::Success => "good",
            Outcome::Unstable => "warning",
            Outcome::Failure | Outcome::Error => "bad",
        };
        writeln!(output, "                <tr>")?;
        writeln!(output, "                    <td>{}</td>", row.version)?;
        writeln!(
            output,
            "                    <td><a href=\"{}\">{}</a></td>",
            row.url, row.name
        )?;
        writeln!(
            output,
            "                    <td><a href=\"{}\">#{}</a></td>",
            row.build_url, row.build_number
        )?;
        writeln!(
            output,
            "                    <td class=\"result {}\">{}</td>",
            result_class,
            row.outcome.label()
        )?;
        write_blocker_cell(output, &row.bugs)?;
        write_blocker_cell(output, &row.tickets)?;
        writeln!(output, "                </tr>")?;
    }

    writeln!(output, "            </tbody>")?;
    writeln!(output, "        </table>")?;

    writeln!(output, "        <footer style=\"margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; color: #666; text-align: center;\">")?;
    writeln!(
        output,
        "            <p>buildbrief v{}</p>",
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(output, "        </footer>")?;
    writeln!(output, "    </div>")?;
    writeln!(output, "</body>")?;
    writeln!(output, "</html>")?;

    Ok(())
}

fn write_blocker_cell(output: &mut dyn Write, blockers: &[BlockerRef]) -> Result<()> {
    write!(output, "                    <td>")?;
    for (i, blocker) in blockers.iter().enumerate() {
        if i > 0 {
            write!(output, "<br>")?;
        }
        match blocker.url() {
            Some(url) => write!(output, "<a href=\"{url}\">{}</a>", blocker.name())?,
            None => write!(output, "{}", blocker.name())?,
        }
    }
    writeln!(output, "</td>")?;
    Ok(())
}
