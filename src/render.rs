use crate::model::report::{Report, ReportEntry};
use crate::util::html::escape;

pub const REPORT_NAME: &str = "Rally Accepted Stories";

const STYLE: &str = r#"
    table { border-collapse: collapse; width: 100%; font-family: Arial, sans-serif; }
    th { background-color: #0078d4; color: white; padding: 12px; text-align: left; border: 1px solid #ddd; }
    td { padding: 10px; border: 1px solid #ddd; }
    tr:nth-child(even) { background-color: #f2f2f2; }
    h2 { color: #0078d4; font-family: Arial, sans-serif; }
    .story-id { font-weight: bold; color: #0078d4; }
    .summary { margin-top: 20px; padding: 10px; background-color: #e8f4f8; border-left: 4px solid #0078d4; }
"#;

const COLUMNS: &[&str] = &["Story ID", "Title", "Date Completed", "Story Points", "Role"];

/// Render the report as a self-contained HTML document.
pub fn render_html(report: &Report) -> String {
    if report.is_empty() {
        return render_empty();
    }

    let mut html = String::new();
    html.push_str("<html>\n<head>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!("<h2>{REPORT_NAME}</h2>\n"));
    html.push_str("<table>\n<thead>\n<tr>\n");
    for column in COLUMNS {
        html.push_str(&format!("<th>{column}</th>\n"));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for entry in &report.entries {
        render_row(&mut html, entry);
    }

    html.push_str("</tbody>\n</table>\n");
    html.push_str(&format!(
        "<div class=\"summary\"><strong>Summary:</strong> {} story(ies) accepted | Total Story Points: {}</div>\n",
        report.count(),
        format_points(report.total_effort)
    ));
    html.push_str("</body>\n</html>\n");
    html
}

fn render_empty() -> String {
    format!(
        "<html>\n<body>\n<h2>{REPORT_NAME}</h2>\n<p>No newly accepted stories found.</p>\n</body>\n</html>\n"
    )
}

fn render_row(html: &mut String, entry: &ReportEntry) {
    html.push_str(&format!(
        "<tr><td class=\"story-id\">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape(&entry.item.id),
        escape(&entry.item.title),
        escape(&entry.completed.display()),
        format_points(entry.item.effort_points()),
        escape(&entry.role.to_string()),
    ));
}

/// Story points without a trailing `.0` for whole numbers.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 {
        format!("{points:.0}")
    } else {
        points.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::report::RoleSet;
    use crate::model::work_item::WorkItem;
    use crate::util::date::CompletionDate;
    use chrono::NaiveDate;

    fn entry(id: &str, title: &str, completed: CompletionDate, effort: Option<f64>) -> ReportEntry {
        ReportEntry {
            item: WorkItem {
                id: id.to_string(),
                title: title.to_string(),
                completed_at: None,
                effort,
                status: Some("Accepted".into()),
                primary_owner: None,
                secondary_owner: None,
                project: None,
            },
            completed,
            role: RoleSet::new(true, true),
        }
    }

    fn june_first() -> CompletionDate {
        CompletionDate::At(
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, 5, 0)
                .unwrap(),
        )
    }

    fn sample_report() -> Report {
        Report::new(vec![
            entry("US12", "Checkout flow", june_first(), Some(3.0)),
            entry("US7", "Login <SSO> & MFA", CompletionDate::Missing, None),
        ])
    }

    #[test]
    fn empty_report_renders_no_items_message() {
        let html = render_html(&Report::default());
        assert!(html.contains("No newly accepted stories found."));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn populated_report_has_rows_and_footer() {
        let html = render_html(&sample_report());
        assert!(html.contains("<table>"));
        assert!(!html.contains("No newly accepted stories found."));
        assert!(html.contains("<td class=\"story-id\">US12</td><td>Checkout flow</td><td>06/01/2024 09:05 AM</td><td>3</td><td>Primary &amp; Pairing Partner</td>"));
        assert!(html.contains("<td>N/A</td><td>0</td>"));
        assert!(html.contains("2 story(ies) accepted | Total Story Points: 3"));
    }

    #[test]
    fn titles_are_escaped() {
        let html = render_html(&sample_report());
        assert!(html.contains("Login &lt;SSO&gt; &amp; MFA"));
        assert!(!html.contains("<SSO>"));
    }

    #[test]
    fn populated_document_layout() {
        let html = render_html(&sample_report());
        assert!(html.starts_with("<html>\n<head>\n<style>"));
        assert!(html.contains("<h2>Rally Accepted Stories</h2>\n<table>"));
        assert_eq!(html.matches("<th>").count(), 5);
        assert_eq!(html.matches("<tr><td class=\"story-id\">").count(), 2);
        assert!(html.ends_with("</div>\n</body>\n</html>\n"));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render_html(&sample_report()), render_html(&sample_report()));
    }

    #[test]
    fn points_formatting() {
        assert_eq!(format_points(0.0), "0");
        assert_eq!(format_points(8.0), "8");
        assert_eq!(format_points(2.5), "2.5");
    }
}
