//! HTML dashboard generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use crate::report::{StudyReport, TopicAccuracy};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML dashboard from a study report.
pub fn generate_html(report: &StudyReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>studyforge report — {}</title>\n",
        html_escape(&report.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} concepts | {} subconcepts | {} topics answered | {}</p>\n",
        report.concepts.total_main_concepts,
        report.concepts.total_subconcepts,
        report.topic_stats.len(),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str(&format!(
        "<p class=\"mastery\">Mastery: <strong>{}</strong>{}</p>\n",
        report.mastery,
        report
            .aggregate_accuracy
            .map(|a| format!(" ({:.1}%)", a * 100.0))
            .unwrap_or_default()
    ));
    html.push_str("</header>\n");

    // Study plan
    html.push_str("<section class=\"plan\">\n");
    html.push_str("<h2>Study plan</h2>\n");
    html.push_str("<div class=\"tiers\">\n");
    for (tier, members) in report.tiers.iter() {
        html.push_str(&format!(
            "<div class=\"tier tier-{}\">\n<h3>{}</h3>\n<ul>\n",
            tier.to_string().to_lowercase(),
            tier
        ));
        if members.is_empty() {
            html.push_str("<li class=\"empty\">no topics</li>\n");
        }
        for topic in members {
            html.push_str(&format!("<li>{}</li>\n", html_escape(topic)));
        }
        html.push_str("</ul>\n</div>\n");
    }
    html.push_str("</div>\n");
    html.push_str("</section>\n");

    // Accuracy chart
    if !report.topic_stats.is_empty() {
        html.push_str("<section class=\"accuracy\">\n");
        html.push_str("<h2>Accuracy by topic</h2>\n");
        html.push_str(&generate_bar_chart(&report.topic_stats));
        html.push_str("</section>\n");
    }

    // Weak topics
    html.push_str("<section class=\"weak\">\n");
    html.push_str(&format!(
        "<h2>Weak topics (below {:.0}%)</h2>\n",
        report.weak_threshold * 100.0
    ));
    if report.weak_topics.is_empty() {
        html.push_str("<p>No weak topics.</p>\n");
    } else {
        html.push_str("<table class=\"weak-table\" id=\"weak\">\n");
        html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Topic</th><th onclick=\"sortTable(1)\">Accuracy</th><th onclick=\"sortTable(2)\">Questions</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for w in &report.weak_topics {
            html.push_str(&format!(
                "<tr class=\"fail\"><td>{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
                html_escape(&w.topic),
                w.accuracy * 100.0,
                w.questions
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML dashboard to a file.
pub fn write_html_report(report: &StudyReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(stats: &[TopicAccuracy]) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 240;

    let total_height = stats.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, stat) in stats.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (stat.accuracy * max_width as f64) as usize;

        // Same bands as the mastery levels.
        let color = if stat.accuracy >= 0.9 {
            "#22c55e"
        } else if stat.accuracy >= 0.7 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&stat.topic)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}% ({}/{})</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            stat.accuracy * 100.0,
            stat.correct,
            stat.total
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --fail: #fde2e2;
  --bronze: #cd7f32; --silver: #9ca3af; --gold: #d4a017; --platinum: #7dd3fc; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.mastery { font-size: 1.25rem; }
.tiers { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
.tier { border: 1px solid var(--border); border-top-width: 6px; border-radius: 8px; padding: 0 1rem; }
.tier-bronze { border-top-color: var(--bronze); }
.tier-silver { border-top-color: var(--silver); }
.tier-gold { border-top-color: var(--gold); }
.tier-platinum { border-top-color: var(--platinum); }
.empty { color: #6b7280; font-style: italic; list-style: none; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('weak');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    if (!isNaN(na) && !isNaN(nb)) return asc ? na - nb : nb - na;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use studyforge_core::planner::DifficultyPlanner;
    use studyforge_core::tracker::PerformanceTracker;

    fn make_test_report() -> StudyReport {
        let mut tracker = PerformanceTracker::new();
        tracker.record([("Cells <intro>", true), ("Cells <intro>", false), ("Genes", true)]);
        StudyReport::build(
            "Biology & Life",
            "## Cells <intro>\n- membrane\n## Genes\n- alleles",
            &tracker,
            &DifficultyPlanner::default(),
            0.7,
        )
        .unwrap()
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Biology &amp; Life"));
        assert!(html.contains("Bronze"));
        assert!(html.contains("Platinum"));
        assert!(html.contains("Genes"));
        assert!(html.contains("Weak topics"));
    }

    #[test]
    fn html_escapes_topic_names() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("Cells &lt;intro&gt;"));
        assert!(!html.contains("<li>Cells <intro></li>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
