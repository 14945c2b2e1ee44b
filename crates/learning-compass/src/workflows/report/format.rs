//! HTML rendering for summary and detailed reports.
//!
//! Templates are embedded at compile time and filled by placeholder substitution. Every
//! interpolated value passes through [`escape_html`], which also neutralizes braces so a
//! value can never be read as a later placeholder.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::views::{RenderedReport, ReportData, ReportKind};
use crate::workflows::assessment::scoring::{
    CategoryScoreView, ClassificationView, EnvironmentPreference, NOT_APPLICABLE,
};
use crate::workflows::questions::SCORE_MAX;
use crate::workflows::recommendation::{CourseRecommendation, RecommendationSource};

const SUMMARY_TEMPLATE: &str = include_str!("../../../templates/summary.html");
const DETAILED_TEMPLATE: &str = include_str!("../../../templates/detailed.html");

const UPGRADE_NOTE: &str = "The detailed report adds the full ranking, your ideal learning environment, \
recommended courses with learning journeys, career affinities, college suggestions, and global exams.";

pub struct ReportFormatter;

impl ReportFormatter {
    /// Free report: highlights, score bars, and tips.
    pub fn summary(data: &ReportData) -> RenderedReport {
        let mut output = SUMMARY_TEMPLATE.to_string();
        output = fill_common(output, ReportKind::Summary, data);
        output = output.replace("{{upgrade_note}}", &escape_html(UPGRADE_NOTE));
        finish(ReportKind::Summary, data, output)
    }

    /// Paid report: the summary plus ranking, environment, and recommendations.
    pub fn detailed(data: &ReportData) -> RenderedReport {
        let mut output = DETAILED_TEMPLATE.to_string();
        output = fill_common(output, ReportKind::Detailed, data);

        let mut ranking = String::new();
        ranking_table(&mut ranking, data.learning_style.as_ref());
        ranking_table(&mut ranking, data.cognitive_strength.as_ref());
        if ranking.is_empty() {
            ranking.push_str("<p>No scored categories.</p>\n");
        }
        output = output.replace("{{ranking}}", &ranking);

        output = output.replace("{{environment}}", &environment_html(data));

        let record = &data.recommendation;
        let source = match record.source {
            RecommendationSource::Tailored => "Tailored to your learning style and grade",
            RecommendationSource::Default => "General recommendations for your grade band",
        };
        output = output.replace("{{recommendation_source}}", &escape_html(source));
        output = output.replace("{{learning_path}}", &escape_html(record.learning_path));
        output = output.replace("{{courses}}", &courses_html(&record.courses));
        output = output.replace("{{careers}}", &list_html(&record.career_affinities));
        output = output.replace("{{colleges}}", &list_html(&record.college_recommendations));
        output = output.replace("{{exams}}", &list_html(&record.global_exams));

        finish(ReportKind::Detailed, data, output)
    }
}

fn finish(kind: ReportKind, data: &ReportData, body: String) -> RenderedReport {
    RenderedReport {
        kind,
        file_name: kind.file_name(&data.assessment_id),
        content_type: mime::TEXT_HTML_UTF_8,
        body,
    }
}

fn fill_common(mut output: String, kind: ReportKind, data: &ReportData) -> String {
    output = output.replace("{{title}}", &escape_html(kind.title()));
    output = output.replace("{{student_id}}", &escape_html(&data.student_id.0));
    output = output.replace("{{assessment_id}}", &escape_html(&data.assessment_id.0));
    output = output.replace("{{grade}}", &escape_html(data.grade.label()));
    output = output.replace("{{grade_band}}", &escape_html(data.grade_band.label()));
    output = output.replace(
        "{{completed_at}}",
        &escape_html(&data.completed_at.map_or_else(|| "-".to_string(), format_date)),
    );
    output = output.replace("{{generated_at}}", &escape_html(&format_date(data.generated_at)));

    let (primary_style, secondary_style) = highlight(data.learning_style.as_ref());
    let (primary_strength, secondary_strength) = highlight(data.cognitive_strength.as_ref());
    output = output.replace("{{primary_style}}", &escape_html(primary_style));
    output = output.replace("{{secondary_style}}", &escape_html(secondary_style));
    output = output.replace("{{primary_strength}}", &escape_html(primary_strength));
    output = output.replace("{{secondary_strength}}", &escape_html(secondary_strength));

    output = output.replace("{{style_bars}}", &score_bars(&data.learning_style_scores));
    output = output.replace("{{strength_bars}}", &score_bars(&data.cognitive_strength_scores));
    output = output.replace("{{tips}}", &list_html(&data.tips));
    output
}

fn format_date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn highlight(view: Option<&ClassificationView>) -> (&'static str, &'static str) {
    match view {
        Some(view) => (view.primary_label, view.secondary_label),
        None => (NOT_APPLICABLE, NOT_APPLICABLE),
    }
}

fn score_bars(scores: &[CategoryScoreView]) -> String {
    if scores.is_empty() {
        return "<p>No responses in this family.</p>\n".to_string();
    }

    let mut html = String::new();
    for score in scores {
        let width = (score.mean / SCORE_MAX * 100.0).clamp(0.0, 100.0);
        let _ = writeln!(
            html,
            "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
             <span class=\"bar\"><span class=\"bar-fill\" style=\"display:block;width:{width:.0}%\"></span></span>\
             <span class=\"bar-value\">{:.1}</span></div>",
            escape_html(score.label),
            score.mean,
        );
    }
    html
}

fn ranking_table(html: &mut String, view: Option<&ClassificationView>) {
    let Some(view) = view else {
        return;
    };

    let _ = writeln!(html, "<h3>{}</h3>", escape_html(view.family.label()));
    html.push_str("<table>\n<tr><th>Rank</th><th>Category</th><th>Mean</th></tr>\n");
    for (index, entry) in view.ranking.iter().enumerate() {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{:.1}</td></tr>",
            index + 1,
            escape_html(entry.label),
            entry.mean
        );
    }
    html.push_str("</table>\n");
}

fn environment_html(data: &ReportData) -> String {
    let mut html = String::from("<table>\n");
    let rows: [(&str, &EnvironmentPreference); 2] = [
        ("Structure", &data.environment.structure),
        ("Social setting", &data.environment.social),
    ];
    for (label, preference) in rows {
        let _ = writeln!(
            html,
            "<tr><th>{}</th><td>{}</td><td>{:.1}</td></tr>",
            escape_html(label),
            escape_html(preference.description),
            preference.score
        );
    }
    html.push_str("</table>\n");
    html
}

fn courses_html(courses: &[CourseRecommendation]) -> String {
    let mut html = String::new();
    for course in courses {
        html.push_str("<div class=\"course\">\n");
        let _ = writeln!(
            html,
            "<h3>{}</h3>\n<p class=\"meta\">{} &middot; {} &middot; {} weeks</p>\n<p>{}</p>",
            escape_html(course.name),
            escape_html(course.subject),
            escape_html(course.difficulty_label),
            course.duration_weeks,
            escape_html(course.description),
        );
        html.push_str("<ol class=\"journey\">\n");
        for step in &course.learning_journey {
            let _ = writeln!(
                html,
                "<li><strong>{}</strong>: {} ({} weeks). Skills: {}</li>",
                escape_html(&step.title),
                escape_html(step.description),
                step.duration_weeks,
                escape_html(&step.skills.join(", ")),
            );
        }
        html.push_str("</ol>\n</div>\n");
    }
    html
}

fn list_html(items: &[&str]) -> String {
    if items.is_empty() {
        return "<p>None at this grade level.</p>\n".to_string();
    }
    let mut html = String::from("<ul>\n");
    for item in items {
        let _ = writeln!(html, "<li>{}</li>", escape_html(item));
    }
    html.push_str("</ul>\n");
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_markup_and_placeholder_braces() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b> {{tips}}"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt; &#123;&#123;tips&#125;&#125;"
        );
    }

    #[test]
    fn empty_lists_render_a_placeholder_sentence() {
        assert!(list_html(&[]).contains("None at this grade level"));
        assert!(score_bars(&[]).contains("No responses"));
    }

    #[test]
    fn templates_only_use_known_placeholders() {
        for template in [SUMMARY_TEMPLATE, DETAILED_TEMPLATE] {
            assert!(template.contains("{{title}}"));
            assert!(template.contains("{{style_bars}}"));
        }
        assert!(!SUMMARY_TEMPLATE.contains("{{courses}}"));
        assert!(DETAILED_TEMPLATE.contains("{{courses}}"));
    }
}
