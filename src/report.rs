//! Static HTML briefing renderer.
//!
//! Pure string templating over fully-resolved [`IndexSummary`] values; no
//! I/O, no clock access, no failure mode. The generation timestamp and the
//! requested run date are caller-supplied so the output is deterministic.

use chrono::NaiveDate;

use crate::models::IndexSummary;

/// Items per table row-group. Each group renders a header row of index names
/// and a value row of close/arrow/percentage cells.
const COLUMNS: usize = 2;

/// Render the full briefing document.
///
/// `requested_date` is the explicit `--target-date` override when one was
/// given; the footer labels an automatic run otherwise.
pub fn render_html(
    domestic_items: &[IndexSummary],
    overseas_items: &[IndexSummary],
    generated_at: &str,
    requested_date: Option<NaiveDate>,
) -> String {
    let all_items: Vec<&IndexSummary> = domestic_items.iter().chain(overseas_items).collect();

    let base_date_text = all_items
        .iter()
        .filter_map(|item| item.base_date)
        .max()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "확인 불가".to_string());
    let request_date_text = requested_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "자동(오늘 실행)".to_string());

    let failed: Vec<&&IndexSummary> = all_items.iter().filter(|i| i.error.is_some()).collect();
    let warning = if failed.is_empty() {
        String::new()
    } else {
        let details = failed
            .iter()
            .map(|item| {
                format!(
                    "{}: {}",
                    html_escape(&item.name),
                    html_escape(item.error.as_deref().unwrap_or(""))
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "<p class=\"warning\">일부 데이터를 불러오지 못했습니다 ({details}).</p>"
        )
    };

    format!(
        r#"<!doctype html>
<html lang="ko">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>전일 시장 요약</title>
    <style>{css}</style>
  </head>
  <body>
    <h1>전일 시장 요약</h1>
    {domestic}
    {overseas}
    <p class="meta">요청 실행일: {request_date}</p>
    <p class="meta">기준 거래일: {base_date}</p>
    <p class="meta">생성 시각: {generated_at}</p>
    {warning}
  </body>
</html>
"#,
        css = inline_css(),
        domestic = render_section("국내", domestic_items),
        overseas = render_section("해외", overseas_items),
        request_date = request_date_text,
        base_date = base_date_text,
        generated_at = generated_at,
        warning = warning,
    )
}

fn render_section(title: &str, items: &[IndexSummary]) -> String {
    format!(
        "<h2>{title}</h2>\n<table>{rows}</table>",
        title = title,
        rows = render_table_rows(items),
    )
}

fn render_table_rows(items: &[IndexSummary]) -> String {
    let mut rows = Vec::new();
    for group in items.chunks(COLUMNS) {
        let header_row: String = group
            .iter()
            .map(|item| format!("<th>{}</th>", html_escape(&item.name)))
            .collect();
        let value_row: String = group
            .iter()
            .map(|item| {
                format!(
                    "<td><span class=\"{class}\">{close} {arrow} {pct}</span></td>",
                    class = item.direction.css_class(),
                    close = format_close(item.close),
                    arrow = item.direction.arrow(),
                    pct = format_pct(item.change_pct),
                )
            })
            .collect();
        rows.push(format!("<tr>{}</tr>", header_row));
        rows.push(format!("<tr>{}</tr>", value_row));
    }
    rows.join("\n")
}

/// Thousands-grouped close value with two decimals, or a placeholder.
pub fn format_close(value: Option<f64>) -> String {
    let Some(value) = value else {
        return "N/A".to_string();
    };
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Absolute percentage with two decimals; the sign is carried by the arrow
/// and color class, not a minus sign.
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.2}%", value.abs()),
        None => "N/A".to_string(),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn inline_css() -> &'static str {
    r#"
      body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Noto Sans KR", sans-serif;
        margin: 24px;
        color: #222;
      }
      h1 { margin: 0 0 24px; }
      h2 { margin: 24px 0 8px; }
      table {
        width: 100%;
        max-width: 720px;
        border-collapse: collapse;
        border-top: 1px solid #666;
        margin-bottom: 24px;
      }
      th, td {
        width: 50%;
        border: 1px solid #d6d6d6;
        text-align: center;
        padding: 14px 10px;
        font-size: 30px;
      }
      th { font-weight: 700; background: #fafafa; }
      .up { color: #f44336; }
      .down { color: #1976d2; }
      .flat { color: #444; }
      .na { color: #888; }
      .meta { color: #666; font-size: 20px; margin: 6px 0; }
      .warning { color: #b26a00; font-size: 18px; max-width: 720px; }
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChangeDirection;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summary(name: &str, close: f64, pct: f64, base: NaiveDate) -> IndexSummary {
        IndexSummary {
            name: name.to_string(),
            close: Some(close),
            change_pct: Some(pct),
            direction: ChangeDirection::from_change_pct(pct),
            base_date: Some(base),
            error: None,
        }
    }

    #[test]
    fn test_format_close() {
        assert_eq!(format_close(Some(2500.12)), "2,500.12");
        assert_eq!(format_close(Some(38905.66)), "38,905.66");
        assert_eq!(format_close(Some(1234567.891)), "1,234,567.89");
        assert_eq!(format_close(Some(987.5)), "987.50");
        assert_eq!(format_close(None), "N/A");
    }

    #[test]
    fn test_format_pct_is_unsigned() {
        assert_eq!(format_pct(Some(0.81)), "0.81%");
        assert_eq!(format_pct(Some(-1.234)), "1.23%");
        assert_eq!(format_pct(None), "N/A");
    }

    #[test]
    fn test_render_is_deterministic() {
        let domestic = vec![summary("코스피", 2500.12, 0.81, date(2024, 3, 14))];
        let overseas = vec![summary("다우 산업", 38905.66, -0.35, date(2024, 3, 14))];

        let a = render_html(&domestic, &overseas, "2024-03-15 07:30", Some(date(2024, 3, 15)));
        let b = render_html(&domestic, &overseas, "2024-03-15 07:30", Some(date(2024, 3, 15)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_value_cells_carry_class_and_arrow() {
        let domestic = vec![
            summary("코스피", 2500.12, 0.81, date(2024, 3, 14)),
            summary("코스닥", 850.00, -0.50, date(2024, 3, 14)),
        ];
        let html = render_html(&domestic, &[], "t", None);

        assert!(html.contains("<span class=\"up\">2,500.12 ▲ 0.81%</span>"));
        assert!(html.contains("<span class=\"down\">850.00 ▼ 0.50%</span>"));
        // Two items fit one row-group: one header row, one value row.
        assert!(html.contains("<tr><th>코스피</th><th>코스닥</th></tr>"));
    }

    #[test]
    fn test_as_of_date_is_max_base_date() {
        let domestic = vec![summary("코스피", 2500.12, 0.81, date(2024, 3, 13))];
        let overseas = vec![summary("다우 산업", 38905.66, 0.10, date(2024, 3, 14))];
        let html = render_html(&domestic, &overseas, "t", None);

        assert!(html.contains("기준 거래일: 2024-03-14"));
    }

    #[test]
    fn test_as_of_placeholder_when_no_base_dates() {
        let domestic = vec![IndexSummary::unavailable("코스피", "boom")];
        let html = render_html(&domestic, &[], "t", None);

        assert!(html.contains("기준 거래일: 확인 불가"));
        assert!(html.contains("class=\"na\">N/A - N/A</span>"));
    }

    #[test]
    fn test_footer_requested_date_labels() {
        let html = render_html(&[], &[], "t", Some(date(2024, 3, 15)));
        assert!(html.contains("요청 실행일: 2024-03-15"));

        let html = render_html(&[], &[], "t", None);
        assert!(html.contains("요청 실행일: 자동(오늘 실행)"));
    }

    #[test]
    fn test_single_consolidated_warning_line() {
        let domestic = vec![summary("코스피", 2500.12, 0.81, date(2024, 3, 14))];
        let overseas = vec![
            IndexSummary::unavailable("상해 종합", "request failed: timeout"),
            IndexSummary::unavailable("니케이225", "not-enough-close-values"),
        ];
        let html = render_html(&domestic, &overseas, "t", None);

        assert_eq!(html.matches("class=\"warning\"").count(), 1);
        assert!(html.contains(
            "일부 데이터를 불러오지 못했습니다 (상해 종합: request failed: timeout, 니케이225: not-enough-close-values)."
        ));
    }

    #[test]
    fn test_no_warning_when_all_resolved() {
        let domestic = vec![summary("코스피", 2500.12, 0.81, date(2024, 3, 14))];
        let html = render_html(&domestic, &[], "t", None);
        assert!(!html.contains("class=\"warning\""));
        assert!(!html.contains("일부 데이터를 불러오지 못했습니다"));
    }

    #[test]
    fn test_error_text_is_escaped() {
        let overseas = vec![IndexSummary::unavailable("니케이225", "bad <tag> & stuff")];
        let html = render_html(&[], &overseas, "t", None);
        assert!(html.contains("bad &lt;tag&gt; &amp; stuff"));
    }
}
