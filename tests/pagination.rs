mod common;

use common::{RecordingCanvas, entries, fixed_config, fixed_date, insight, record, report};
use goal_report_pdf::{ReportData, render_report};
use goal_report_pdf::chrome::{ChromeText, PageChrome};
use goal_report_pdf::layout::{Cursor, FooterStamp, PageFlow, PageGeometry};

fn flow_fixture() -> (RecordingCanvas, PageChrome, PageGeometry) {
    let g = PageGeometry::a4();
    let canvas = RecordingCanvas::new(g.width, g.height);
    let chrome = PageChrome::new(ChromeText::default(), fixed_date(), g);
    (canvas, chrome, g)
}

#[test]
fn reserve_keeps_a_block_that_exactly_fits() {
    let (mut canvas, chrome, g) = flow_fixture();
    let mut flow = PageFlow::new(&mut canvas, &chrome, g, FooterStamp::Deferred);
    let top = flow.begin();
    let near_end = Cursor {
        y: g.content_limit() - 50.0,
        ..top
    };
    let c = flow.reserve(near_end, 50.0);
    assert_eq!(c, near_end);
    assert_eq!(flow.finish().unwrap(), 1);
}

#[test]
fn reserve_breaks_when_a_block_would_cross_the_footer() {
    let (mut canvas, chrome, g) = flow_fixture();
    let mut flow = PageFlow::new(&mut canvas, &chrome, g, FooterStamp::Deferred);
    let top = flow.begin();
    let near_end = Cursor {
        y: g.content_limit() - 50.0,
        ..top
    };
    let c = flow.reserve(near_end, 50.5);
    assert_eq!(c.page, 1);
    assert!((c.y - g.content_top()).abs() < 1e-4);
    assert_eq!(flow.finish().unwrap(), 2);
    // Header on both pages, footer on both pages.
    assert_eq!(canvas.count_text("Aivora"), 2);
    assert_eq!(canvas.texts_on(0).iter().filter(|t| t.starts_with("Page ")).count(), 1);
    assert!(canvas.texts_on(1).contains(&"Page 2 of 2"));
    assert!(canvas.texts_on(1).contains(&chrome.date_label()));
}

#[test]
fn reserve_at_the_top_of_a_page_never_breaks() {
    let (mut canvas, chrome, g) = flow_fixture();
    let mut flow = PageFlow::new(&mut canvas, &chrome, g, FooterStamp::Deferred);
    let top = flow.begin();
    assert!(flow.at_page_top(top));
    let c = flow.reserve(top, g.page_room() * 3.0);
    assert_eq!(c, top);
    assert!(!flow.at_page_top(top.advance(5.0)));
    assert_eq!(flow.finish().unwrap(), 1);
}

#[test]
fn immediate_footers_need_the_right_total() {
    let (mut canvas, chrome, g) = flow_fixture();
    let footers = FooterStamp::Immediate { total_pages: 3 };
    let mut flow = PageFlow::new(&mut canvas, &chrome, g, footers);
    flow.begin();
    assert!(flow.finish().is_err());
}

#[test]
fn immediate_footers_stamp_pages_as_they_close() {
    let (mut canvas, chrome, g) = flow_fixture();
    let footers = FooterStamp::Immediate { total_pages: 2 };
    let mut flow = PageFlow::new(&mut canvas, &chrome, g, footers);
    let top = flow.begin();
    flow.reserve(top.advance(10.0), g.page_room());
    assert_eq!(flow.finish().unwrap(), 2);
    assert_eq!(canvas.page_of("Page 1 of 2"), Some(0));
    assert_eq!(canvas.page_of("Page 2 of 2"), Some(1));
}

#[test]
fn no_block_straddles_the_footer_strip() {
    let data = report(entries(40, |_| true), vec![insight(5)]);
    let config = fixed_config();
    let (canvas, pages) = record(&data, &config);
    assert!(pages >= 2);

    let limit = config.geometry.content_limit();
    for r in &canvas.ops {
        if r.op.top() < limit {
            assert!(
                r.op.bottom() <= limit + 1e-3,
                "op on page {} crosses the footer: {:?}",
                r.page + 1,
                r.op
            );
        }
        assert!(r.page < pages);
    }
}

#[test]
fn every_page_has_header_and_footer() {
    let data = report(entries(40, |_| true), vec![insight(3)]);
    let (canvas, pages) = record(&data, &fixed_config());
    for page in 0..pages {
        let texts = canvas.texts_on(page);
        assert!(texts.contains(&"Aivora"), "no header on page {}", page + 1);
        assert!(texts.contains(&"Goal Achievement Report"));
        assert!(texts.contains(&"Oct 19, 2026"));
        assert!(texts.contains(&"Generated by Aivora"));
        let label = format!("Page {} of {}", page + 1, pages);
        assert!(texts.contains(&label.as_str()), "missing {label}");
    }
}

#[test]
fn table_lists_the_last_ten_completed_days() {
    // 14 completed days out of 20: the first row is the 5th completed entry.
    let done = |d: u32| d <= 14;
    let data = report(entries(20, done), Vec::new());
    let (canvas, _) = record(&data, &fixed_config());

    let rows: Vec<&str> = canvas
        .texts()
        .into_iter()
        .filter(|t| t.starts_with("note for day"))
        .collect();
    let expected: Vec<String> = (5..=14).map(|d| format!("note for day {d}")).collect();
    assert_eq!(rows, expected);
    assert_eq!(canvas.count_text("Done"), 10);
}

#[test]
fn table_header_repeats_after_a_break() {
    let data = report(entries(14, |_| true), Vec::new());
    let (canvas, pages) = record(&data, &fixed_config());
    assert_eq!(pages, 2);
    assert_eq!(canvas.count_text("Comment"), 2);
    assert_eq!(canvas.page_of("Daily Progress Summary"), Some(0));
    // Section title is drawn once, on the page where the table starts.
    assert_eq!(canvas.count_text("Daily Progress Summary"), 1);
}

#[test]
fn empty_table_still_draws_its_header() {
    let data = report(entries(5, |_| false), Vec::new());
    let (canvas, _) = record(&data, &fixed_config());
    assert_eq!(canvas.count_text("Daily Progress Summary"), 1);
    assert_eq!(canvas.count_text("Day"), 1);
    assert_eq!(canvas.count_text("Done"), 0);
}

#[test]
fn missing_comments_render_a_placeholder() {
    let mut progress = entries(3, |_| true);
    progress[1].comment = None;
    progress[2].comment = Some("x".repeat(50));
    let data = report(progress, Vec::new());
    let (canvas, _) = record(&data, &fixed_config());
    assert_eq!(canvas.count_text("No comment"), 1);
    let preview = format!("{}...", "x".repeat(32));
    assert_eq!(canvas.count_text(&preview), 1);
}

#[test]
fn whitespace_comments_are_shown_as_written() {
    let mut progress = entries(3, |_| true);
    progress[0].comment = Some("   ".into());
    progress[1].comment = Some(String::new());
    let data = report(progress, Vec::new());
    let (canvas, _) = record(&data, &fixed_config());
    assert_eq!(canvas.count_text("No comment"), 1);
    assert_eq!(canvas.count_text("   "), 1);
}

/// Checks that a long insight flows over several pages: nothing crosses the
/// footer strip, no page is left with only its chrome, and every copy of
/// `word` is drawn exactly once.
fn assert_flows_cleanly(data: &ReportData, word: &str, copies: usize) {
    let config = fixed_config();
    let (canvas, pages) = record(data, &config);
    let g = config.geometry;
    let limit = g.content_limit();

    for r in &canvas.ops {
        if r.op.top() < limit {
            assert!(
                r.op.bottom() <= limit + 1e-3,
                "op on page {} crosses the footer: top={} bottom={}",
                r.page + 1,
                r.op.top(),
                r.op.bottom()
            );
        }
    }
    for page in 0..pages {
        let has_content = canvas.ops.iter().any(|r| {
            r.page == page && r.op.top() >= g.content_top() - 1e-3 && r.op.top() < limit
        });
        assert!(has_content, "page {} holds only header and footer", page + 1);
    }
    let drawn: usize = canvas
        .texts()
        .iter()
        .map(|t| t.split_whitespace().filter(|w| *w == word).count())
        .sum();
    assert_eq!(drawn, copies);

    // The drawing pass paginates the same way as the recorded layout.
    let doc = render_report(data, &config).expect("render");
    assert_eq!(doc.page_count(), pages);
}

#[test]
fn summary_longer_than_a_page_continues_on_the_next() {
    let mut long = insight(1);
    long.summary = "word ".repeat(2000);
    let data = report(entries(3, |_| true), vec![long]);
    assert_flows_cleanly(&data, "word", 2000);
}

#[test]
fn oversized_highlight_is_split_by_lines() {
    let mut long = insight(1);
    long.highlights = vec!["lorem ".repeat(2500)];
    let data = report(entries(3, |_| true), vec![long]);
    assert_flows_cleanly(&data, "lorem", 2500);

    let (canvas, _) = record(&data, &fixed_config());
    let bullets = canvas
        .ops
        .iter()
        .filter(|r| matches!(r.op, common::Op::Circle { .. }))
        .count();
    // One dot per item, not one per page the highlight spans.
    assert_eq!(bullets, 3);
}

#[test]
fn long_description_is_split_by_lines() {
    let mut data = report(entries(3, |_| true), Vec::new());
    data.goal.description = Some("stride ".repeat(3000));
    assert_flows_cleanly(&data, "stride", 3000);
}

#[test]
fn insight_lists_are_capped_at_three() {
    let data = report(entries(3, |_| true), vec![insight(5)]);
    let (canvas, _) = record(&data, &fixed_config());
    let texts = canvas.texts();
    for kind in ["highlight", "recommendation", "blocker"] {
        let n = texts.iter().filter(|t| t.starts_with(kind)).count();
        assert_eq!(n, 3, "{kind}");
    }
    assert!(!texts.contains(&"highlight 4"));
    assert_eq!(canvas.count_text("Motivation 72/100"), 1);
}

#[test]
fn empty_insight_lists_are_omitted() {
    let mut only_highlights = insight(2);
    only_highlights.recommendations.clear();
    only_highlights.blockers.clear();
    let data = report(entries(3, |_| true), vec![only_highlights]);
    let (canvas, _) = record(&data, &fixed_config());
    assert_eq!(canvas.count_text("Highlights"), 1);
    assert_eq!(canvas.count_text("Recommendations"), 0);
    assert_eq!(canvas.count_text("Challenges"), 0);
}

#[test]
fn only_the_newest_insight_is_shown() {
    let mut older = insight(1);
    older.summary = "an older summary".into();
    let data = report(entries(3, |_| true), vec![insight(1), older]);
    let (canvas, _) = record(&data, &fixed_config());
    assert_eq!(canvas.count_text("AI-Generated Insights"), 1);
    assert_eq!(canvas.count_text("an older summary"), 0);
}

#[test]
fn short_report_without_insights_fits_one_page() {
    let data = report(entries(3, |_| true), Vec::new());
    let (canvas, pages) = record(&data, &fixed_config());
    assert_eq!(pages, 1);
    assert_eq!(canvas.count_text("AI-Generated Insights"), 0);
    assert_eq!(canvas.count_text("Page 1 of 1"), 1);
}

#[test]
fn sections_appear_in_order() {
    let data = report(entries(3, |_| true), vec![insight(1)]);
    let (canvas, _) = record(&data, &fixed_config());
    let titles = [
        "Goal Overview",
        "Progress Statistics",
        "Daily Progress Summary",
        "AI-Generated Insights",
    ];
    let positions: Vec<(usize, f32)> = titles
        .iter()
        .map(|title| {
            let r = canvas
                .ops
                .iter()
                .find(|r| r.op.text() == Some(*title))
                .unwrap_or_else(|| panic!("{title} not drawn"));
            (r.page, r.op.top())
        })
        .collect();
    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1], "{positions:?}");
    }
}

#[test]
fn overview_and_statistics_show_scenario_values() {
    // 25 of 30 days done.
    let data = report(entries(30, |d| d <= 25), Vec::new());
    let (canvas, _) = record(&data, &fixed_config());
    assert_eq!(data.stats.completion_rate, 83.0);
    assert_eq!(canvas.count_text("83%"), 1);
    assert_eq!(canvas.count_text("+50"), 1);
    assert_eq!(canvas.count_text("30 days"), 1);
    assert_eq!(canvas.count_text("1.5 hours"), 1);
    assert_eq!(canvas.count_text("9/1/2026"), 1);
    assert_eq!(canvas.count_text("IN PROGRESS"), 1);
}
