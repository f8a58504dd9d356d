mod common;

use std::io::Read;
use std::path::PathBuf;

use common::{contains, count_occurrences, entries, fixed_config, insight, report};
use goal_report_pdf::{
    Error, FooterMode, PageSize, ReportConfig, render_report, render_report_json, write_report,
};

#[test]
fn renders_a_pdf_document() {
    let _ = env_logger::try_init();
    let data = report(entries(3, |_| true), vec![insight(2)]);
    let doc = render_report(&data, &fixed_config()).expect("render");

    let bytes = doc.as_bytes();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(bytes, "%%EOF"));
    assert_eq!(doc.content_type(), "application/pdf");
    assert_eq!(doc.file_name(), "goal-report-65f1c0ffee.pdf");
    assert!(contains(bytes, &format!("/Count {}", doc.page_count())));
    assert!(contains(bytes, "/BaseFont /Helvetica-Bold"));
}

#[test]
fn footers_carry_the_final_page_total() {
    let data = report(entries(14, |_| true), vec![insight(3)]);
    let doc = render_report(&data, &fixed_config()).expect("render");
    let n = doc.page_count();
    assert!(n >= 2);
    let bytes = doc.as_bytes();
    for page in 1..=n {
        assert!(
            contains(bytes, &format!("(Page {page} of {n}) Tj")),
            "missing footer for page {page}"
        );
    }
    assert_eq!(count_occurrences(bytes, "(Generated by Aivora) Tj"), n);
}

#[test]
fn footer_modes_produce_the_same_document() {
    let data = report(entries(14, |_| true), vec![insight(3)]);
    let immediate = render_report(&data, &fixed_config()).expect("immediate");
    let deferred_config = ReportConfig {
        footer_mode: FooterMode::Deferred,
        ..fixed_config()
    };
    let deferred = render_report(&data, &deferred_config).expect("deferred");
    assert_eq!(immediate.page_count(), deferred.page_count());
    assert_eq!(immediate.as_bytes(), deferred.as_bytes());
}

#[test]
fn output_is_deterministic_for_a_fixed_date() {
    let data = report(entries(20, |d| d % 3 != 0), vec![insight(4)]);
    let config = ReportConfig {
        compress: true,
        ..fixed_config()
    };
    let a = render_report(&data, &config).expect("first");
    let b = render_report(&data, &config).expect("second");
    assert_eq!(a, b);
}

#[test]
fn compressed_streams_are_flate_encoded() {
    let data = report(entries(3, |_| true), Vec::new());
    let config = ReportConfig {
        compress: true,
        ..fixed_config()
    };
    let doc = render_report(&data, &config).expect("render");
    let bytes = doc.as_bytes();
    assert!(contains(bytes, "/FlateDecode"));
    assert!(!contains(bytes, "(Page 1 of 1) Tj"));

    let inflated: Vec<Vec<u8>> = stream_bodies(bytes)
        .into_iter()
        .filter_map(|body| miniz_oxide::inflate::decompress_to_vec_zlib(body).ok())
        .collect();
    assert!(!inflated.is_empty());
    assert!(
        inflated.iter().any(|page| contains(page, "(Page 1 of 1) Tj")),
        "footer not found in any page stream"
    );
}

/// Raw bytes between each `stream` and `endstream` keyword.
fn stream_bodies(pdf: &[u8]) -> Vec<&[u8]> {
    const START: &[u8] = b"stream\n";
    const END: &[u8] = b"\nendstream";
    let mut bodies = Vec::new();
    let mut rest = pdf;
    while let Some(at) = rest.windows(START.len()).position(|w| w == START) {
        let body = &rest[at + START.len()..];
        let Some(len) = body.windows(END.len()).position(|w| w == END) else {
            break;
        };
        bodies.push(&body[..len]);
        rest = &body[len + END.len()..];
    }
    bodies
}

#[test]
fn letter_pages_use_letter_media_box() {
    let data = report(entries(3, |_| true), Vec::new());
    let config = fixed_config().with_page_size(PageSize::Letter);
    let doc = render_report(&data, &config).expect("render");
    assert!(contains(doc.as_bytes(), "/MediaBox [0 0 612 792]"));
}

#[test]
fn document_streams_through_a_reader() {
    let data = report(entries(3, |_| true), Vec::new());
    let doc = render_report(&data, &fixed_config()).expect("render");
    let expected = doc.as_bytes().to_vec();
    let mut out = Vec::new();
    doc.into_reader().read_to_end(&mut out).unwrap();
    assert_eq!(out, expected);
}

#[test]
fn write_report_saves_the_rendered_bytes() {
    let data = report(entries(3, |_| true), vec![insight(1)]);
    let config = fixed_config();
    let path = std::env::temp_dir().join(format!("goal-report-{}.pdf", std::process::id()));
    let pages = write_report(&data, &config, &path).expect("write");
    let written = std::fs::read(&path).expect("read back");
    let _ = std::fs::remove_file(&path);

    let doc = render_report(&data, &config).expect("render");
    assert_eq!(pages, doc.page_count());
    assert_eq!(written, doc.as_bytes());
}

#[test]
fn failures_surface_as_generation_errors() {
    let data = report(entries(3, |_| true), Vec::new());
    let mut config = fixed_config();
    config.fonts.regular = Some(PathBuf::from("/nonexistent/font.ttf"));
    let err = render_report(&data, &config).unwrap_err();
    assert!(matches!(err, Error::Generation(_)), "{err:?}");
    assert!(err.to_string().starts_with("report generation failed"));
}

#[test]
fn renders_from_json_with_computed_stats() {
    let json = r#"{
        "goal": {
            "_id": "abc123",
            "title": "Learn the cello",
            "description": "Twenty minutes of scales a day.",
            "duration": 30,
            "hoursPerDay": 0.5,
            "startDate": "2026-09-01T00:00:00.000Z",
            "status": "completed",
            "planLength": 30
        },
        "progress": [
            {
                "day": 2,
                "completed": true,
                "comment": "Better bowing",
                "hoursSpent": 0.5,
                "sentimentScore": 0.4
            },
            {"day": 1, "completed": true, "hoursSpent": 0.5, "sentimentScore": 0.2}
        ],
        "insights": [{
            "summary": "Good start.",
            "highlights": ["Daily practice"],
            "recommendations": [],
            "blockers": [],
            "motivationLevel": 80
        }]
    }"#;
    let doc = render_report_json(json, &fixed_config()).expect("render");
    assert_eq!(doc.file_name(), "goal-report-abc123.pdf");
    // The insights section does not fit below the table and starts page 2.
    assert_eq!(doc.page_count(), 2);
    let bytes = doc.as_bytes();
    assert!(contains(bytes, "(COMPLETED) Tj"));
    assert!(contains(bytes, "(7%) Tj"));
    assert!(contains(bytes, "(+30) Tj"));
    assert!(contains(bytes, "(Motivation 80/100) Tj"));
}

#[test]
fn invalid_json_is_not_a_generation_error() {
    let err = render_report_json("{\"goal\": 1}", &fixed_config()).unwrap_err();
    assert!(matches!(err, Error::Json(_)), "{err:?}");

    let json = r#"{
        "goal": {"title": "", "duration": 3, "hoursPerDay": 1, "startDate": "2026-01-01"}
    }"#;
    let err = render_report_json(json, &fixed_config()).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)), "{err:?}");
}
