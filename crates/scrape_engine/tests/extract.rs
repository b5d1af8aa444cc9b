use pretty_assertions::assert_eq;
use scrape_engine::{extract, extract_meta_tags, Extraction, ExtractionMode};

#[test]
fn text_mode_collects_trimmed_paragraphs_in_order() {
    let html = "<html><body><p>  Hello </p><div><p>World</p></div><p></p></body></html>";
    let extraction = extract(html, ExtractionMode::Text).unwrap();
    assert_eq!(
        extraction,
        Extraction::Text(vec![
            "Hello".to_string(),
            "World".to_string(),
            String::new(),
        ])
    );
}

#[test]
fn text_mode_yields_one_record_per_paragraph() {
    let html = "<p>a</p><p>b</p><p>c</p><p>d</p>";
    let extraction = extract(html, ExtractionMode::Text).unwrap();
    assert_eq!(extraction.len(), 4);
}

#[test]
fn images_mode_skips_elements_without_src() {
    let html = r#"<img src="/a.png"><img alt="no source"><img src="/b.png">"#;
    let extraction = extract(html, ExtractionMode::Images).unwrap();
    assert_eq!(
        extraction,
        Extraction::Images(vec!["/a.png".to_string(), "/b.png".to_string()])
    );
}

#[test]
fn links_mode_skips_anchors_without_href() {
    let html = r#"<a href="https://a.test/">A</a><a name="anchor">B</a><a href="/rel">C</a>"#;
    let extraction = extract(html, ExtractionMode::Links).unwrap();
    assert_eq!(
        extraction,
        Extraction::Links(vec!["https://a.test/".to_string(), "/rel".to_string()])
    );
}

#[test]
fn tables_mode_yields_one_grid_per_table() {
    let html = r#"
        <table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>
        <table><tr><td>x</td></tr></table>
    "#;
    let extraction = extract(html, ExtractionMode::Tables).unwrap();
    let Extraction::Tables(grids) = extraction else {
        panic!("expected table grids");
    };
    assert_eq!(grids.len(), 2);
    assert_eq!(grids[0], vec![vec!["A", "B"], vec!["1", "2"]]);
    assert_eq!(grids[1], vec![vec!["x"]]);
}

#[test]
fn tables_mode_tolerates_ragged_rows() {
    let html = r#"<table>
        <tr><th>A</th><th>B</th><th>C</th></tr>
        <tr><td>1</td></tr>
        <tr><td>2</td><td>3</td></tr>
    </table>"#;
    let extraction = extract(html, ExtractionMode::Tables).unwrap();
    let Extraction::Tables(grids) = extraction else {
        panic!("expected table grids");
    };
    assert_eq!(grids[0].len(), 3);
    assert_eq!(grids[0][1], vec!["1"]);
    assert_eq!(grids[0][2], vec!["2", "3"]);
}

#[test]
fn header_only_table_still_yields_a_grid() {
    let html = "<table><tr><th>A</th><th>B</th></tr></table>";
    let extraction = extract(html, ExtractionMode::Tables).unwrap();
    assert_eq!(
        extraction,
        Extraction::Tables(vec![vec![vec!["A".to_string(), "B".to_string()]]])
    );
}

#[test]
fn nested_table_rows_stay_with_their_own_table() {
    let html = r#"<table>
        <tr><td>outer<table><tr><td>inner</td></tr></table></td><td>side</td></tr>
    </table>"#;
    let extraction = extract(html, ExtractionMode::Tables).unwrap();
    let Extraction::Tables(grids) = extraction else {
        panic!("expected table grids");
    };
    assert_eq!(grids.len(), 2);
    // The outer grid has exactly one row; the inner row is not pulled up.
    assert_eq!(grids[0].len(), 1);
    assert_eq!(grids[0][0], vec!["outerinner", "side"]);
    assert_eq!(grids[1], vec![vec!["inner"]]);
}

#[test]
fn no_matching_elements_is_empty_not_an_error() {
    let html = "<html><body><span>nothing here</span></body></html>";
    for mode in [
        ExtractionMode::Text,
        ExtractionMode::Images,
        ExtractionMode::Links,
        ExtractionMode::Tables,
    ] {
        let extraction = extract(html, mode).unwrap();
        assert!(extraction.is_empty(), "{mode:?} should be empty");
    }
}

#[test]
fn meta_tags_collect_every_attribute_set_in_order() {
    let html = r#"<html><head>
        <meta charset="utf-8">
        <meta name="description" content="a page">
        <meta name="viewport" content="width=device-width" id="v">
    </head><body></body></html>"#;
    let tags = extract_meta_tags(html);
    assert_eq!(tags.len(), 3);
    assert_eq!(tags[0].attrs, vec![("charset".to_string(), "utf-8".to_string())]);
    // Source order, not alphabetical: name precedes content.
    assert_eq!(
        tags[1].attrs,
        vec![
            ("name".to_string(), "description".to_string()),
            ("content".to_string(), "a page".to_string()),
        ]
    );
    assert_eq!(
        tags[2].attrs,
        vec![
            ("name".to_string(), "viewport".to_string()),
            ("content".to_string(), "width=device-width".to_string()),
            ("id".to_string(), "v".to_string()),
        ]
    );
}
