use vizseg_core::area::{AreaSnapshot, TextDump};
use vizseg_core::segm::{SegmParams, Segmenter, SortMode};
use vizseg_core::{Page, SegmError};

const PAGE: &str = r##"{
  "width": 400,
  "height": 200,
  "root": {
    "bounds": { "x1": 0, "y1": 0, "x2": 399, "y2": 199 },
    "background": "#ffffff",
    "children": [
      {
        "name": "header",
        "bounds": { "x1": 0, "y1": 0, "x2": 399, "y2": 39 },
        "background": "#203040",
        "background_separated": true,
        "children": [
          { "kind": "text", "bounds": { "x1": 10, "y1": 10, "x2": 69, "y2": 29 },
            "text": "Daily", "font": { "size": 20, "weight": 1 }, "color": "#ffffff" },
          { "kind": "text", "bounds": { "x1": 80, "y1": 10, "x2": 139, "y2": 29 },
            "text": "News", "font": { "size": 20, "weight": 1 }, "color": "#ffffff" }
        ]
      },
      {
        "bounds": { "x1": 0, "y1": 50, "x2": 399, "y2": 199 },
        "children": [
          { "kind": "text", "bounds": { "x1": 10, "y1": 60, "x2": 49, "y2": 73 },
            "text": "First", "font": { "size": 12 } },
          { "kind": "text", "bounds": { "x1": 55, "y1": 60, "x2": 94, "y2": 73 },
            "text": "story", "font": { "size": 12 } },
          { "kind": "text", "bounds": { "x1": 10, "y1": 80, "x2": 49, "y2": 93 },
            "text": "second", "font": { "size": 12 } },
          { "kind": "replaced", "bounds": { "x1": 200, "y1": 60, "x2": 389, "y2": 189 } },
          { "kind": "text", "visible": false, "bounds": { "x1": 10, "y1": 100, "x2": 49, "y2": 113 },
            "text": "hidden" }
        ]
      }
    ]
  }
}"##;

#[test]
fn json_page_to_area_tree() {
    let page = Page::from_json(PAGE).unwrap();
    assert_eq!(page.root.count(), 10);
    let tree = Segmenter::default().segment(&page).unwrap();
    let root = tree.root();

    let header = tree.area_by_name("header").unwrap();
    assert_eq!(tree.text(header), "Daily News");
    assert!((tree.area(header).fonts().average_size() - 20.0).abs() < 1e-9);

    let text = tree.text(root);
    assert!(text.contains("First story"));
    assert!(!text.contains("hidden"));

    let image = tree.area_at(300, 150).unwrap();
    assert!(tree.area(image).is_replaced());
}

#[test]
fn snapshot_and_dump_cover_every_area() {
    let page = Page::from_json(PAGE).unwrap();
    let params = SegmParams {
        sort: SortMode::Position,
        ..SegmParams::default()
    };
    let tree = Segmenter::new(params).segment(&page).unwrap();
    let snap = AreaSnapshot::of(&tree, tree.root());
    assert_eq!(snap.count(), tree.len());
    assert_eq!(TextDump::new(&tree).to_string().lines().count(), tree.len());

    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"name\":\"header\""));
}

#[test]
fn malformed_input_is_reported() {
    let bad_color = PAGE.replace("#203040", "#20304");
    assert!(matches!(Page::from_json(&bad_color), Err(SegmError::Json(_))));
    assert!(matches!(
        Page::from_path("/nonexistent/page.json"),
        Err(SegmError::Io(_))
    ));
}
