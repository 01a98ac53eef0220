use slidecraft::adapter::Range;
use slidecraft::builder::{PresentationBuilder, TableOptions, TextOptions};
use slidecraft::codegen::generate_template;
use slidecraft::template::{DefaultMaster, TitleSlide};
use slidecraft::Error;

fn sample_deck(path: &std::path::Path) {
    PresentationBuilder::<DefaultMaster>::new()
        .unwrap()
        .slide(|m| {
            m.title_slide().with(TitleSlide {
                title: "Inventory".to_string(),
                subtitle: Some("Spring".to_string()),
            })
        })
        .unwrap()
        .slide(|m| {
            m.blank()
                .builder()
                .text(
                    "Summary",
                    Range::new((1, "in"), (0.5, "in"), (4, "in"), (1, "in")).unwrap(),
                    TextOptions::new()
                        .with_size((24, "pt"))
                        .unwrap()
                        .with_color("#336699")
                        .unwrap(),
                )
                .table(
                    vec![vec!["Item", "Count"], vec!["Pens", "12"]],
                    Range::new((1, "in"), (2, "in"), (6, "in"), (2, "in")).unwrap(),
                    TableOptions::new().with_first_row_header(true),
                )
        })
        .unwrap()
        .build()
        .save(path)
        .unwrap();
}

#[test]
fn tree_of_saved_deck() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.pptx");
    sample_deck(&path);

    let pres = slidecraft::adapter::Presentation::open(&path).unwrap();
    let json = serde_json::to_value(pres.tree()).unwrap();

    assert_eq!(json["slides_count"], 2);
    assert_eq!(json["masters_count"], 1);
    assert_eq!(json["slide_width"], 720.0);
    assert_eq!(json["notes_master"], "/ppt/notesMasters/notesMaster1.xml");

    let cover = &json["slides"][0];
    assert_eq!(cover["layout_name"], "Title Slide");
    assert_eq!(cover["placeholders"][0]["type"], "ctrTitle");
    assert_eq!(cover["shapes"][0]["text_frame"]["text"], "Inventory");

    let body = &json["slides"][1]["shapes"];
    assert_eq!(body[0]["type"], "text_box");
    assert_eq!(body[0]["left"], 72.0);
    assert_eq!(body[0]["top"], 36.0);
    let run = &body[0]["text_frame"]["paragraphs"][0]["runs"][0];
    assert_eq!(run["font"]["size"], 24.0);
    assert_eq!(run["font"]["color"], "336699");
    assert_eq!(body[1]["type"], "table");
    assert_eq!(body[1]["has_table"], true);
    assert_eq!(body[1]["table"]["cells"][1][0], "Pens");
    assert_eq!(body[1]["table"]["first_row"], true);
}

#[test]
fn template_of_saved_deck() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quarterly-review.pptx");
    sample_deck(&path);

    let source = generate_template(&path).unwrap();
    assert!(source.contains("pub struct QuarterlyReviewMaster from "));
    assert!(source.contains("quarterly-review.pptx\" {"));
    assert!(source.contains("        placeholder title: Option<String>,"));
    assert!(source.contains("        title_and_content: TitleAndContent,"));
    assert_eq!(source.matches("slide_layout! {").count(), 11);
}

#[test]
fn template_of_missing_deck() {
    let dir = tempfile::tempdir().unwrap();
    let err = generate_template(dir.path().join("absent.pptx")).unwrap_err();
    assert!(matches!(err, Error::MasterSourceNotFound(_)));
}
